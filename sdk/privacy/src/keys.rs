//! Key material: spend keys, their public payment keys, and the X25519
//! keys note secrets are encrypted to.

use ark_bn254::Fr;
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};

use crate::hash::Hash;
use crate::mimc::mimc_hash;

/// Private spend key: a random scalar. The public payment key is its
/// single-input MiMC image, which is what notes are locked to.
#[derive(Clone)]
pub struct SpendKey(Fr);

impl SpendKey {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        SpendKey(Fr::rand(rng))
    }

    pub fn from_hash(h: &Hash) -> Self {
        SpendKey(h.to_field())
    }

    pub fn to_hash(&self) -> Hash {
        Hash::from_field(&self.0)
    }

    pub fn as_field(&self) -> Fr {
        self.0
    }

    /// The public key a counterparty locks notes to.
    pub fn receive_key(&self) -> Hash {
        Hash::from_field(&mimc_hash(&[self.0]))
    }
}

/// X25519 key pair for receiving encrypted note secrets.
#[derive(Clone)]
pub struct DhKeyPair {
    pub secret: StaticSecret,
    pub public: PublicKey,
}

impl DhKeyPair {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = StaticSecret::random_from_rng(&mut *rng);
        let public = PublicKey::from(&secret);
        DhKeyPair { secret, public }
    }

    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        DhKeyPair { secret, public }
    }

    pub fn public_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }
}

/// Directory record published through governance: the receiving key notes
/// to this address are locked to, and the X25519 key its secrets are
/// encrypted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentKey {
    pub addr: String,
    pub receive_key: Hash,
    pub dh_public: [u8; 32],
}
