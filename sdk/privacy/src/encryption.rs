//! Note transmission
//!
//! Encrypts a note's secret fields to each recipient role using
//! ECDH + ChaCha20-Poly1305.
//!
//! ```text
//! 1. Sender generates an ephemeral X25519 keypair (epk, esk)
//! 2. Shared secret = ECDH(esk, role_pk)
//! 3. Key = blake3 derive_key("mixpool-note-secret-v1", shared || epk)
//! 4. Ciphertext = ChaCha20-Poly1305(key, nonce, bincode(NoteSecret))
//! ```
//!
//! The AEAD tag replaces any padding-based framing: a ciphertext either
//! authenticates and decodes, or it was not addressed to this key.

use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use crate::note::NoteSecret;

const KEY_CONTEXT: &str = "mixpool-note-secret-v1";

#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("note secret serialization failed: {0}")]
    Serialize(#[from] bincode::Error),
    #[error("aead encryption failed")]
    Aead,
}

/// One encrypted note secret, addressed to a single role's DH key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhSecret {
    #[serde(with = "hex")]
    pub ephemeral_pk: [u8; 32],
    #[serde(with = "hex")]
    pub nonce: [u8; 12],
    #[serde(with = "hex")]
    pub ciphertext: Vec<u8>,
}

/// Per-note bundle: the receiver always gets a copy; returner and
/// authorizer only when the note carries those keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DhSecretGroup {
    pub receiver: DhSecret,
    pub returner: Option<DhSecret>,
    pub authorizer: Option<DhSecret>,
}

impl DhSecretGroup {
    /// All ciphertexts in the bundle, for scanners that try each in turn.
    pub fn iter(&self) -> impl Iterator<Item = &DhSecret> {
        std::iter::once(&self.receiver)
            .chain(self.returner.as_ref())
            .chain(self.authorizer.as_ref())
    }
}

fn derive_note_key(shared: &[u8; 32], ephemeral_pk: &[u8; 32]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(KEY_CONTEXT);
    hasher.update(shared);
    hasher.update(ephemeral_pk);
    *hasher.finalize().as_bytes()
}

/// Encrypt a note secret to one role's long-term DH public key.
pub fn encrypt_note_secret(
    recipient_pk: &[u8; 32],
    secret: &NoteSecret,
) -> Result<DhSecret, EncryptionError> {
    let mut rng = rand::thread_rng();
    let esk = EphemeralSecret::random_from_rng(&mut rng);
    let epk = PublicKey::from(&esk);
    let shared = esk.diffie_hellman(&PublicKey::from(*recipient_pk));
    let key = derive_note_key(shared.as_bytes(), epk.as_bytes());

    let plaintext = bincode::serialize(secret)?;
    let mut nonce = [0u8; 12];
    rng.fill_bytes(&mut nonce);

    let cipher = ChaCha20Poly1305::new_from_slice(&key).map_err(|_| EncryptionError::Aead)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
        .map_err(|_| EncryptionError::Aead)?;

    Ok(DhSecret {
        ephemeral_pk: *epk.as_bytes(),
        nonce,
        ciphertext,
    })
}

/// `None` means the ciphertext was not addressed to this key; scanners
/// treat that as "skip", never as an error.
pub fn try_decrypt_note_secret(encrypted: &DhSecret, secret_key: &StaticSecret) -> Option<NoteSecret> {
    let shared = secret_key.diffie_hellman(&PublicKey::from(encrypted.ephemeral_pk));
    let key = derive_note_key(shared.as_bytes(), &encrypted.ephemeral_pk);
    let cipher = ChaCha20Poly1305::new_from_slice(&key).ok()?;
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&encrypted.nonce),
            encrypted.ciphertext.as_slice(),
        )
        .ok()?;
    bincode::deserialize(&plaintext).ok()
}
