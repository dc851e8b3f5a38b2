//! 32-byte big-endian field-element wrapper.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mimc::{bytes_to_field_be, field_to_bytes_be};

/// Big-endian canonical encoding of a BN254 scalar. Used for note hashes,
/// nullifiers, tree roots and payment keys alike; the all-zero value doubles
/// as the "no key / no authorization" sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hash(#[serde(with = "hex")] pub [u8; 32]);

impl Hash {
    pub fn zero() -> Self {
        Hash([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn from_field(f: &Fr) -> Self {
        Hash(field_to_bytes_be(f))
    }

    pub fn to_field(&self) -> Fr {
        bytes_to_field_be(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Hash(out))
    }
}

impl From<Fr> for Hash {
    fn from(f: Fr) -> Self {
        Hash::from_field(&f)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}
