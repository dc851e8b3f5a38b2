//! Typed public-input schemas.
//!
//! The wire form of a circuit's public input is the concatenation of
//! 32-byte big-endian field elements in the declared order, carried as a
//! hex string. Decoding is strict: wrong length or a non-canonical element
//! rejects the whole blob, and positions are fixed per circuit. Nothing is
//! ever matched by name.

use ark_bn254::Fr;
use thiserror::Error;

use mixpool_privacy::hash::Hash;
use mixpool_privacy::mimc::{bytes_to_field_be, field_to_bytes_be};

pub const FIELD_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum PublicInputError {
    #[error("public input is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("public input is {got} bytes, circuit declares {want} field elements")]
    Length { got: usize, want: usize },
    #[error("field element {0} is not canonical")]
    NonCanonical(usize),
    #[error("amount does not fit in 64 bits")]
    AmountOverflow,
}

/// Decode a blob with no declared field count; used at the raw verifier
/// boundary.
pub fn decode_raw(hex_input: &str) -> Result<Vec<Fr>, PublicInputError> {
    let bytes = hex::decode(hex_input)?;
    if bytes.len() % FIELD_BYTES != 0 {
        return Err(PublicInputError::Length {
            got: bytes.len(),
            want: bytes.len().div_ceil(FIELD_BYTES),
        });
    }
    decode_chunks(&bytes)
}

fn decode_chunks(bytes: &[u8]) -> Result<Vec<Fr>, PublicInputError> {
    let mut out = Vec::with_capacity(bytes.len() / FIELD_BYTES);
    for (i, chunk) in bytes.chunks(FIELD_BYTES).enumerate() {
        let f = bytes_to_field_be(chunk);
        if field_to_bytes_be(&f) != chunk {
            return Err(PublicInputError::NonCanonical(i));
        }
        out.push(f);
    }
    Ok(out)
}

fn decode_fields(hex_input: &str, count: usize) -> Result<Vec<Fr>, PublicInputError> {
    let bytes = hex::decode(hex_input)?;
    if bytes.len() != count * FIELD_BYTES {
        return Err(PublicInputError::Length {
            got: bytes.len(),
            want: count,
        });
    }
    decode_chunks(&bytes)
}

fn encode_fields(fields: &[Fr]) -> String {
    let mut bytes = Vec::with_capacity(fields.len() * FIELD_BYTES);
    for f in fields {
        bytes.extend_from_slice(&field_to_bytes_be(f));
    }
    hex::encode(bytes)
}

fn field_to_amount(f: &Fr) -> Result<u64, PublicInputError> {
    let b = field_to_bytes_be(f);
    if b[..24].iter().any(|x| *x != 0) {
        return Err(PublicInputError::AmountOverflow);
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&b[24..]);
    Ok(u64::from_be_bytes(tail))
}

/// `[note_hash, amount]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositPublicInput {
    pub note_hash: Hash,
    pub amount: u64,
}

impl DepositPublicInput {
    pub const FIELDS: usize = 2;

    pub fn to_field_elements(&self) -> Vec<Fr> {
        vec![self.note_hash.to_field(), Fr::from(self.amount)]
    }

    pub fn encode(&self) -> String {
        encode_fields(&self.to_field_elements())
    }

    pub fn decode(hex_input: &str) -> Result<Self, PublicInputError> {
        let f = decode_fields(hex_input, Self::FIELDS)?;
        Ok(Self {
            note_hash: Hash::from_field(&f[0]),
            amount: field_to_amount(&f[1])?,
        })
    }
}

/// `[tree_root_hash, authorize_spend_hash, nullifier_hash, amount]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawPublicInput {
    pub tree_root_hash: Hash,
    pub authorize_spend_hash: Hash,
    pub nullifier_hash: Hash,
    pub amount: u64,
}

impl WithdrawPublicInput {
    pub const FIELDS: usize = 4;

    pub fn to_field_elements(&self) -> Vec<Fr> {
        vec![
            self.tree_root_hash.to_field(),
            self.authorize_spend_hash.to_field(),
            self.nullifier_hash.to_field(),
            Fr::from(self.amount),
        ]
    }

    pub fn encode(&self) -> String {
        encode_fields(&self.to_field_elements())
    }

    pub fn decode(hex_input: &str) -> Result<Self, PublicInputError> {
        let f = decode_fields(hex_input, Self::FIELDS)?;
        Ok(Self {
            tree_root_hash: Hash::from_field(&f[0]),
            authorize_spend_hash: Hash::from_field(&f[1]),
            nullifier_hash: Hash::from_field(&f[2]),
            amount: field_to_amount(&f[3])?,
        })
    }
}

/// `[tree_root_hash, authorize_spend_hash, nullifier_hash, shield_amount_x, shield_amount_y]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInputPublicInput {
    pub tree_root_hash: Hash,
    pub authorize_spend_hash: Hash,
    pub nullifier_hash: Hash,
    pub shield_amount_x: Hash,
    pub shield_amount_y: Hash,
}

impl TransferInputPublicInput {
    pub const FIELDS: usize = 5;

    pub fn to_field_elements(&self) -> Vec<Fr> {
        vec![
            self.tree_root_hash.to_field(),
            self.authorize_spend_hash.to_field(),
            self.nullifier_hash.to_field(),
            self.shield_amount_x.to_field(),
            self.shield_amount_y.to_field(),
        ]
    }

    pub fn encode(&self) -> String {
        encode_fields(&self.to_field_elements())
    }

    pub fn decode(hex_input: &str) -> Result<Self, PublicInputError> {
        let f = decode_fields(hex_input, Self::FIELDS)?;
        Ok(Self {
            tree_root_hash: Hash::from_field(&f[0]),
            authorize_spend_hash: Hash::from_field(&f[1]),
            nullifier_hash: Hash::from_field(&f[2]),
            shield_amount_x: Hash::from_field(&f[3]),
            shield_amount_y: Hash::from_field(&f[4]),
        })
    }
}

/// `[note_hash, shield_amount_x, shield_amount_y, shield_point_h_x, shield_point_h_y]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutputPublicInput {
    pub note_hash: Hash,
    pub shield_amount_x: Hash,
    pub shield_amount_y: Hash,
    pub shield_point_h_x: Hash,
    pub shield_point_h_y: Hash,
}

impl TransferOutputPublicInput {
    pub const FIELDS: usize = 5;

    pub fn to_field_elements(&self) -> Vec<Fr> {
        vec![
            self.note_hash.to_field(),
            self.shield_amount_x.to_field(),
            self.shield_amount_y.to_field(),
            self.shield_point_h_x.to_field(),
            self.shield_point_h_y.to_field(),
        ]
    }

    pub fn encode(&self) -> String {
        encode_fields(&self.to_field_elements())
    }

    pub fn decode(hex_input: &str) -> Result<Self, PublicInputError> {
        let f = decode_fields(hex_input, Self::FIELDS)?;
        Ok(Self {
            note_hash: Hash::from_field(&f[0]),
            shield_amount_x: Hash::from_field(&f[1]),
            shield_amount_y: Hash::from_field(&f[2]),
            shield_point_h_x: Hash::from_field(&f[3]),
            shield_point_h_y: Hash::from_field(&f[4]),
        })
    }
}

/// `[tree_root_hash, authorize_hash, authorize_spend_hash]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizePublicInput {
    pub tree_root_hash: Hash,
    pub authorize_hash: Hash,
    pub authorize_spend_hash: Hash,
}

impl AuthorizePublicInput {
    pub const FIELDS: usize = 3;

    pub fn to_field_elements(&self) -> Vec<Fr> {
        vec![
            self.tree_root_hash.to_field(),
            self.authorize_hash.to_field(),
            self.authorize_spend_hash.to_field(),
        ]
    }

    pub fn encode(&self) -> String {
        encode_fields(&self.to_field_elements())
    }

    pub fn decode(hex_input: &str) -> Result<Self, PublicInputError> {
        let f = decode_fields(hex_input, Self::FIELDS)?;
        Ok(Self {
            tree_root_hash: Hash::from_field(&f[0]),
            authorize_hash: Hash::from_field(&f[1]),
            authorize_spend_hash: Hash::from_field(&f[2]),
        })
    }
}
