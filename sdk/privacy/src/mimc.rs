//! MiMC hash over the BN254 scalar field.
//!
//! Exponent-7 permutation, 91 rounds, round constants `(i+1)^3 + (i+1)`.
//! Multi-input hashing absorbs each input into a running key that starts at
//! the input count, so an n-input hash can never collide with a padded
//! shorter one. The circuits in the prover crate mirror this function
//! constraint for constraint, which is why it lives here and not there.

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField};
use std::sync::OnceLock;

pub const MIMC_ROUNDS: usize = 91;

static ROUND_CONSTANTS: OnceLock<Vec<Fr>> = OnceLock::new();

/// The fixed round-constant sequence `(i+1)^3 + (i+1)`.
pub fn round_constants() -> &'static [Fr] {
    ROUND_CONSTANTS.get_or_init(|| {
        (0..MIMC_ROUNDS as u64)
            .map(|i| {
                let j = Fr::from(i + 1);
                j * j * j + j
            })
            .collect()
    })
}

fn pow7(x: Fr) -> Fr {
    let x2 = x.square();
    let x4 = x2.square();
    x4 * x2 * x
}

/// One keyed permutation: 91 rounds of `x <- (x + k + c)^7`, then a final
/// key addition.
fn permute(input: Fr, key: Fr) -> Fr {
    let mut x = input;
    for c in round_constants() {
        x = pow7(x + key + c);
    }
    x + key
}

/// Hash any number of field elements into one.
pub fn mimc_hash(inputs: &[Fr]) -> Fr {
    let mut state = Fr::from(inputs.len() as u64);
    for x in inputs {
        state = permute(*x, state);
    }
    state
}

/// Canonical big-endian encoding of a field element.
pub fn field_to_bytes_be(x: &Fr) -> [u8; 32] {
    let bytes = x.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Interpret big-endian bytes as a field element, reducing mod the field
/// order.
pub fn bytes_to_field_be(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}
