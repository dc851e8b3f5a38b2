//! Value commitments
//!
//! Pedersen-style commitments on the Baby Jubjub curve embedded in BN254:
//! `C = amount·G + r·H`. `G` is the curve generator; `H` is a second
//! generator configured on-chain whose discrete log relative to `G` must be
//! unknown. The curve's base field equals the BN254 scalar field, so point
//! coordinates slot directly into circuit public inputs.

use ark_bn254::Fr;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, Fr as CurveScalar};
use ark_ff::{BigInteger, PrimeField};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use crate::mimc::bytes_to_field_be;

#[derive(Debug, Error)]
pub enum CommitmentError {
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime-order subgroup")]
    SmallOrderPoint,
}

/// The fixed base `G`.
pub fn base_point() -> EdwardsAffine {
    EdwardsAffine::generator()
}

/// Fallback `H` used when governance has not configured one: the generator
/// scaled by a public seed-derived scalar. The scalar is public knowledge,
/// so this default is only suitable for tests and local deployments.
pub fn default_h_point() -> EdwardsAffine {
    let seed = blake3::hash(b"mixpool-value-commitment-h-v1");
    let s = CurveScalar::from_le_bytes_mod_order(seed.as_bytes());
    (EdwardsProjective::from(base_point()) * s).into_affine()
}

pub fn random_blinding<R: RngCore + CryptoRng>(rng: &mut R) -> CurveScalar {
    CurveScalar::rand(rng)
}

/// `amount·G + blinding·H`.
pub fn commit(amount: u64, blinding: &CurveScalar, h: &EdwardsAffine) -> EdwardsAffine {
    let g = EdwardsProjective::from(base_point());
    let hp = EdwardsProjective::from(*h);
    (g * CurveScalar::from(amount) + hp * blinding).into_affine()
}

/// Affine coordinates as proof-field elements.
pub fn point_coords(p: &EdwardsAffine) -> (Fr, Fr) {
    (p.x, p.y)
}

/// Rebuilds a point from untrusted coordinates, rejecting off-curve and
/// small-order points.
pub fn point_from_coords(x: &Fr, y: &Fr) -> Result<EdwardsAffine, CommitmentError> {
    let p = EdwardsAffine::new_unchecked(*x, *y);
    if !p.is_on_curve() {
        return Err(CommitmentError::NotOnCurve);
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(CommitmentError::SmallOrderPoint);
    }
    Ok(p)
}

/// The canonical integer of a curve scalar as a proof-field element. The
/// curve order is below the proof-field order, so this is lossless; the
/// circuits bit-decompose the result to recover the scalar.
pub fn blinding_to_field(r: &CurveScalar) -> Fr {
    bytes_to_field_be(&r.into_bigint().to_bytes_be())
}

/// Blinding factors for a transfer's output and change commitments. The
/// output side gets fresh randomness and the change side takes the
/// remainder, so both sides sum to the input blinding and the public fee
/// term carries no `H` component.
pub fn split_blinding<R: RngCore + CryptoRng>(
    input_total: &CurveScalar,
    rng: &mut R,
) -> (CurveScalar, CurveScalar) {
    let output = CurveScalar::rand(rng);
    (output, *input_total - output)
}

/// `Σ inputs == Σ outputs + fee·G`. The only place shielded amounts are
/// ever compared, and it never touches plaintext values.
pub fn check_conservation(inputs: &[EdwardsAffine], outputs: &[EdwardsAffine], fee: u64) -> bool {
    let sum_in: EdwardsProjective = inputs.iter().map(|p| EdwardsProjective::from(*p)).sum();
    let mut sum_out: EdwardsProjective = outputs.iter().map(|p| EdwardsProjective::from(*p)).sum();
    sum_out += EdwardsProjective::from(base_point()) * CurveScalar::from(fee);
    sum_in == sum_out
}
