//! R1CS gadgets shared by all five circuits.
//!
//! Every gadget mirrors a pure function in `mixpool-privacy`; keeping the
//! two in lockstep is what the gadget tests check.

use ark_bn254::Fr;
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective, constraints::EdwardsVar};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use mixpool_privacy::commitment::base_point;
use mixpool_privacy::merkle::{PathLevel, TREE_DEPTH};
use mixpool_privacy::mimc::round_constants;

/// Amounts are 64-bit; pinning higher bits to zero keeps commitment sums
/// far below the curve order.
pub const AMOUNT_BITS: usize = 64;

fn pow7(x: &FpVar<Fr>) -> FpVar<Fr> {
    let x2 = x * x;
    let x4 = &x2 * &x2;
    &x4 * &x2 * x
}

fn permute_var(input: &FpVar<Fr>, key: &FpVar<Fr>) -> FpVar<Fr> {
    let mut x = input.clone();
    for c in round_constants() {
        x = pow7(&(&x + key + FpVar::constant(*c)));
    }
    x + key
}

/// In-circuit mirror of [`mixpool_privacy::mimc::mimc_hash`].
pub fn mimc_hash_var(inputs: &[FpVar<Fr>]) -> FpVar<Fr> {
    let mut state = FpVar::constant(Fr::from(inputs.len() as u64));
    for x in inputs {
        state = permute_var(x, &state);
    }
    state
}

/// Fixed-depth Merkle path. Each level carries a sibling, a side flag and a
/// validity flag; invalid levels pass the running node through unchanged,
/// which is how variable-depth real paths fit the fixed-depth circuit.
pub struct MerklePathVar {
    levels: Vec<(FpVar<Fr>, Boolean<Fr>, Boolean<Fr>)>,
}

impl MerklePathVar {
    pub fn new_witness(
        cs: ConstraintSystemRef<Fr>,
        path: &[Option<PathLevel>; TREE_DEPTH],
    ) -> Result<Self, SynthesisError> {
        let mut levels = Vec::with_capacity(TREE_DEPTH);
        for slot in path {
            let sibling = FpVar::new_witness(cs.clone(), || {
                Ok(slot.map_or(Fr::from(0u64), |l| l.sibling))
            })?;
            let is_left =
                Boolean::new_witness(cs.clone(), || Ok(slot.is_some_and(|l| l.current_is_left)))?;
            let valid = Boolean::new_witness(cs.clone(), || Ok(slot.is_some()))?;
            levels.push((sibling, is_left, valid));
        }
        Ok(MerklePathVar { levels })
    }

    /// Walks leaf to root and enforces the result equals `root`.
    pub fn enforce_membership(
        &self,
        leaf: &FpVar<Fr>,
        root: &FpVar<Fr>,
    ) -> Result<(), SynthesisError> {
        let mut cur = leaf.clone();
        for (sibling, is_left, valid) in &self.levels {
            let l = FpVar::conditionally_select(is_left, &cur, sibling)?;
            let r = FpVar::conditionally_select(is_left, sibling, &cur)?;
            let parent = mimc_hash_var(&[l, r]);
            cur = FpVar::conditionally_select(valid, &parent, &cur)?;
        }
        cur.enforce_equal(root)
    }
}

/// Bit-decomposes `amount` and pins everything above [`AMOUNT_BITS`] to
/// zero. Returns the low bits for scalar multiplication.
pub fn enforce_amount_range(amount: &FpVar<Fr>) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let bits = amount.to_bits_le()?;
    for bit in &bits[AMOUNT_BITS..] {
        bit.enforce_equal(&Boolean::FALSE)?;
    }
    Ok(bits[..AMOUNT_BITS].to_vec())
}

/// An `H` generator baked into the circuit as a constant.
pub fn h_constant(h: &EdwardsAffine) -> EdwardsVar {
    EdwardsVar::constant(EdwardsProjective::from(*h))
}

/// Enforces `(cx, cy) == amount·G + amount_random·H`.
pub fn enforce_value_commitment(
    amount: &FpVar<Fr>,
    amount_random: &FpVar<Fr>,
    cx: &FpVar<Fr>,
    cy: &FpVar<Fr>,
    h: &EdwardsVar,
) -> Result<(), SynthesisError> {
    let amount_bits = enforce_amount_range(amount)?;
    let random_bits = amount_random.to_bits_le()?;
    let g = EdwardsVar::constant(EdwardsProjective::from(base_point()));
    let commitment = g.scalar_mul_le(amount_bits.iter())? + h.scalar_mul_le(random_bits.iter())?;
    commitment.x.enforce_equal(cx)?;
    commitment.y.enforce_equal(cy)
}
