//! Transfer circuits.
//!
//! A shielded transfer pairs one TransferInput proof per spent note with a
//! TransferOutput proof for the new note and one for the change note. The
//! amounts never appear in public inputs; each side exposes a value
//! commitment and the chain checks the commitment sums balance.
//!
//! The `H` generator is a circuit constant for TransferInput (baked in at
//! parameter setup from the chain's configured point) but a public input
//! for TransferOutput, where the chain compares it against its configured
//! point. Either way a prover cannot substitute a generator of their own
//! choosing to break the homomorphism.

use ark_bn254::Fr;
use ark_ed_on_bn254::EdwardsAffine;
use ark_ff::Zero;
use ark_r1cs_std::groups::curves::twisted_edwards::AffineVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use mixpool_privacy::merkle::{PathLevel, TREE_DEPTH};

use crate::gadgets::{MerklePathVar, enforce_value_commitment, h_constant, mimc_hash_var};

/// Public: `[tree_root_hash, authorize_spend_hash, nullifier_hash,
/// shield_amount_x, shield_amount_y]`. Same ownership and authorization
/// logic as Withdraw, but the amount stays private behind the commitment.
#[derive(Clone, Debug)]
pub struct TransferInputCircuit {
    pub tree_root_hash: Fr,
    pub authorize_spend_hash: Fr,
    pub nullifier_hash: Fr,
    pub shield_amount_x: Fr,
    pub shield_amount_y: Fr,

    pub receiver_key: Fr,
    pub return_key: Fr,
    pub authorize_key: Fr,
    pub note_random: Fr,
    pub note_hash: Fr,
    pub spend_key: Fr,
    pub spend_flag: bool,
    pub authorize_flag: bool,
    pub amount: Fr,
    pub amount_random: Fr,
    pub path: [Option<PathLevel>; TREE_DEPTH],

    /// Configured generator, part of the circuit shape.
    pub h: EdwardsAffine,
}

impl TransferInputCircuit {
    pub fn blank(h: EdwardsAffine) -> Self {
        TransferInputCircuit {
            tree_root_hash: Fr::zero(),
            authorize_spend_hash: Fr::zero(),
            nullifier_hash: Fr::zero(),
            shield_amount_x: Fr::zero(),
            shield_amount_y: Fr::zero(),
            receiver_key: Fr::zero(),
            return_key: Fr::zero(),
            authorize_key: Fr::zero(),
            note_random: Fr::zero(),
            note_hash: Fr::zero(),
            spend_key: Fr::zero(),
            spend_flag: false,
            authorize_flag: false,
            amount: Fr::zero(),
            amount_random: Fr::zero(),
            path: [None; TREE_DEPTH],
            h,
        }
    }
}

impl ConstraintSynthesizer<Fr> for TransferInputCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let root = FpVar::new_input(cs.clone(), || Ok(self.tree_root_hash))?;
        let authorize_spend = FpVar::new_input(cs.clone(), || Ok(self.authorize_spend_hash))?;
        let nullifier = FpVar::new_input(cs.clone(), || Ok(self.nullifier_hash))?;
        let shield_x = FpVar::new_input(cs.clone(), || Ok(self.shield_amount_x))?;
        let shield_y = FpVar::new_input(cs.clone(), || Ok(self.shield_amount_y))?;

        let receiver = FpVar::new_witness(cs.clone(), || Ok(self.receiver_key))?;
        let return_key = FpVar::new_witness(cs.clone(), || Ok(self.return_key))?;
        let authorize = FpVar::new_witness(cs.clone(), || Ok(self.authorize_key))?;
        let random = FpVar::new_witness(cs.clone(), || Ok(self.note_random))?;
        let note_hash = FpVar::new_witness(cs.clone(), || Ok(self.note_hash))?;
        let spend_key = FpVar::new_witness(cs.clone(), || Ok(self.spend_key))?;
        let spend_flag = Boolean::new_witness(cs.clone(), || Ok(self.spend_flag))?;
        let authorize_flag = Boolean::new_witness(cs.clone(), || Ok(self.authorize_flag))?;
        let amount = FpVar::new_witness(cs.clone(), || Ok(self.amount))?;
        let amount_random = FpVar::new_witness(cs.clone(), || Ok(self.amount_random))?;

        let target = FpVar::conditionally_select(&spend_flag, &receiver, &return_key)?;
        mimc_hash_var(&[spend_key]).enforce_equal(&target)?;

        let claimed = mimc_hash_var(&[target, amount.clone(), random.clone()]);
        let zero = FpVar::constant(Fr::zero());
        FpVar::conditionally_select(&authorize_flag, &claimed, &zero)?
            .enforce_equal(&authorize_spend)?;

        mimc_hash_var(&[random.clone()]).enforce_equal(&nullifier)?;

        mimc_hash_var(&[receiver, return_key, authorize, amount.clone(), random])
            .enforce_equal(&note_hash)?;

        enforce_value_commitment(&amount, &amount_random, &shield_x, &shield_y, &h_constant(&self.h))?;

        let path = MerklePathVar::new_witness(cs, &self.path)?;
        path.enforce_membership(&note_hash, &root)
    }
}

/// Public: `[note_hash, shield_amount_x, shield_amount_y,
/// shield_point_h_x, shield_point_h_y]`.
#[derive(Clone, Debug)]
pub struct TransferOutputCircuit {
    pub note_hash: Fr,
    pub shield_amount_x: Fr,
    pub shield_amount_y: Fr,
    pub shield_point_h_x: Fr,
    pub shield_point_h_y: Fr,

    pub receiver_key: Fr,
    pub return_key: Fr,
    pub authorize_key: Fr,
    pub note_random: Fr,
    pub amount: Fr,
    pub amount_random: Fr,
}

impl TransferOutputCircuit {
    pub fn blank() -> Self {
        TransferOutputCircuit {
            note_hash: Fr::zero(),
            shield_amount_x: Fr::zero(),
            shield_amount_y: Fr::zero(),
            shield_point_h_x: Fr::zero(),
            shield_point_h_y: Fr::zero(),
            receiver_key: Fr::zero(),
            return_key: Fr::zero(),
            authorize_key: Fr::zero(),
            note_random: Fr::zero(),
            amount: Fr::zero(),
            amount_random: Fr::zero(),
        }
    }
}

impl ConstraintSynthesizer<Fr> for TransferOutputCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let note_hash = FpVar::new_input(cs.clone(), || Ok(self.note_hash))?;
        let shield_x = FpVar::new_input(cs.clone(), || Ok(self.shield_amount_x))?;
        let shield_y = FpVar::new_input(cs.clone(), || Ok(self.shield_amount_y))?;
        let h_x = FpVar::new_input(cs.clone(), || Ok(self.shield_point_h_x))?;
        let h_y = FpVar::new_input(cs.clone(), || Ok(self.shield_point_h_y))?;

        let receiver = FpVar::new_witness(cs.clone(), || Ok(self.receiver_key))?;
        let return_key = FpVar::new_witness(cs.clone(), || Ok(self.return_key))?;
        let authorize = FpVar::new_witness(cs.clone(), || Ok(self.authorize_key))?;
        let random = FpVar::new_witness(cs.clone(), || Ok(self.note_random))?;
        let amount = FpVar::new_witness(cs.clone(), || Ok(self.amount))?;
        let amount_random = FpVar::new_witness(cs.clone(), || Ok(self.amount_random))?;

        mimc_hash_var(&[receiver, return_key, authorize, amount.clone(), random])
            .enforce_equal(&note_hash)?;

        let h = AffineVar::new(h_x, h_y);
        enforce_value_commitment(&amount, &amount_random, &shield_x, &shield_y, &h)
    }
}
