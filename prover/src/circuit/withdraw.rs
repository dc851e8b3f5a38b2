//! Withdraw: proves ownership (or delegated spend rights) over a note
//! anchored in the tree, revealing its nullifier and its amount. Funds
//! leaving the pool are transparent again, so the amount is public here,
//! unlike TransferInput, which hides it behind a commitment.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use mixpool_privacy::merkle::{PathLevel, TREE_DEPTH};

use crate::gadgets::{MerklePathVar, enforce_amount_range, mimc_hash_var};

/// Public: `[tree_root_hash, authorize_spend_hash, nullifier_hash, amount]`.
///
/// A circuit cannot branch at proof time, so the receiver-vs-return choice
/// is a boolean-constrained conditional select over `spend_flag`; the
/// protocol-level tagged enum lives in the witness builder.
#[derive(Clone, Debug)]
pub struct WithdrawCircuit {
    pub tree_root_hash: Fr,
    pub authorize_spend_hash: Fr,
    pub nullifier_hash: Fr,
    pub amount: Fr,

    pub receiver_key: Fr,
    pub return_key: Fr,
    pub authorize_key: Fr,
    pub note_random: Fr,
    pub note_hash: Fr,
    pub spend_key: Fr,
    pub spend_flag: bool,
    pub authorize_flag: bool,
    pub path: [Option<PathLevel>; TREE_DEPTH],
}

impl WithdrawCircuit {
    pub fn blank() -> Self {
        WithdrawCircuit {
            tree_root_hash: Fr::zero(),
            authorize_spend_hash: Fr::zero(),
            nullifier_hash: Fr::zero(),
            amount: Fr::zero(),
            receiver_key: Fr::zero(),
            return_key: Fr::zero(),
            authorize_key: Fr::zero(),
            note_random: Fr::zero(),
            note_hash: Fr::zero(),
            spend_key: Fr::zero(),
            spend_flag: false,
            authorize_flag: false,
            path: [None; TREE_DEPTH],
        }
    }
}

impl ConstraintSynthesizer<Fr> for WithdrawCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let root = FpVar::new_input(cs.clone(), || Ok(self.tree_root_hash))?;
        let authorize_spend = FpVar::new_input(cs.clone(), || Ok(self.authorize_spend_hash))?;
        let nullifier = FpVar::new_input(cs.clone(), || Ok(self.nullifier_hash))?;
        let amount = FpVar::new_input(cs.clone(), || Ok(self.amount))?;

        let receiver = FpVar::new_witness(cs.clone(), || Ok(self.receiver_key))?;
        let return_key = FpVar::new_witness(cs.clone(), || Ok(self.return_key))?;
        let authorize = FpVar::new_witness(cs.clone(), || Ok(self.authorize_key))?;
        let random = FpVar::new_witness(cs.clone(), || Ok(self.note_random))?;
        let note_hash = FpVar::new_witness(cs.clone(), || Ok(self.note_hash))?;
        let spend_key = FpVar::new_witness(cs.clone(), || Ok(self.spend_key))?;
        let spend_flag = Boolean::new_witness(cs.clone(), || Ok(self.spend_flag))?;
        let authorize_flag = Boolean::new_witness(cs.clone(), || Ok(self.authorize_flag))?;

        // Ownership: the private spend key must open the selected public key.
        let target = FpVar::conditionally_select(&spend_flag, &receiver, &return_key)?;
        mimc_hash_var(&[spend_key]).enforce_equal(&target)?;

        // Delegated path binds the exact permission, direct path pins zero.
        let claimed = mimc_hash_var(&[target, amount.clone(), random.clone()]);
        let zero = FpVar::constant(Fr::zero());
        FpVar::conditionally_select(&authorize_flag, &claimed, &zero)?
            .enforce_equal(&authorize_spend)?;

        mimc_hash_var(&[random.clone()]).enforce_equal(&nullifier)?;
        enforce_amount_range(&amount)?;

        mimc_hash_var(&[receiver, return_key, authorize, amount, random])
            .enforce_equal(&note_hash)?;

        let path = MerklePathVar::new_witness(cs, &self.path)?;
        path.enforce_membership(&note_hash, &root)
    }
}
