//! Deposit: proves a published note hash commits to the claimed public
//! amount without revealing the keys or randomness inside it.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::gadgets::{enforce_amount_range, mimc_hash_var};

/// Public: `[note_hash, amount]`. Private: the note fields.
#[derive(Clone, Debug)]
pub struct DepositCircuit {
    pub note_hash: Fr,
    pub amount: Fr,
    pub receiver_key: Fr,
    pub return_key: Fr,
    pub authorize_key: Fr,
    pub note_random: Fr,
}

impl DepositCircuit {
    /// All-zero assignment used for parameter generation; only the
    /// constraint shape matters there.
    pub fn blank() -> Self {
        DepositCircuit {
            note_hash: Fr::zero(),
            amount: Fr::zero(),
            receiver_key: Fr::zero(),
            return_key: Fr::zero(),
            authorize_key: Fr::zero(),
            note_random: Fr::zero(),
        }
    }
}

impl ConstraintSynthesizer<Fr> for DepositCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let note_hash = FpVar::new_input(cs.clone(), || Ok(self.note_hash))?;
        let amount = FpVar::new_input(cs.clone(), || Ok(self.amount))?;

        let receiver = FpVar::new_witness(cs.clone(), || Ok(self.receiver_key))?;
        let return_key = FpVar::new_witness(cs.clone(), || Ok(self.return_key))?;
        let authorize = FpVar::new_witness(cs.clone(), || Ok(self.authorize_key))?;
        let random = FpVar::new_witness(cs.clone(), || Ok(self.note_random))?;

        enforce_amount_range(&amount)?;
        let computed = mimc_hash_var(&[receiver, return_key, authorize, amount.clone(), random]);
        computed.enforce_equal(&note_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::DepositWitness;
    use ark_relations::r1cs::ConstraintSystem;
    use mixpool_privacy::hash::Hash;
    use mixpool_privacy::note::NoteSecret;

    fn witness() -> DepositWitness {
        DepositWitness {
            secret: NoteSecret {
                receiver_key: Hash::from_field(&Fr::from(101u64)),
                return_key: Hash::from_field(&Fr::from(202u64)),
                authorize_key: Hash::zero(),
                amount: 1000,
                note_random: Hash::from_field(&Fr::from(31415926u64)),
            },
        }
    }

    #[test]
    fn satisfied_for_honest_witness() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        witness().circuit().generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn unsatisfied_for_wrong_amount() {
        let mut circuit = witness().circuit();
        circuit.amount = Fr::from(999u64);
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
