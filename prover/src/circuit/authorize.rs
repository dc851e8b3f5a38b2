//! Authorize: a third party holding the note's authorize key grants a
//! delegated spend permission. Publishes the note's authorize hash (replay
//! guard) and the spend hash pinning which key may spend and for how much,
//! without revealing the note itself.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use mixpool_privacy::merkle::{PathLevel, TREE_DEPTH};

use crate::gadgets::{MerklePathVar, enforce_amount_range, mimc_hash_var};

/// Public: `[tree_root_hash, authorize_hash, authorize_spend_hash]`.
#[derive(Clone, Debug)]
pub struct AuthorizeCircuit {
    pub tree_root_hash: Fr,
    pub authorize_hash: Fr,
    pub authorize_spend_hash: Fr,

    pub receiver_key: Fr,
    pub return_key: Fr,
    pub authorize_key: Fr,
    pub authorize_pri_key: Fr,
    pub note_random: Fr,
    pub amount: Fr,
    pub note_hash: Fr,
    pub spend_flag: bool,
    pub path: [Option<PathLevel>; TREE_DEPTH],
}

impl AuthorizeCircuit {
    pub fn blank() -> Self {
        AuthorizeCircuit {
            tree_root_hash: Fr::zero(),
            authorize_hash: Fr::zero(),
            authorize_spend_hash: Fr::zero(),
            receiver_key: Fr::zero(),
            return_key: Fr::zero(),
            authorize_key: Fr::zero(),
            authorize_pri_key: Fr::zero(),
            note_random: Fr::zero(),
            amount: Fr::zero(),
            note_hash: Fr::zero(),
            spend_flag: false,
            path: [None; TREE_DEPTH],
        }
    }
}

impl ConstraintSynthesizer<Fr> for AuthorizeCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let root = FpVar::new_input(cs.clone(), || Ok(self.tree_root_hash))?;
        let authorize_hash = FpVar::new_input(cs.clone(), || Ok(self.authorize_hash))?;
        let authorize_spend = FpVar::new_input(cs.clone(), || Ok(self.authorize_spend_hash))?;

        let receiver = FpVar::new_witness(cs.clone(), || Ok(self.receiver_key))?;
        let return_key = FpVar::new_witness(cs.clone(), || Ok(self.return_key))?;
        let authorize = FpVar::new_witness(cs.clone(), || Ok(self.authorize_key))?;
        let authorize_pri = FpVar::new_witness(cs.clone(), || Ok(self.authorize_pri_key))?;
        let random = FpVar::new_witness(cs.clone(), || Ok(self.note_random))?;
        let amount = FpVar::new_witness(cs.clone(), || Ok(self.amount))?;
        let note_hash = FpVar::new_witness(cs.clone(), || Ok(self.note_hash))?;
        let spend_flag = Boolean::new_witness(cs.clone(), || Ok(self.spend_flag))?;

        // The prover holds the authorize key itself, not a delegation.
        mimc_hash_var(&[authorize_pri]).enforce_equal(&authorize)?;

        mimc_hash_var(&[authorize.clone(), random.clone()]).enforce_equal(&authorize_hash)?;

        let target = FpVar::conditionally_select(&spend_flag, &receiver, &return_key)?;
        mimc_hash_var(&[target, amount.clone(), random.clone()]).enforce_equal(&authorize_spend)?;

        enforce_amount_range(&amount)?;
        mimc_hash_var(&[receiver, return_key, authorize, amount, random])
            .enforce_equal(&note_hash)?;

        let path = MerklePathVar::new_witness(cs, &self.path)?;
        path.enforce_membership(&note_hash, &root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::{AuthorizeWitness, SpendPath};
    use ark_relations::r1cs::ConstraintSystem;
    use mixpool_privacy::hash::Hash;
    use mixpool_privacy::keys::SpendKey;
    use mixpool_privacy::merkle;
    use mixpool_privacy::note::NoteSecret;

    fn witness() -> AuthorizeWitness {
        let mut rng = rand::thread_rng();
        let authorize_key = SpendKey::random(&mut rng);
        let secret = NoteSecret {
            receiver_key: Hash::from_field(&Fr::from(21u64)),
            return_key: Hash::from_field(&Fr::from(22u64)),
            authorize_key: authorize_key.receive_key(),
            amount: 750,
            note_random: Hash::from_field(&Fr::from(8675309u64)),
        };
        let leaves = vec![merkle::sentinel_leaf(), secret.note_hash().to_field()];
        let path = merkle::prove(&leaves, 1).unwrap();
        AuthorizeWitness {
            secret,
            authorize_key,
            spend_path: SpendPath::Receiver,
            path,
        }
    }

    #[test]
    fn satisfied_for_honest_witness() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        witness()
            .circuit()
            .unwrap()
            .generate_constraints(cs.clone())
            .unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn unsatisfied_for_foreign_authorize_key() {
        let mut rng = rand::thread_rng();
        let mut w = witness();
        w.authorize_key = SpendKey::random(&mut rng);
        let cs = ConstraintSystem::<Fr>::new_ref();
        w.circuit().unwrap().generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
