//! Wallet-side witness assembly: turns note secrets, spend keys and tree
//! paths into circuit assignments plus the matching public-input structs.

use ark_ed_on_bn254::{EdwardsAffine, Fr as CurveScalar};

use mixpool_privacy::commitment::{blinding_to_field, commit, point_coords};
use mixpool_privacy::hash::Hash;
use mixpool_privacy::keys::SpendKey;
use mixpool_privacy::merkle::{MerkleError, MerklePathProof};
use mixpool_privacy::note::NoteSecret;

use crate::circuit::{
    AuthorizeCircuit, DepositCircuit, TransferInputCircuit, TransferOutputCircuit, WithdrawCircuit,
};
use crate::public_inputs::{
    AuthorizePublicInput, DepositPublicInput, TransferInputPublicInput, TransferOutputPublicInput,
    WithdrawPublicInput,
};

/// Which of the note's two spend keys the prover is opening. The circuits
/// encode this as a boolean select; this enum is the protocol-level form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendPath {
    Receiver,
    Returner,
}

impl SpendPath {
    fn flag(&self) -> bool {
        matches!(self, SpendPath::Receiver)
    }

    pub fn target_key(&self, secret: &NoteSecret) -> Hash {
        match self {
            SpendPath::Receiver => secret.receiver_key,
            SpendPath::Returner => secret.return_key,
        }
    }
}

#[derive(Clone)]
pub struct DepositWitness {
    pub secret: NoteSecret,
}

impl DepositWitness {
    pub fn public(&self) -> DepositPublicInput {
        DepositPublicInput {
            note_hash: self.secret.note_hash(),
            amount: self.secret.amount,
        }
    }

    pub fn circuit(&self) -> DepositCircuit {
        let public = self.public();
        DepositCircuit {
            note_hash: public.note_hash.to_field(),
            amount: public.amount.into(),
            receiver_key: self.secret.receiver_key.to_field(),
            return_key: self.secret.return_key.to_field(),
            authorize_key: self.secret.authorize_key.to_field(),
            note_random: self.secret.note_random.to_field(),
        }
    }
}

#[derive(Clone)]
pub struct WithdrawWitness {
    pub secret: NoteSecret,
    pub spend_key: SpendKey,
    pub spend_path: SpendPath,
    /// True when spending through a previously granted delegation.
    pub authorized: bool,
    pub path: MerklePathProof,
}

impl WithdrawWitness {
    fn authorize_spend_hash(&self) -> Hash {
        if self.authorized {
            self.secret
                .authorize_spend_hash(&self.spend_path.target_key(&self.secret))
        } else {
            Hash::zero()
        }
    }

    pub fn public(&self) -> WithdrawPublicInput {
        WithdrawPublicInput {
            tree_root_hash: self.path.root_hash,
            authorize_spend_hash: self.authorize_spend_hash(),
            nullifier_hash: self.secret.nullifier(),
            amount: self.secret.amount,
        }
    }

    pub fn circuit(&self) -> Result<WithdrawCircuit, MerkleError> {
        let public = self.public();
        Ok(WithdrawCircuit {
            tree_root_hash: public.tree_root_hash.to_field(),
            authorize_spend_hash: public.authorize_spend_hash.to_field(),
            nullifier_hash: public.nullifier_hash.to_field(),
            amount: public.amount.into(),
            receiver_key: self.secret.receiver_key.to_field(),
            return_key: self.secret.return_key.to_field(),
            authorize_key: self.secret.authorize_key.to_field(),
            note_random: self.secret.note_random.to_field(),
            note_hash: self.secret.note_hash().to_field(),
            spend_key: self.spend_key.as_field(),
            spend_flag: self.spend_path.flag(),
            authorize_flag: self.authorized,
            path: self.path.to_padded()?,
        })
    }
}

#[derive(Clone)]
pub struct TransferInputWitness {
    pub secret: NoteSecret,
    pub spend_key: SpendKey,
    pub spend_path: SpendPath,
    pub authorized: bool,
    pub path: MerklePathProof,
    pub amount_random: CurveScalar,
    pub h: EdwardsAffine,
}

impl TransferInputWitness {
    pub fn commitment(&self) -> EdwardsAffine {
        commit(self.secret.amount, &self.amount_random, &self.h)
    }

    fn authorize_spend_hash(&self) -> Hash {
        if self.authorized {
            self.secret
                .authorize_spend_hash(&self.spend_path.target_key(&self.secret))
        } else {
            Hash::zero()
        }
    }

    pub fn public(&self) -> TransferInputPublicInput {
        let (x, y) = point_coords(&self.commitment());
        TransferInputPublicInput {
            tree_root_hash: self.path.root_hash,
            authorize_spend_hash: self.authorize_spend_hash(),
            nullifier_hash: self.secret.nullifier(),
            shield_amount_x: Hash::from_field(&x),
            shield_amount_y: Hash::from_field(&y),
        }
    }

    pub fn circuit(&self) -> Result<TransferInputCircuit, MerkleError> {
        let public = self.public();
        Ok(TransferInputCircuit {
            tree_root_hash: public.tree_root_hash.to_field(),
            authorize_spend_hash: public.authorize_spend_hash.to_field(),
            nullifier_hash: public.nullifier_hash.to_field(),
            shield_amount_x: public.shield_amount_x.to_field(),
            shield_amount_y: public.shield_amount_y.to_field(),
            receiver_key: self.secret.receiver_key.to_field(),
            return_key: self.secret.return_key.to_field(),
            authorize_key: self.secret.authorize_key.to_field(),
            note_random: self.secret.note_random.to_field(),
            note_hash: self.secret.note_hash().to_field(),
            spend_key: self.spend_key.as_field(),
            spend_flag: self.spend_path.flag(),
            authorize_flag: self.authorized,
            amount: self.secret.amount.into(),
            amount_random: blinding_to_field(&self.amount_random),
            path: self.path.to_padded()?,
            h: self.h,
        })
    }
}

#[derive(Clone)]
pub struct TransferOutputWitness {
    pub secret: NoteSecret,
    pub amount_random: CurveScalar,
    pub h: EdwardsAffine,
}

impl TransferOutputWitness {
    pub fn commitment(&self) -> EdwardsAffine {
        commit(self.secret.amount, &self.amount_random, &self.h)
    }

    pub fn public(&self) -> TransferOutputPublicInput {
        let (cx, cy) = point_coords(&self.commitment());
        let (hx, hy) = point_coords(&self.h);
        TransferOutputPublicInput {
            note_hash: self.secret.note_hash(),
            shield_amount_x: Hash::from_field(&cx),
            shield_amount_y: Hash::from_field(&cy),
            shield_point_h_x: Hash::from_field(&hx),
            shield_point_h_y: Hash::from_field(&hy),
        }
    }

    pub fn circuit(&self) -> TransferOutputCircuit {
        let public = self.public();
        TransferOutputCircuit {
            note_hash: public.note_hash.to_field(),
            shield_amount_x: public.shield_amount_x.to_field(),
            shield_amount_y: public.shield_amount_y.to_field(),
            shield_point_h_x: public.shield_point_h_x.to_field(),
            shield_point_h_y: public.shield_point_h_y.to_field(),
            receiver_key: self.secret.receiver_key.to_field(),
            return_key: self.secret.return_key.to_field(),
            authorize_key: self.secret.authorize_key.to_field(),
            note_random: self.secret.note_random.to_field(),
            amount: self.secret.amount.into(),
            amount_random: blinding_to_field(&self.amount_random),
        }
    }
}

#[derive(Clone)]
pub struct AuthorizeWitness {
    pub secret: NoteSecret,
    /// Private key whose MiMC image is the note's authorize key.
    pub authorize_key: SpendKey,
    pub spend_path: SpendPath,
    pub path: MerklePathProof,
}

impl AuthorizeWitness {
    pub fn public(&self) -> AuthorizePublicInput {
        AuthorizePublicInput {
            tree_root_hash: self.path.root_hash,
            authorize_hash: self.secret.authorize_hash(),
            authorize_spend_hash: self
                .secret
                .authorize_spend_hash(&self.spend_path.target_key(&self.secret)),
        }
    }

    pub fn circuit(&self) -> Result<AuthorizeCircuit, MerkleError> {
        let public = self.public();
        Ok(AuthorizeCircuit {
            tree_root_hash: public.tree_root_hash.to_field(),
            authorize_hash: public.authorize_hash.to_field(),
            authorize_spend_hash: public.authorize_spend_hash.to_field(),
            receiver_key: self.secret.receiver_key.to_field(),
            return_key: self.secret.return_key.to_field(),
            authorize_key: self.secret.authorize_key.to_field(),
            authorize_pri_key: self.authorize_key.as_field(),
            note_random: self.secret.note_random.to_field(),
            amount: self.secret.amount.into(),
            note_hash: self.secret.note_hash().to_field(),
            spend_flag: matches!(self.spend_path, SpendPath::Receiver),
            path: self.path.to_padded()?,
        })
    }
}
