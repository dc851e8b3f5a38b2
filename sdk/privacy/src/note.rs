//! Note secrets and the hashes derived from them.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::mimc::mimc_hash;

/// The hidden contents of a note. The chain only ever sees hashes derived
/// from these fields; holders learn them through the encrypted secret
/// bundle attached to the action that created the note.
///
/// `return_key` and `authorize_key` may be the zero sentinel, meaning the
/// note has no return path and no delegation path respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSecret {
    pub receiver_key: Hash,
    pub return_key: Hash,
    pub authorize_key: Hash,
    pub amount: u64,
    pub note_random: Hash,
}

impl NoteSecret {
    /// The commitment that becomes a tree leaf.
    pub fn note_hash(&self) -> Hash {
        Hash::from_field(&mimc_hash(&[
            self.receiver_key.to_field(),
            self.return_key.to_field(),
            self.authorize_key.to_field(),
            Fr::from(self.amount),
            self.note_random.to_field(),
        ]))
    }

    /// Revealed exactly once, when the note is spent.
    pub fn nullifier(&self) -> Hash {
        Hash::from_field(&mimc_hash(&[self.note_random.to_field()]))
    }

    /// Marks the note's one delegation as exercised.
    pub fn authorize_hash(&self) -> Hash {
        Hash::from_field(&mimc_hash(&[
            self.authorize_key.to_field(),
            self.note_random.to_field(),
        ]))
    }

    /// The specific permission an authorizer grants: `target_key` is the
    /// receiver or return key the delegated spend is pinned to.
    pub fn authorize_spend_hash(&self, target_key: &Hash) -> Hash {
        Hash::from_field(&mimc_hash(&[
            target_key.to_field(),
            Fr::from(self.amount),
            self.note_random.to_field(),
        ]))
    }
}
