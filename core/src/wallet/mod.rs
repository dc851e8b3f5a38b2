//! Wallet-side note tracking.
//!
//! The wallet never learns about its notes from the chain directly; it
//! trial-decrypts every note transmission with its own DH secret and keeps
//! an index of the hits, tagged with the role the local key plays in each
//! note and the note's current lifecycle status.

pub mod scanner;

use serde::{Deserialize, Serialize};
use x25519_dalek::StaticSecret;

use mixpool_privacy::hash::Hash;
use mixpool_privacy::note::NoteSecret;

pub use scanner::{MixScanner, MixTxRecord, ScanStatus, TxSource};

/// Which of the note's three keys matched the local receive key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteRole {
    /// Local key is the receiver; this note is spendable money.
    Spender,
    /// Local key is the return key; spendable only via the return path.
    Returner,
    /// Local key is the authorizer; the note is tracked to produce
    /// authorizations, never spent here.
    Authorizer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteStatus {
    /// Spendable now.
    Valid,
    /// Waiting for an authorization covering our spend path.
    Frozen,
    /// Its nullifier appeared on-chain.
    Used,
}

/// One tracked note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteIndexEntry {
    pub note_hash: Hash,
    pub nullifier: Hash,
    /// Spend hash for the local role's spend path; zero for authorizers.
    pub authorize_spend_hash: Hash,
    pub role: NoteRole,
    pub status: NoteStatus,
    /// Local account the matching key belongs to.
    pub account: String,
    pub secret: NoteSecret,
    /// Chain position the note was found at.
    pub height: u64,
    pub index: u32,
}

/// A local account's scanning material.
pub struct WalletKey {
    pub account: String,
    /// `mimc(spend_key)`, compared against the note's role keys.
    pub receive_key: Hash,
    pub dh_secret: StaticSecret,
}

/// Classify a decrypted note against a local receive key. `None` when the
/// decryption was a stray hit and none of the note's keys are ours.
pub fn classify(secret: &NoteSecret, receive_key: &Hash) -> Option<(NoteRole, NoteStatus, Hash)> {
    let needs_authorization = !secret.authorize_key.is_zero();
    if secret.receiver_key == *receive_key {
        let status = if needs_authorization {
            NoteStatus::Frozen
        } else {
            NoteStatus::Valid
        };
        return Some((
            NoteRole::Spender,
            status,
            secret.authorize_spend_hash(&secret.receiver_key),
        ));
    }
    if secret.return_key == *receive_key {
        let status = if needs_authorization {
            NoteStatus::Frozen
        } else {
            NoteStatus::Valid
        };
        return Some((
            NoteRole::Returner,
            status,
            secret.authorize_spend_hash(&secret.return_key),
        ));
    }
    if secret.authorize_key == *receive_key {
        return Some((NoteRole::Authorizer, NoteStatus::Valid, Hash::zero()));
    }
    None
}
