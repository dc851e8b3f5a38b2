//! Mixpool Privacy SDK
//!
//! Note-based shielded pool primitives, shared between the chain-side state
//! machine, the prover and wallets.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       Shielded Action                          │
//! │  ┌─────────────┐  ┌───────────────┐  ┌─────────────────────┐  │
//! │  │ Nullifiers  │  │  Note hashes  │  │  Encrypted secrets  │  │
//! │  │ (spent)     │  │  (new leaves) │  │  (per recipient)    │  │
//! │  └─────────────┘  └───────────────┘  └─────────────────────┘  │
//! │        │                 │                     │               │
//! │        ▼                 ▼                     ▼               │
//! │   mimc::mimc_hash   merkle accumulator    encryption (DH)      │
//! │        └───────── commitment (amount·G + r·H) ─────────┘       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate touches storage or chain state; everything is a
//! pure function of its inputs so the circuits can mirror it constraint for
//! constraint.

pub mod commitment;
pub mod encryption;
pub mod hash;
pub mod keys;
pub mod merkle;
pub mod mimc;
pub mod note;

pub use commitment::{base_point, check_conservation, commit, default_h_point};
pub use encryption::{DhSecret, DhSecretGroup, encrypt_note_secret, try_decrypt_note_secret};
pub use hash::Hash;
pub use keys::{DhKeyPair, PaymentKey, SpendKey};
pub use merkle::{MAX_TREE_LEAVES, MerklePathProof, PathLevel, TREE_DEPTH};
pub use mimc::mimc_hash;
pub use note::NoteSecret;
