//! Read-only queries wallets use when building spends.

use mixpool_privacy::hash::Hash;
use mixpool_privacy::keys::PaymentKey;
use mixpool_privacy::merkle::MerklePathProof;

use crate::error::PoolError;
use crate::registry::Registry;
use crate::storage::KvStore;
use crate::tree::CommitTree;

/// Membership path for a note hash, searching the active tree first and
/// archived trees after (via `root_hint` when the caller has one).
pub fn get_tree_path<S: KvStore>(
    tree: &CommitTree,
    store: &S,
    leaf: &Hash,
    root_hint: Option<&Hash>,
) -> Result<MerklePathProof, PoolError> {
    tree.prove_membership(store, leaf, root_hint)
}

/// Published payment key for a transparent address. Senders need it to
/// derive the receiver key and encrypt the note secret.
pub fn payment_pub_key<S: KvStore>(store: &S, addr: &str) -> Result<PaymentKey, PoolError> {
    Registry::new(store)
        .payment_key(addr)?
        .ok_or_else(|| PoolError::PaymentKeyNotFound(addr.to_string()))
}

/// Whether an authorizer receive key is on the pool's allow-list. Wallets
/// consult this before naming an authorizer in a new note.
pub fn authorizer_allowed<S: KvStore>(store: &S, key: &Hash) -> Result<bool, PoolError> {
    Registry::new(store).auth_pubkey_allowed(key)
}
