//! Key layout for the pool store.
//!
//! Hash-valued keys embed the raw 32 bytes after a short prefix so prefix
//! scans stay cheap and keys stay fixed-width.

use mixpool_privacy::hash::Hash;

fn with_hash(prefix: &[u8], hash: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 32);
    key.extend_from_slice(prefix);
    key.extend_from_slice(hash.as_bytes());
    key
}

fn with_str(prefix: &[u8], suffix: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix.as_bytes());
    key
}

/// Verify-key ring for one circuit, newest first.
pub fn verify_keys(circuit: &str) -> Vec<u8> {
    with_str(b"mix-vk/", circuit)
}

/// Allow-list entry for an authorizer public key.
pub fn auth_pubkey(key: &Hash) -> Vec<u8> {
    with_hash(b"mix-auth-pk/", key)
}

/// Published payment key for a transparent address.
pub fn payment_key(addr: &str) -> Vec<u8> {
    with_str(b"mix-pay/", addr)
}

/// Spent-nullifier marker.
pub fn nullifier(hash: &Hash) -> Vec<u8> {
    with_hash(b"mix-nf/", hash)
}

/// Consumed authorize-hash marker.
pub fn authorize_hash(hash: &Hash) -> Vec<u8> {
    with_hash(b"mix-ah/", hash)
}

/// Granted authorize-spend-hash marker.
pub fn authorize_spend_hash(hash: &Hash) -> Vec<u8> {
    with_hash(b"mix-ash/", hash)
}

/// Leaves of the current (unarchived) tree.
pub fn tree_current_leaves() -> Vec<u8> {
    b"mix-tree/current-leaves".to_vec()
}

/// Every intermediate root of the current tree, oldest first.
pub fn tree_current_roots() -> Vec<u8> {
    b"mix-tree/current-roots".to_vec()
}

/// Final roots of archived trees, oldest first.
pub fn tree_archived_roots() -> Vec<u8> {
    b"mix-tree/archived-roots".to_vec()
}

/// Existence marker for any root the pool has ever produced. Kept separate
/// from the snapshot lists so roots stay recognizable after archiving.
pub fn tree_root_seen(root: &Hash) -> Vec<u8> {
    with_hash(b"mix-tree/root-seen/", root)
}

/// Full leaf set of an archived tree, keyed by its final root.
pub fn tree_archive_leaves(root: &Hash) -> Vec<u8> {
    with_hash(b"mix-tree/archive/", root)
}

/// Wallet-side note index entry, keyed by note hash.
pub fn wallet_note(note_hash: &Hash) -> Vec<u8> {
    with_hash(b"mix-wallet/note/", note_hash)
}

/// Scan prefix covering every wallet note entry.
pub fn wallet_note_prefix() -> Vec<u8> {
    b"mix-wallet/note/".to_vec()
}

/// Secondary index: nullifier to note hash.
pub fn wallet_nullifier(hash: &Hash) -> Vec<u8> {
    with_hash(b"mix-wallet/nf/", hash)
}

/// Secondary index: authorize-spend hash to note hash.
pub fn wallet_auth_spend(hash: &Hash) -> Vec<u8> {
    with_hash(b"mix-wallet/ash/", hash)
}

/// Scanner resume cursor.
pub fn wallet_cursor() -> Vec<u8> {
    b"mix-wallet/cursor".to_vec()
}
