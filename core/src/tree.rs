//! Append-only commitment tree state.
//!
//! Leaves accumulate in a single active tree until it reaches the
//! configured capacity, at which point the full leaf set is archived under
//! its final root and a fresh tree starts from the sentinel leaf. Every
//! root the pool ever produces is also recorded under a standalone
//! existence key, so a root that was once spendable stays spendable after
//! the tree it came from is archived.

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

use mixpool_privacy::hash::Hash;
use mixpool_privacy::merkle::{MerklePathProof, compute_root, prove, sentinel_leaf};

use crate::error::PoolError;
use crate::storage::{KvStore, keys};

pub struct CommitTree {
    max_leaves: usize,
}

/// Outcome of appending a batch of note hashes.
#[derive(Debug, Clone)]
pub struct PushReceipt {
    /// Root after the last appended leaf.
    pub root: Hash,
    /// Leaf count of the active tree after the push (1 when the push
    /// triggered an archive and only the sentinel remains).
    pub leaves_total: usize,
    /// Final root of the tree archived during this push, if any.
    pub archived: Option<Hash>,
}

fn load_hashes<S: KvStore>(store: &S, key: &[u8]) -> Result<Option<Vec<Hash>>, PoolError> {
    match store.get(key)? {
        Some(bytes) => {
            let hashes = decode(&bytes).context("decode stored hash list")?;
            Ok(Some(hashes))
        }
        None => Ok(None),
    }
}

fn store_hashes<S: KvStore>(store: &mut S, key: &[u8], hashes: &[Hash]) -> Result<(), PoolError> {
    let bytes = encode(&hashes.to_vec()).context("encode hash list")?;
    store.put(key, &bytes)?;
    Ok(())
}

fn encode<T: Serialize>(value: &T) -> anyhow::Result<Vec<u8>> {
    bincode::serialize(value).context("bincode encode")
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> anyhow::Result<T> {
    bincode::deserialize(bytes).context("bincode decode")
}

impl CommitTree {
    pub fn new(max_leaves: usize) -> Self {
        Self { max_leaves }
    }

    /// Leaves and intermediate roots of the active tree. A tree that has
    /// never been written starts with the sentinel leaf only.
    pub fn snapshot<S: KvStore>(&self, store: &S) -> Result<(Vec<Hash>, Vec<Hash>), PoolError> {
        let leaves = match load_hashes(store, &keys::tree_current_leaves())? {
            Some(leaves) => leaves,
            None => vec![Hash::from_field(&sentinel_leaf())],
        };
        let roots = match load_hashes(store, &keys::tree_current_roots())? {
            Some(roots) => roots,
            None => {
                let fields: Vec<_> = leaves.iter().map(Hash::to_field).collect();
                vec![Hash::from_field(&compute_root(&fields))]
            }
        };
        Ok((leaves, roots))
    }

    /// Append note hashes, recomputing the root after each one so every
    /// intermediate root is recorded. Archives the tree the moment it hits
    /// capacity, even mid-batch.
    pub fn push<S: KvStore>(
        &self,
        store: &mut S,
        new_leaves: &[Hash],
    ) -> Result<PushReceipt, PoolError> {
        let (mut leaves, mut roots) = self.snapshot(store)?;
        let mut root = match roots.last() {
            Some(r) => *r,
            None => Hash::from_field(&compute_root(
                &leaves.iter().map(Hash::to_field).collect::<Vec<_>>(),
            )),
        };
        store.put(&keys::tree_root_seen(&root), &[1])?;
        let mut archived = None;

        for leaf in new_leaves {
            leaves.push(*leaf);
            let fields: Vec<_> = leaves.iter().map(Hash::to_field).collect();
            root = Hash::from_field(&compute_root(&fields));
            roots.push(root);
            store.put(&keys::tree_root_seen(&root), &[1])?;

            if leaves.len() >= self.max_leaves {
                self.archive(store, &leaves, &root)?;
                archived = Some(root);
                leaves = vec![Hash::from_field(&sentinel_leaf())];
                root = Hash::from_field(&compute_root(&[sentinel_leaf()]));
                roots = vec![root];
                store.put(&keys::tree_root_seen(&root), &[1])?;
            }
        }

        store_hashes(store, &keys::tree_current_leaves(), &leaves)?;
        store_hashes(store, &keys::tree_current_roots(), &roots)?;

        Ok(PushReceipt {
            root,
            leaves_total: leaves.len(),
            archived,
        })
    }

    fn archive<S: KvStore>(
        &self,
        store: &mut S,
        leaves: &[Hash],
        final_root: &Hash,
    ) -> Result<(), PoolError> {
        store_hashes(store, &keys::tree_archive_leaves(final_root), leaves)?;
        let mut archived = load_hashes(store, &keys::tree_archived_roots())?.unwrap_or_default();
        archived.push(*final_root);
        store_hashes(store, &keys::tree_archived_roots(), &archived)?;
        Ok(())
    }

    /// Whether `root` was ever produced by this pool's tree.
    pub fn root_exists<S: KvStore>(&self, store: &S, root: &Hash) -> Result<bool, PoolError> {
        if store.exists(&keys::tree_root_seen(root))? {
            return Ok(true);
        }
        // Stores written before the first push have no seen markers yet.
        let (_, roots) = self.snapshot(store)?;
        Ok(roots.contains(root))
    }

    /// Membership proof for `leaf` against the latest root of whichever
    /// tree contains it. `root_hint` short-circuits the archive search when
    /// the caller knows which archived tree holds the leaf; without it,
    /// archives are scanned newest first.
    pub fn prove_membership<S: KvStore>(
        &self,
        store: &S,
        leaf: &Hash,
        root_hint: Option<&Hash>,
    ) -> Result<MerklePathProof, PoolError> {
        let (current, _) = self.snapshot(store)?;
        if let Some(proof) = prove_in(&current, leaf)? {
            return Ok(proof);
        }

        if let Some(hint) = root_hint {
            if let Some(leaves) = load_hashes(store, &keys::tree_archive_leaves(hint))? {
                if let Some(proof) = prove_in(&leaves, leaf)? {
                    return Ok(proof);
                }
            }
            return Err(PoolError::LeafNotFound(*leaf));
        }

        // Linear in the number of archived trees; callers holding many
        // archives should pass the root hint instead.
        let archived = load_hashes(store, &keys::tree_archived_roots())?.unwrap_or_default();
        for root in archived.iter().rev() {
            if let Some(leaves) = load_hashes(store, &keys::tree_archive_leaves(root))? {
                if let Some(proof) = prove_in(&leaves, leaf)? {
                    return Ok(proof);
                }
            }
        }
        Err(PoolError::LeafNotFound(*leaf))
    }
}

fn prove_in(leaves: &[Hash], leaf: &Hash) -> Result<Option<MerklePathProof>, PoolError> {
    let index = match leaves.iter().position(|l| l == leaf) {
        Some(i) => i,
        None => return Ok(None),
    };
    let fields: Vec<_> = leaves.iter().map(Hash::to_field).collect();
    let proof = prove(&fields, index)
        .ok_or_else(|| PoolError::MalformedInput("membership proof construction failed".into()))?;
    Ok(Some(proof))
}
