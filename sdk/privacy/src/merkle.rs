//! Append-only MiMC Merkle accumulator primitives, shared between the
//! chain-side tree manager and the prover's path witnesses.
//!
//! Trees are built bottom-up over whatever leaves exist so far; an unpaired
//! node is promoted to the next level unchanged. Membership proofs carry
//! the leaf itself in `proof_set[0]` followed by one sibling per level that
//! actually had one, so real paths are variable-length and get padded to
//! [`TREE_DEPTH`] only when handed to a circuit.

use ark_bn254::Fr;
use ark_ff::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::Hash;
use crate::mimc::mimc_hash;

/// Fixed circuit depth; a tree is archived before it can outgrow this.
pub const TREE_DEPTH: usize = 10;

/// Capacity bound implied by the circuit depth.
pub const MAX_TREE_LEAVES: usize = 1 << TREE_DEPTH;

#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("path of {0} levels does not fit the fixed circuit depth {TREE_DEPTH}")]
    PathTooDeep(usize),
}

/// First leaf of every tree. Pinning leaf 0 removes the empty-tree and
/// index-0 ambiguities from membership proofs.
pub fn sentinel_leaf() -> Fr {
    mimc_hash(&[Fr::zero()])
}

pub fn node_hash(left: &Fr, right: &Fr) -> Fr {
    mimc_hash(&[*left, *right])
}

/// All tree levels bottom-up, `levels[0]` being the leaves.
pub fn build_levels(leaves: &[Fr]) -> Vec<Vec<Fr>> {
    let mut levels = Vec::new();
    let mut cur = leaves.to_vec();
    while cur.len() > 1 {
        let mut next = Vec::with_capacity(cur.len().div_ceil(2));
        for pair in cur.chunks(2) {
            if let [l, r] = pair {
                next.push(node_hash(l, r));
            } else if let [l] = pair {
                next.push(*l);
            }
        }
        levels.push(cur);
        cur = next;
    }
    levels.push(cur);
    levels
}

/// Root over a non-empty leaf set.
pub fn compute_root(leaves: &[Fr]) -> Fr {
    match build_levels(leaves).last().and_then(|l| l.first()) {
        Some(root) => *root,
        None => sentinel_leaf(),
    }
}

/// One level of a padded path.
#[derive(Debug, Clone, Copy)]
pub struct PathLevel {
    pub sibling: Fr,
    /// True when the running node is the left child at this level.
    pub current_is_left: bool,
}

/// Membership proof as issued by the tree manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePathProof {
    pub root_hash: Hash,
    /// `proof_set[0]` is the leaf; the rest are siblings bottom-up.
    pub proof_set: Vec<Hash>,
    /// One side flag per sibling.
    pub helpers: Vec<bool>,
    pub num_leaves: u32,
}

impl MerklePathProof {
    pub fn leaf(&self) -> Option<&Hash> {
        self.proof_set.first()
    }

    /// Recomputes leaf-to-root and compares against the claimed root.
    pub fn verify(&self) -> bool {
        let Some(leaf) = self.proof_set.first() else {
            return false;
        };
        if self.helpers.len() != self.proof_set.len() - 1 {
            return false;
        }
        let mut cur = leaf.to_field();
        for (sibling, is_left) in self.proof_set[1..].iter().zip(&self.helpers) {
            let s = sibling.to_field();
            cur = if *is_left {
                node_hash(&cur, &s)
            } else {
                node_hash(&s, &cur)
            };
        }
        Hash::from_field(&cur) == self.root_hash
    }

    /// Fixed-depth form the circuits consume; `None` slots are the padding
    /// a shorter real path leaves unused.
    pub fn to_padded(&self) -> Result<[Option<PathLevel>; TREE_DEPTH], MerkleError> {
        let levels = self.proof_set.len().saturating_sub(1);
        if levels > TREE_DEPTH {
            return Err(MerkleError::PathTooDeep(levels));
        }
        let mut out = [None; TREE_DEPTH];
        for (i, (sibling, is_left)) in self.proof_set[1..].iter().zip(&self.helpers).enumerate() {
            out[i] = Some(PathLevel {
                sibling: sibling.to_field(),
                current_is_left: *is_left,
            });
        }
        Ok(out)
    }
}

/// Membership proof for `leaves[index]`.
pub fn prove(leaves: &[Fr], index: usize) -> Option<MerklePathProof> {
    if index >= leaves.len() {
        return None;
    }
    let levels = build_levels(leaves);
    let mut proof_set = vec![Hash::from_field(&leaves[index])];
    let mut helpers = Vec::new();
    let mut idx = index;
    for level in &levels[..levels.len() - 1] {
        let sibling = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
        if sibling < level.len() {
            proof_set.push(Hash::from_field(&level[sibling]));
            helpers.push(idx % 2 == 0);
        }
        idx /= 2;
    }
    let root = levels.last().and_then(|l| l.first())?;
    Some(MerklePathProof {
        root_hash: Hash::from_field(root),
        proof_set,
        helpers,
        num_leaves: leaves.len() as u32,
    })
}
