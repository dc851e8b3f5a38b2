//! Pool parameters, loaded from TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ark_ed_on_bn254::EdwardsAffine;
use serde::{Deserialize, Serialize};

use mixpool_privacy::commitment::{default_h_point, point_from_coords};
use mixpool_privacy::hash::Hash;
use mixpool_privacy::merkle::MAX_TREE_LEAVES;

use crate::error::PoolError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Leaf count at which the current tree is archived. Must stay within
    /// the fixed circuit depth.
    pub max_tree_leaves: usize,
    /// Flat transparent fee charged on every shielded transfer.
    pub transfer_fee: u64,
    /// Addresses allowed to submit Config actions.
    pub managers: Vec<String>,
    /// Configured `H` generator as affine coordinates. Absent means the
    /// built-in default point, which is only suitable for local runs.
    pub h_point: Option<(Hash, Hash)>,
    /// Account holding pooled transparent balance.
    pub pool_account: String,
    /// Sub-account collecting transfer fees.
    pub fee_account: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            max_tree_leaves: MAX_TREE_LEAVES,
            transfer_fee: 5,
            managers: Vec::new(),
            h_point: None,
            pool_account: "mix-pool".to_string(),
            fee_account: "mix-pool-fee".to_string(),
        }
    }
}

impl PoolConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read pool config at {}", path.display()))?;
        let config: PoolConfig = toml::from_str(&raw)
            .with_context(|| format!("parse pool config at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tree_leaves < 2 || self.max_tree_leaves > MAX_TREE_LEAVES {
            anyhow::bail!(
                "max_tree_leaves {} outside supported range 2..={MAX_TREE_LEAVES}",
                self.max_tree_leaves
            );
        }
        if self.pool_account.is_empty() || self.fee_account.is_empty() {
            anyhow::bail!("pool and fee accounts must be configured");
        }
        Ok(())
    }

    pub fn is_manager(&self, addr: &str) -> bool {
        self.managers.iter().any(|m| m == addr)
    }

    /// The configured `H` generator, validated on every use since the
    /// coordinates come from config.
    pub fn h(&self) -> Result<EdwardsAffine, PoolError> {
        match &self.h_point {
            Some((x, y)) => point_from_coords(&x.to_field(), &y.to_field())
                .map_err(|e| PoolError::MalformedInput(format!("configured h point: {e}"))),
            None => Ok(default_h_point()),
        }
    }
}
