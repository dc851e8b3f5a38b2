//! Chain-side state machine of the shielded pool.
//!
//! The flow through a transaction:
//!
//! ```text
//!   MixAction ──▶ MixExecutor ──▶ proof checks (SnarkVerifier)
//!                     │                 │
//!                     │                 ▼
//!                     │           Registry (nullifiers, authorize
//!                     │           hashes, verify keys)
//!                     ▼
//!                CommitTree ──▶ KvStore (rocksdb / memory)
//! ```
//!
//! Wallets live on the other side of the chain boundary and only consume
//! `query` and `wallet`.

pub mod config;
pub mod error;
pub mod executor;
pub mod query;
pub mod registry;
pub mod storage;
pub mod tree;
pub mod types;
pub mod wallet;

#[cfg(test)]
mod tests;

pub use config::PoolConfig;
pub use error::PoolError;
pub use executor::{ExecReceipt, LedgerAdapter, MemoryLedger, MixExecutor};
pub use storage::{KvStore, MemoryStore, db::RocksDbStore};
pub use tree::CommitTree;
pub use types::MixAction;
