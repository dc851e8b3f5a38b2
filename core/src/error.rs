//! Error taxonomy for pool transactions.
//!
//! Every check is local to one transaction; on any failure the whole
//! transaction's state effects are discarded and the error surfaces to the
//! submitter. Nothing is retried on-chain.

use thiserror::Error;

use mixpool_privacy::hash::Hash;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("proof failed verification against every stored {0} key")]
    ProofInvalid(&'static str),
    #[error("no verify key registered for {0}")]
    MissingVerifyKey(&'static str),
    #[error("tree root {0} is neither current nor archived")]
    UnknownRoot(Hash),
    #[error("nullifier {0} already spent")]
    DoubleSpend(Hash),
    #[error("authorize hash {0} already recorded")]
    AuthorizationReplay(Hash),
    #[error("no authorization recorded for spend hash {0}")]
    AuthorizationMissing(Hash),
    #[error("value mismatch: {0}")]
    ValueMismatch(String),
    #[error("leaf {0} not found in any known tree")]
    LeafNotFound(Hash),
    #[error("address {0} is not a pool manager")]
    NotAuthorized(String),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("payment key not found for {0}")]
    PaymentKeyNotFound(String),
    #[error("ledger: {0}")]
    Ledger(String),
    #[error("wallet is locked")]
    WalletLocked,
    #[error("a rescan is already running")]
    ScanInProgress,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<mixpool_prover::public_inputs::PublicInputError> for PoolError {
    fn from(e: mixpool_prover::public_inputs::PublicInputError) -> Self {
        PoolError::MalformedInput(e.to_string())
    }
}
