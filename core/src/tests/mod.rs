//! End-to-end tests of the pool state machine and the wallet scanner.

mod executor;

use ark_bn254::Fr;

use mixpool_privacy::hash::Hash;
use mixpool_privacy::note::NoteSecret;
use mixpool_prover::CircuitKind;
use mixpool_prover::snark::{SnarkError, SnarkVerifier};

use crate::config::PoolConfig;
use crate::executor::{MemoryLedger, MixExecutor};
use crate::storage::MemoryStore;
use crate::types::{ConfigAction, MixAction};

/// Accepts every proof; lets the executor tests exercise state transitions
/// without running Groth16.
pub(crate) struct AlwaysValid;

impl SnarkVerifier for AlwaysValid {
    fn verify(&self, _vk: &[u8], _proof: &str, _public: &str) -> Result<bool, SnarkError> {
        Ok(true)
    }
}

/// Accepts a proof only when verified against one specific key; used by
/// the rotation tests.
pub(crate) struct KeyedVerifier(pub Vec<u8>);

impl SnarkVerifier for KeyedVerifier {
    fn verify(&self, vk: &[u8], _proof: &str, _public: &str) -> Result<bool, SnarkError> {
        Ok(vk == self.0.as_slice())
    }
}

pub(crate) const GOV: &str = "gov";

pub(crate) fn pool_config() -> PoolConfig {
    PoolConfig {
        managers: vec![GOV.to_string()],
        max_tree_leaves: 16,
        ..PoolConfig::default()
    }
}

pub(crate) fn test_executor<V: SnarkVerifier>(
    verifier: V,
) -> MixExecutor<MemoryStore, MemoryLedger, V> {
    let _ = env_logger::builder().is_test(true).try_init();
    MixExecutor::new(MemoryStore::new(), MemoryLedger::new(), verifier, pool_config())
}

/// Register a placeholder verify key for every circuit so `verify_any`
/// finds a ring.
pub(crate) fn register_all_keys<V: SnarkVerifier>(
    executor: &mut MixExecutor<MemoryStore, MemoryLedger, V>,
) {
    for circuit in CircuitKind::ALL {
        executor
            .execute(
                GOV,
                &MixAction::Config(ConfigAction::VerifyKey {
                    circuit,
                    key: hex::encode(circuit.name()),
                }),
            )
            .unwrap();
    }
}

pub(crate) fn hash(n: u64) -> Hash {
    Hash::from_field(&Fr::from(n))
}

pub(crate) fn plain_note(amount: u64, random: u64) -> NoteSecret {
    NoteSecret {
        receiver_key: hash(11),
        return_key: Hash::zero(),
        authorize_key: Hash::zero(),
        amount,
        note_random: hash(random),
    }
}
