//! Registries of pool facts: spent nullifiers, consumed authorize hashes,
//! granted spend authorizations, circuit verify keys, authorizer
//! allow-list and published payment keys.
//!
//! Reads go through [`Registry`], writes through [`RegistryMut`], so the
//! executor can hold a read view during validation and only take the write
//! view once a transaction is known to apply cleanly.

use anyhow::Context;

use mixpool_privacy::hash::Hash;
use mixpool_privacy::keys::PaymentKey;
use mixpool_prover::CircuitKind;

use crate::error::PoolError;
use crate::storage::{KvStore, keys};

/// Old verify keys kept alive after a rotation so in-flight proofs still
/// land.
const VERIFY_KEY_RING: usize = 2;

pub struct Registry<'a, S> {
    store: &'a S,
}

impl<'a, S: KvStore> Registry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn nullifier_exists(&self, hash: &Hash) -> Result<bool, PoolError> {
        Ok(self.store.exists(&keys::nullifier(hash))?)
    }

    pub fn authorize_hash_exists(&self, hash: &Hash) -> Result<bool, PoolError> {
        Ok(self.store.exists(&keys::authorize_hash(hash))?)
    }

    /// Errors when a delegated spend references an authorization the pool
    /// never recorded.
    pub fn require_authorize_spend_hash(&self, hash: &Hash) -> Result<(), PoolError> {
        if self.store.exists(&keys::authorize_spend_hash(hash))? {
            Ok(())
        } else {
            Err(PoolError::AuthorizationMissing(*hash))
        }
    }

    /// Verify keys for `circuit`, newest first.
    pub fn verify_keys(&self, circuit: CircuitKind) -> Result<Vec<Vec<u8>>, PoolError> {
        match self.store.get(&keys::verify_keys(circuit.name()))? {
            Some(bytes) => {
                let ring: Vec<Vec<u8>> =
                    bincode::deserialize(&bytes).context("decode verify key ring")?;
                Ok(ring)
            }
            None => Ok(Vec::new()),
        }
    }

    pub fn auth_pubkey_allowed(&self, key: &Hash) -> Result<bool, PoolError> {
        Ok(self.store.exists(&keys::auth_pubkey(key))?)
    }

    pub fn payment_key(&self, addr: &str) -> Result<Option<PaymentKey>, PoolError> {
        match self.store.get(&keys::payment_key(addr))? {
            Some(bytes) => {
                let key = bincode::deserialize(&bytes).context("decode payment key")?;
                Ok(Some(key))
            }
            None => Ok(None),
        }
    }
}

pub struct RegistryMut<'a, S> {
    store: &'a mut S,
}

impl<'a, S: KvStore> RegistryMut<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub fn insert_nullifier(&mut self, hash: &Hash) -> Result<(), PoolError> {
        let key = keys::nullifier(hash);
        if self.store.exists(&key)? {
            return Err(PoolError::DoubleSpend(*hash));
        }
        self.store.put(&key, &[1])?;
        Ok(())
    }

    pub fn insert_authorize_hash(&mut self, hash: &Hash) -> Result<(), PoolError> {
        let key = keys::authorize_hash(hash);
        if self.store.exists(&key)? {
            return Err(PoolError::AuthorizationReplay(*hash));
        }
        self.store.put(&key, &[1])?;
        Ok(())
    }

    /// Idempotent: granting the same spend hash twice is harmless.
    pub fn insert_authorize_spend_hash(&mut self, hash: &Hash) -> Result<(), PoolError> {
        self.store.put(&keys::authorize_spend_hash(hash), &[1])?;
        Ok(())
    }

    /// Prepend a new verify key, keeping at most [`VERIFY_KEY_RING`] keys.
    pub fn push_verify_key(&mut self, circuit: CircuitKind, key: Vec<u8>) -> Result<(), PoolError> {
        let mut ring = Registry::new(&*self.store).verify_keys(circuit)?;
        ring.insert(0, key);
        ring.truncate(VERIFY_KEY_RING);
        let bytes = bincode::serialize(&ring).context("encode verify key ring")?;
        self.store.put(&keys::verify_keys(circuit.name()), &bytes)?;
        Ok(())
    }

    pub fn set_auth_pubkey(&mut self, key: &Hash, allowed: bool) -> Result<(), PoolError> {
        let store_key = keys::auth_pubkey(key);
        if allowed {
            self.store.put(&store_key, &[1])?;
        } else {
            self.store.delete(&store_key)?;
        }
        Ok(())
    }

    pub fn set_payment_key(&mut self, payment: &PaymentKey) -> Result<(), PoolError> {
        let bytes = bincode::serialize(payment).context("encode payment key")?;
        self.store.put(&keys::payment_key(&payment.addr), &bytes)?;
        Ok(())
    }
}
