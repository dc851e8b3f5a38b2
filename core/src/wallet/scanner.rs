//! Chain scanner that rebuilds the wallet note index.
//!
//! The scanner pages through pool transactions from a [`TxSource`],
//! trial-decrypts every note transmission with each local key, and
//! maintains `NoteIndexEntry` records plus two secondary indexes
//! (nullifier and authorize-spend hash, both pointing back at the note
//! hash) so later transactions can flip note statuses without decrypting
//! anything.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use mixpool_privacy::encryption::{DhSecretGroup, try_decrypt_note_secret};
use mixpool_privacy::hash::Hash;
use mixpool_privacy::note::NoteSecret;
use mixpool_prover::public_inputs::{
    DepositPublicInput, TransferInputPublicInput, TransferOutputPublicInput, WithdrawPublicInput,
};

use crate::error::PoolError;
use crate::storage::{KvStore, keys};
use crate::types::MixAction;
use crate::wallet::{NoteIndexEntry, NoteStatus, WalletKey, classify};

const SCAN_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Idle,
    Scanning,
    Finished,
}

/// One pool transaction at a chain position.
#[derive(Debug, Clone)]
pub struct MixTxRecord {
    pub height: u64,
    pub index: u32,
    pub action: MixAction,
}

/// Paged feed of pool transactions, ordered by `(height, index)`.
pub trait TxSource {
    fn list_mix_txs(
        &self,
        height: u64,
        index: u32,
        count: usize,
    ) -> Result<Vec<MixTxRecord>, PoolError>;
}

#[derive(Serialize, Deserialize, Default, Clone, Copy)]
struct Cursor {
    height: u64,
    index: u32,
}

pub struct MixScanner<S> {
    store: Mutex<S>,
    wallet_keys: Vec<WalletKey>,
    status: Mutex<ScanStatus>,
    done: AtomicBool,
    locked: AtomicBool,
}

impl<S: KvStore> MixScanner<S> {
    pub fn new(store: S, wallet_keys: Vec<WalletKey>) -> Self {
        Self {
            store: Mutex::new(store),
            wallet_keys,
            status: Mutex::new(ScanStatus::Idle),
            done: AtomicBool::new(false),
            locked: AtomicBool::new(false),
        }
    }

    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    pub fn status(&self) -> ScanStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ask a running scan to stop after the record it is processing.
    pub fn cancel(&self) {
        self.done.store(true, Ordering::SeqCst);
    }

    /// Scan forward from the persisted cursor. Refuses while the wallet is
    /// locked and while another scan is running.
    pub fn try_rescan<T: TxSource>(&self, source: &T) -> Result<(), PoolError> {
        if self.locked.load(Ordering::SeqCst) {
            return Err(PoolError::WalletLocked);
        }
        {
            let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
            if *status == ScanStatus::Scanning {
                return Err(PoolError::ScanInProgress);
            }
            *status = ScanStatus::Scanning;
        }
        self.done.store(false, Ordering::SeqCst);

        let result = self.scan_loop(source);

        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        *status = ScanStatus::Finished;
        result
    }

    fn scan_loop<T: TxSource>(&self, source: &T) -> Result<(), PoolError> {
        let mut cursor = self.load_cursor()?;
        let mut processed = 0usize;
        loop {
            if self.done.load(Ordering::SeqCst) {
                debug!("scan cancelled at height {} index {}", cursor.height, cursor.index);
                break;
            }
            let page = source.list_mix_txs(cursor.height, cursor.index, SCAN_PAGE)?;
            let page_len = page.len();
            for record in page {
                if self.done.load(Ordering::SeqCst) {
                    break;
                }
                // A record the scanner cannot parse must not wedge the
                // wallet; skip it and keep the cursor moving.
                match self.process(&record) {
                    Ok(()) => {}
                    Err(PoolError::MalformedInput(reason)) => {
                        warn!(
                            "skipping unreadable record at height {} index {}: {reason}",
                            record.height, record.index
                        );
                    }
                    Err(e) => return Err(e),
                }
                cursor = Cursor {
                    height: record.height,
                    index: record.index + 1,
                };
                self.store_cursor(cursor)?;
                processed += 1;
            }
            if page_len < SCAN_PAGE {
                break;
            }
        }
        info!("scan processed {processed} pool transactions");
        Ok(())
    }

    fn process(&self, record: &MixTxRecord) -> Result<(), PoolError> {
        match &record.action {
            MixAction::Deposit(deposit) => {
                for proof in &deposit.proofs {
                    let public = DepositPublicInput::decode(&proof.public_input)?;
                    if let Some(group) = &proof.secrets {
                        self.discover(&public.note_hash, group, record)?;
                    }
                }
            }
            MixAction::Transfer(transfer) => {
                for proof in &transfer.inputs {
                    let public = TransferInputPublicInput::decode(&proof.public_input)?;
                    self.mark_used(&public.nullifier_hash)?;
                }
                for proof in [&transfer.output, &transfer.change] {
                    let public = TransferOutputPublicInput::decode(&proof.public_input)?;
                    if let Some(group) = &proof.secrets {
                        self.discover(&public.note_hash, group, record)?;
                    }
                }
            }
            MixAction::Withdraw(withdraw) => {
                for proof in &withdraw.proofs {
                    let public = WithdrawPublicInput::decode(&proof.public_input)?;
                    self.mark_used(&public.nullifier_hash)?;
                }
            }
            MixAction::Authorize(authorize) => {
                let public = mixpool_prover::public_inputs::AuthorizePublicInput::decode(
                    &authorize.proof.public_input,
                )?;
                self.unfreeze(&public.authorize_spend_hash)?;
            }
            MixAction::Config(_) => {}
        }
        Ok(())
    }

    /// Trial-decrypt a note transmission with every local key. A
    /// decryption only counts when the recovered secret reproduces the
    /// on-chain note hash.
    fn discover(
        &self,
        note_hash: &Hash,
        group: &DhSecretGroup,
        record: &MixTxRecord,
    ) -> Result<(), PoolError> {
        for key in &self.wallet_keys {
            let secret = group
                .iter()
                .find_map(|enc| try_decrypt_note_secret(enc, &key.dh_secret));
            let Some(secret) = secret else { continue };
            if secret.note_hash() != *note_hash {
                debug!("decrypted secret does not match note {note_hash}, skipping");
                continue;
            }
            let Some((role, status, spend_hash)) = classify(&secret, &key.receive_key) else {
                continue;
            };
            self.upsert(NoteIndexEntry {
                note_hash: *note_hash,
                nullifier: secret.nullifier(),
                authorize_spend_hash: spend_hash,
                role,
                status,
                account: key.account.clone(),
                secret,
                height: record.height,
                index: record.index,
            })?;
        }
        Ok(())
    }

    fn upsert(&self, mut entry: NoteIndexEntry) -> Result<(), PoolError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        // A rescan must not resurrect a spent note.
        if let Some(existing) = load_entry(&*store, &entry.note_hash)? {
            if existing.status == NoteStatus::Used {
                entry.status = NoteStatus::Used;
            }
        }
        let bytes = bincode::serialize(&entry).context("encode note index entry")?;
        store.put(&keys::wallet_note(&entry.note_hash), &bytes)?;
        store.put(
            &keys::wallet_nullifier(&entry.nullifier),
            entry.note_hash.as_bytes(),
        )?;
        if !entry.authorize_spend_hash.is_zero() {
            store.put(
                &keys::wallet_auth_spend(&entry.authorize_spend_hash),
                entry.note_hash.as_bytes(),
            )?;
        }
        info!(
            "tracking note {} for {} as {:?} ({:?})",
            entry.note_hash, entry.account, entry.role, entry.status
        );
        Ok(())
    }

    fn mark_used(&self, nullifier: &Hash) -> Result<(), PoolError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let Some(pointer) = store.get(&keys::wallet_nullifier(nullifier))? else {
            return Ok(());
        };
        let note_hash = pointer_hash(&pointer)?;
        if let Some(mut entry) = load_entry(&*store, &note_hash)? {
            entry.status = NoteStatus::Used;
            let bytes = bincode::serialize(&entry).context("encode note index entry")?;
            store.put(&keys::wallet_note(&note_hash), &bytes)?;
            info!("note {note_hash} spent");
        }
        Ok(())
    }

    fn unfreeze(&self, authorize_spend_hash: &Hash) -> Result<(), PoolError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let Some(pointer) = store.get(&keys::wallet_auth_spend(authorize_spend_hash))? else {
            return Ok(());
        };
        let note_hash = pointer_hash(&pointer)?;
        if let Some(mut entry) = load_entry(&*store, &note_hash)? {
            if entry.status == NoteStatus::Frozen {
                entry.status = NoteStatus::Valid;
                let bytes = bincode::serialize(&entry).context("encode note index entry")?;
                store.put(&keys::wallet_note(&note_hash), &bytes)?;
                info!("note {note_hash} authorized");
            }
        }
        Ok(())
    }

    /// Every tracked note, in note-hash order.
    pub fn list_notes(&self) -> Result<Vec<NoteIndexEntry>, PoolError> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let mut notes = Vec::new();
        for (_, value) in store.scan_prefix(&keys::wallet_note_prefix())? {
            let entry: NoteIndexEntry =
                bincode::deserialize(&value).context("decode note index entry")?;
            notes.push(entry);
        }
        Ok(notes)
    }

    pub fn note(&self, note_hash: &Hash) -> Result<Option<NoteIndexEntry>, PoolError> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        load_entry(&*store, note_hash)
    }

    fn load_cursor(&self) -> Result<Cursor, PoolError> {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        match store.get(&keys::wallet_cursor())? {
            Some(bytes) => {
                let cursor = bincode::deserialize(&bytes).context("decode scan cursor")?;
                Ok(cursor)
            }
            None => Ok(Cursor::default()),
        }
    }

    fn store_cursor(&self, cursor: Cursor) -> Result<(), PoolError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let bytes = bincode::serialize(&cursor).context("encode scan cursor")?;
        store.put(&keys::wallet_cursor(), &bytes)?;
        Ok(())
    }
}

fn load_entry<S: KvStore>(store: &S, note_hash: &Hash) -> Result<Option<NoteIndexEntry>, PoolError> {
    match store.get(&keys::wallet_note(note_hash))? {
        Some(bytes) => {
            let entry = bincode::deserialize(&bytes).context("decode note index entry")?;
            Ok(Some(entry))
        }
        None => Ok(None),
    }
}

fn pointer_hash(bytes: &[u8]) -> Result<Hash, PoolError> {
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| PoolError::MalformedInput("note index pointer is not 32 bytes".into()))?;
    Ok(Hash(array))
}
