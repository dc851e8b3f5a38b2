//! Pool state machine.
//!
//! Every handler runs in two phases: a validation pass that only reads
//! state while staging a [`StateDelta`], and an apply pass that moves
//! transparent balance and writes the delta. A transaction that fails any
//! check leaves no trace.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use mixpool_privacy::commitment::{check_conservation, point_coords, point_from_coords};
use mixpool_privacy::hash::Hash;
use mixpool_prover::CircuitKind;
use mixpool_prover::public_inputs::{
    AuthorizePublicInput, DepositPublicInput, TransferInputPublicInput,
    TransferOutputPublicInput, WithdrawPublicInput,
};
use mixpool_prover::snark::SnarkVerifier;

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::registry::{Registry, RegistryMut};
use crate::storage::KvStore;
use crate::tree::{CommitTree, PushReceipt};
use crate::types::{
    AuthorizeAction, ConfigAction, DepositAction, MixAction, TransferAction, WithdrawAction,
    ZkProofInfo,
};

/// Transparent-balance boundary. The pool only ever moves whole balances
/// between named accounts; everything else stays shielded.
pub trait LedgerAdapter {
    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<(), PoolError>;
}

/// Account map backing tests and single-process runs.
#[derive(Default)]
pub struct MemoryLedger {
    balances: HashMap<String, u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, account: &str, amount: u64) {
        *self.balances.entry(account.to_string()).or_default() += amount;
    }

    pub fn balance(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}

impl LedgerAdapter for MemoryLedger {
    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<(), PoolError> {
        let available = self.balance(from);
        if available < amount {
            return Err(PoolError::Ledger(format!(
                "{from} holds {available}, needs {amount}"
            )));
        }
        *self.balances.entry(from.to_string()).or_default() = available - amount;
        *self.balances.entry(to.to_string()).or_default() += amount;
        Ok(())
    }
}

/// Everything a validated transaction wants to write, staged until all
/// checks have passed.
#[derive(Default)]
struct StateDelta {
    moves: Vec<(String, String, u64)>,
    nullifiers: Vec<Hash>,
    authorize_hashes: Vec<Hash>,
    authorize_spend_hashes: Vec<Hash>,
    new_leaves: Vec<Hash>,
}

#[derive(Debug, Default)]
pub struct ExecReceipt {
    /// Tree state after the action, when it appended leaves.
    pub tree: Option<PushReceipt>,
}

pub struct MixExecutor<S, L, V> {
    pub store: S,
    pub ledger: L,
    verifier: V,
    tree: CommitTree,
    config: PoolConfig,
}

impl<S: KvStore, L: LedgerAdapter, V: SnarkVerifier> MixExecutor<S, L, V> {
    pub fn new(store: S, ledger: L, verifier: V, config: PoolConfig) -> Self {
        let tree = CommitTree::new(config.max_tree_leaves);
        Self {
            store,
            ledger,
            verifier,
            tree,
            config,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn tree(&self) -> &CommitTree {
        &self.tree
    }

    pub fn execute(&mut self, from: &str, action: &MixAction) -> Result<ExecReceipt, PoolError> {
        match action {
            MixAction::Config(config) => self.execute_config(from, config),
            MixAction::Deposit(deposit) => self.execute_deposit(from, deposit),
            MixAction::Withdraw(withdraw) => self.execute_withdraw(from, withdraw),
            MixAction::Transfer(transfer) => self.execute_transfer(transfer),
            MixAction::Authorize(authorize) => self.execute_authorize(authorize),
        }
    }

    fn execute_config(
        &mut self,
        from: &str,
        action: &ConfigAction,
    ) -> Result<ExecReceipt, PoolError> {
        if !self.config.is_manager(from) {
            return Err(PoolError::NotAuthorized(from.to_string()));
        }
        let mut registry = RegistryMut::new(&mut self.store);
        match action {
            ConfigAction::VerifyKey { circuit, key } => {
                let bytes = hex::decode(key)
                    .map_err(|e| PoolError::MalformedInput(format!("verify key hex: {e}")))?;
                registry.push_verify_key(*circuit, bytes)?;
                info!("rotated verify key for {circuit}");
            }
            ConfigAction::AuthPubKey { key, add } => {
                registry.set_auth_pubkey(key, *add)?;
                info!("authorizer {key} {}", if *add { "added" } else { "removed" });
            }
            ConfigAction::PaymentKey(payment) => {
                registry.set_payment_key(payment)?;
                info!("payment key published for {}", payment.addr);
            }
        }
        Ok(ExecReceipt::default())
    }

    fn execute_deposit(
        &mut self,
        from: &str,
        action: &DepositAction,
    ) -> Result<ExecReceipt, PoolError> {
        if action.proofs.is_empty() {
            return Err(PoolError::MalformedInput("deposit carries no proofs".into()));
        }

        let mut delta = StateDelta::default();
        let mut seen = HashSet::new();
        let mut total: u64 = 0;
        for proof in &action.proofs {
            let public = DepositPublicInput::decode(&proof.public_input)?;
            if !seen.insert(public.note_hash) {
                return Err(PoolError::MalformedInput(format!(
                    "duplicate note hash {} in deposit",
                    public.note_hash
                )));
            }
            if public.amount == 0 {
                return Err(PoolError::MalformedInput("zero-amount deposit".into()));
            }
            self.verify_any(CircuitKind::Deposit, proof)?;
            total = total
                .checked_add(public.amount)
                .ok_or_else(|| PoolError::MalformedInput("deposit total overflows".into()))?;
            delta.new_leaves.push(public.note_hash);
        }
        delta.moves.push((
            from.to_string(),
            self.config.pool_account.clone(),
            total,
        ));

        let receipt = self.apply(delta)?;
        info!("deposit of {total} from {from} accepted");
        Ok(receipt)
    }

    fn execute_withdraw(
        &mut self,
        from: &str,
        action: &WithdrawAction,
    ) -> Result<ExecReceipt, PoolError> {
        if action.proofs.is_empty() {
            return Err(PoolError::MalformedInput("withdraw carries no proofs".into()));
        }

        let mut delta = StateDelta::default();
        let mut spent = HashSet::new();
        let mut total: u64 = 0;
        for proof in &action.proofs {
            let public = WithdrawPublicInput::decode(&proof.public_input)?;
            self.check_spend_input(
                &public.tree_root_hash,
                &public.nullifier_hash,
                &public.authorize_spend_hash,
                &mut spent,
            )?;
            self.verify_any(CircuitKind::Withdraw, proof)?;
            total = total
                .checked_add(public.amount)
                .ok_or_else(|| PoolError::MalformedInput("withdraw total overflows".into()))?;
            delta.nullifiers.push(public.nullifier_hash);
        }
        if total != action.amount {
            return Err(PoolError::ValueMismatch(format!(
                "withdraw claims {} but proofs release {total}",
                action.amount
            )));
        }
        delta.moves.push((
            self.config.pool_account.clone(),
            from.to_string(),
            total,
        ));

        let receipt = self.apply(delta)?;
        info!("withdraw of {total} to {from} accepted");
        Ok(receipt)
    }

    fn execute_transfer(&mut self, action: &TransferAction) -> Result<ExecReceipt, PoolError> {
        if action.inputs.is_empty() {
            return Err(PoolError::MalformedInput("transfer has no inputs".into()));
        }

        let mut delta = StateDelta::default();
        let mut spent = HashSet::new();
        let mut input_points = Vec::with_capacity(action.inputs.len());
        for proof in &action.inputs {
            let public = TransferInputPublicInput::decode(&proof.public_input)?;
            self.check_spend_input(
                &public.tree_root_hash,
                &public.nullifier_hash,
                &public.authorize_spend_hash,
                &mut spent,
            )?;
            self.verify_any(CircuitKind::TransferInput, proof)?;
            input_points.push(decode_commitment(
                &public.shield_amount_x,
                &public.shield_amount_y,
            )?);
            delta.nullifiers.push(public.nullifier_hash);
        }

        let h = self.config.h()?;
        let (h_x, h_y) = point_coords(&h);
        let mut output_points = Vec::with_capacity(2);
        let mut output_notes = Vec::with_capacity(2);
        for proof in [&action.output, &action.change] {
            let public = TransferOutputPublicInput::decode(&proof.public_input)?;
            if public.shield_point_h_x.to_field() != h_x
                || public.shield_point_h_y.to_field() != h_y
            {
                return Err(PoolError::ValueMismatch(
                    "output proved against a foreign blinding generator".into(),
                ));
            }
            self.verify_any(CircuitKind::TransferOutput, proof)?;
            output_points.push(decode_commitment(
                &public.shield_amount_x,
                &public.shield_amount_y,
            )?);
            output_notes.push(public.note_hash);
        }
        if output_notes[0] == output_notes[1] {
            return Err(PoolError::MalformedInput(
                "transfer output and change share a note hash".into(),
            ));
        }

        let fee = self.config.transfer_fee;
        if !check_conservation(&input_points, &output_points, fee) {
            return Err(PoolError::ValueMismatch(
                "inputs do not balance outputs plus fee".into(),
            ));
        }

        delta.moves.push((
            self.config.pool_account.clone(),
            self.config.fee_account.clone(),
            fee,
        ));
        delta.new_leaves = output_notes;

        let receipt = self.apply(delta)?;
        info!(
            "transfer with {} inputs accepted, fee {fee}",
            action.inputs.len()
        );
        Ok(receipt)
    }

    fn execute_authorize(&mut self, action: &AuthorizeAction) -> Result<ExecReceipt, PoolError> {
        let public = AuthorizePublicInput::decode(&action.proof.public_input)?;
        let registry = Registry::new(&self.store);
        if !self.tree.root_exists(&self.store, &public.tree_root_hash)? {
            return Err(PoolError::UnknownRoot(public.tree_root_hash));
        }
        if registry.authorize_hash_exists(&public.authorize_hash)? {
            return Err(PoolError::AuthorizationReplay(public.authorize_hash));
        }
        self.verify_any(CircuitKind::Authorize, &action.proof)?;

        let delta = StateDelta {
            authorize_hashes: vec![public.authorize_hash],
            authorize_spend_hashes: vec![public.authorize_spend_hash],
            ..StateDelta::default()
        };
        let receipt = self.apply(delta)?;
        info!("authorization {} recorded", public.authorize_spend_hash);
        Ok(receipt)
    }

    /// Shared validation for withdraw and transfer inputs: the proved root
    /// must be one the tree produced, the nullifier must be fresh both in
    /// state and within this transaction, and a delegated spend must point
    /// at a recorded authorization.
    fn check_spend_input(
        &self,
        root: &Hash,
        nullifier: &Hash,
        authorize_spend_hash: &Hash,
        spent_in_tx: &mut HashSet<Hash>,
    ) -> Result<(), PoolError> {
        if !self.tree.root_exists(&self.store, root)? {
            return Err(PoolError::UnknownRoot(*root));
        }
        let registry = Registry::new(&self.store);
        if registry.nullifier_exists(nullifier)? || !spent_in_tx.insert(*nullifier) {
            return Err(PoolError::DoubleSpend(*nullifier));
        }
        if !authorize_spend_hash.is_zero() {
            registry.require_authorize_spend_hash(authorize_spend_hash)?;
        }
        Ok(())
    }

    /// Accept the proof if any live verify key for the circuit accepts it.
    /// Keys are tried newest first; deserialization failures on an old key
    /// are logged and skipped.
    fn verify_any(&self, circuit: CircuitKind, proof: &ZkProofInfo) -> Result<(), PoolError> {
        let ring = Registry::new(&self.store).verify_keys(circuit)?;
        if ring.is_empty() {
            return Err(PoolError::MissingVerifyKey(circuit.name()));
        }
        for key in &ring {
            match self
                .verifier
                .verify(key, &proof.proof, &proof.public_input)
            {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => debug!("verify key for {circuit} rejected proof blob: {e}"),
            }
        }
        Err(PoolError::ProofInvalid(circuit.name()))
    }

    fn apply(&mut self, delta: StateDelta) -> Result<ExecReceipt, PoolError> {
        // Balance movement goes first: it is the only apply step that can
        // still legitimately fail (insufficient funds), and nothing has
        // been written yet at that point.
        for (from, to, amount) in &delta.moves {
            self.ledger.transfer(from, to, *amount)?;
        }
        let mut registry = RegistryMut::new(&mut self.store);
        for nullifier in &delta.nullifiers {
            registry.insert_nullifier(nullifier)?;
        }
        for hash in &delta.authorize_hashes {
            registry.insert_authorize_hash(hash)?;
        }
        for hash in &delta.authorize_spend_hashes {
            registry.insert_authorize_spend_hash(hash)?;
        }
        let tree = if delta.new_leaves.is_empty() {
            None
        } else {
            Some(self.tree.push(&mut self.store, &delta.new_leaves)?)
        };
        Ok(ExecReceipt { tree })
    }
}

fn decode_commitment(
    x: &Hash,
    y: &Hash,
) -> Result<ark_ed_on_bn254::EdwardsAffine, PoolError> {
    point_from_coords(&x.to_field(), &y.to_field())
        .map_err(|e| PoolError::MalformedInput(format!("value commitment: {e}")))
}
