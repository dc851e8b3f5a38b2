//! Transaction payloads accepted by the pool state machine.

use serde::{Deserialize, Serialize};

use mixpool_privacy::encryption::DhSecretGroup;
use mixpool_privacy::hash::Hash;
use mixpool_privacy::keys::PaymentKey;
use mixpool_prover::CircuitKind;

/// One proof plus its public-input blob. Deposits and transfer outputs
/// additionally carry the encrypted note secret for the parties that need
/// to recover it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZkProofInfo {
    /// Compressed Groth16 proof, hex.
    pub proof: String,
    /// Concatenated public field elements, hex.
    pub public_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<DhSecretGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MixAction {
    Config(ConfigAction),
    Deposit(DepositAction),
    Withdraw(WithdrawAction),
    Transfer(TransferAction),
    Authorize(AuthorizeAction),
}

/// Manager-only pool administration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfigAction {
    /// Register (rotate in) a verify key for one circuit. Hex of the
    /// compressed key.
    VerifyKey { circuit: CircuitKind, key: String },
    /// Add or remove an authorizer public key from the allow-list.
    AuthPubKey { key: Hash, add: bool },
    /// Publish a payment key so senders can encrypt notes to its owner.
    PaymentKey(PaymentKey),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositAction {
    pub proofs: Vec<ZkProofInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawAction {
    pub proofs: Vec<ZkProofInfo>,
    /// Total transparent amount claimed; must equal the sum over the
    /// proofs' public amounts.
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferAction {
    pub inputs: Vec<ZkProofInfo>,
    pub output: ZkProofInfo,
    pub change: ZkProofInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeAction {
    pub proof: ZkProofInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Actions travel as JSON inside transactions; the shape must stay
    // stable.
    #[test]
    fn action_json_round_trip() {
        let action = MixAction::Withdraw(WithdrawAction {
            proofs: vec![ZkProofInfo {
                proof: "00ff".to_string(),
                public_input: "aa".to_string(),
                secrets: None,
            }],
            amount: 77,
        });
        let json = serde_json::to_string(&action).unwrap();
        // `secrets: None` is omitted from the wire form.
        assert!(!json.contains("secrets"));
        let back: MixAction = serde_json::from_str(&json).unwrap();
        match back {
            MixAction::Withdraw(w) => {
                assert_eq!(w.amount, 77);
                assert_eq!(w.proofs[0].proof, "00ff");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn config_action_json_names_circuit() {
        let action = MixAction::Config(ConfigAction::VerifyKey {
            circuit: CircuitKind::TransferInput,
            key: "beef".to_string(),
        });
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("TransferInput"));
    }
}
