//! The five constraint systems.

mod authorize;
mod deposit;
mod transfer;
mod withdraw;

pub use authorize::AuthorizeCircuit;
pub use deposit::DepositCircuit;
pub use transfer::{TransferInputCircuit, TransferOutputCircuit};
pub use withdraw::WithdrawCircuit;

use serde::{Deserialize, Serialize};

/// Circuit identifier, used to key verify-key storage and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitKind {
    Deposit,
    Withdraw,
    TransferInput,
    TransferOutput,
    Authorize,
}

impl CircuitKind {
    pub const ALL: [CircuitKind; 5] = [
        CircuitKind::Deposit,
        CircuitKind::Withdraw,
        CircuitKind::TransferInput,
        CircuitKind::TransferOutput,
        CircuitKind::Authorize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CircuitKind::Deposit => "deposit",
            CircuitKind::Withdraw => "withdraw",
            CircuitKind::TransferInput => "transfer-input",
            CircuitKind::TransferOutput => "transfer-output",
            CircuitKind::Authorize => "authorize",
        }
    }
}

impl std::fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
