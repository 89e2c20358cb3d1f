//! Events emitted by ledger operations.
//!
//! The ledger appends these to its event log in the order the effects
//! were committed. Failed operations emit nothing.

use serde::{Deserialize, Serialize};

use crate::types::Address;

/// A ledger event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Tokens moved between balances. `from == Address::ZERO` marks newly
    /// realized interest.
    Transfer { from: Address, to: Address, value: u128 },
    /// `owner` set `spender`'s allowance to `value`.
    Approval { owner: Address, spender: Address, value: u128 },
    /// Emission rate changed.
    InterestRatePerBlockChanged { old_value: u128, new_value: u128 },
    ProductivityIncreased { user: Address, value: u128 },
    ProductivityDecreased { user: Address, value: u128 },
    /// Productivity authority was rebound from the deployer.
    AuthorityUpgraded { old_authority: Address, new_authority: Address },
    GovernorChanged { old_governor: Address, new_governor: Address },
}

impl LedgerEvent {
    /// Short event name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::InterestRatePerBlockChanged { .. } => "InterestRatePerBlockChanged",
            Self::ProductivityIncreased { .. } => "ProductivityIncreased",
            Self::ProductivityDecreased { .. } => "ProductivityDecreased",
            Self::AuthorityUpgraded { .. } => "AuthorityUpgraded",
            Self::GovernorChanged { .. } => "GovernorChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let e = LedgerEvent::ProductivityIncreased {
            user: Address::ZERO,
            value: 1,
        };
        assert_eq!(e.name(), "ProductivityIncreased");
    }

    #[test]
    fn json_is_tagged() {
        let e = LedgerEvent::InterestRatePerBlockChanged {
            old_value: 1,
            new_value: 2,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["event"], "interest_rate_per_block_changed");
        assert_eq!(json["new_value"], 2);
    }
}
