//! Ledger state records.
//!
//! [`GlobalLedgerState`] holds the aggregate accrual counters and the two
//! privileged roles. [`ParticipantAccount`] holds one participant's weight,
//! reward checkpoint, and realized balance.

use serde::{Deserialize, Serialize};

use drip_core::constants::{DECIMALS, DEFAULT_NAME, DEFAULT_SYMBOL};
use drip_core::types::{Address, U256};

/// Who may mutate productivity.
///
/// Starts `Unbound` with the deployer in control and moves to `Bound`
/// exactly once. There is no transition out of `Bound`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "address", rename_all = "snake_case")]
pub enum AuthorityBinding {
    /// Deployer holds the authority; rebinding is still possible.
    Unbound(Address),
    /// Authority permanently bound (typically to a stake wrapper).
    Bound(Address),
}

impl AuthorityBinding {
    /// The address currently allowed to change productivity.
    pub fn current(&self) -> Address {
        match self {
            Self::Unbound(a) | Self::Bound(a) => *a,
        }
    }

    /// Whether the one-time rebinding has happened.
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

/// Aggregate accrual counters. One per ledger.
///
/// # Invariants
///
/// * `total_productivity` equals the sum of every account's `productivity`
/// * `acc_amount_per_share` never decreases
/// * `mint_cumulation` equals the sum of every settled reward
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalLedgerState {
    pub total_productivity: u128,
    /// Reward per unit of productivity since genesis, scaled by `PRECISION`.
    /// 256 bits wide: a tiny total productivity can push it past `u128`.
    pub acc_amount_per_share: U256,
    pub last_reward_block: u64,
    pub mint_cumulation: u128,
    pub interests_per_block: u128,
    pub authority: AuthorityBinding,
    /// Holder of the rate-change capability.
    pub governor: Address,
}

impl GlobalLedgerState {
    /// Fresh state deployed by `deployer` at `block`.
    pub fn genesis(deployer: Address, interests_per_block: u128, block: u64) -> Self {
        Self {
            total_productivity: 0,
            acc_amount_per_share: U256::zero(),
            last_reward_block: block,
            mint_cumulation: 0,
            interests_per_block,
            authority: AuthorityBinding::Unbound(deployer),
            governor: deployer,
        }
    }
}

/// One participant's ledger record.
///
/// Created when it first gains productivity or balance and never removed
/// after that. An account with zero productivity and zero balance is
/// indistinguishable from an absent one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAccount {
    pub productivity: u128,
    /// `acc_amount_per_share` at this account's last settlement touch.
    pub checkpoint: U256,
    /// Realized token balance.
    pub balance: u128,
}

impl ParticipantAccount {
    /// Whether the account holds nothing.
    pub fn is_empty(&self) -> bool {
        self.productivity == 0 && self.balance == 0
    }
}

/// Fungible-token metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            decimals: DECIMALS,
        }
    }
}
