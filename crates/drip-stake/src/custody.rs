//! In-memory collateral custody.
//!
//! Tracks each owner's free collateral ("wallet") and the vault balance
//! held on behalf of stakers. Suitable for tests and the CLI; hosts with a
//! real collateral asset implement [`Custody`] themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use drip_core::error::CustodyError;
use drip_core::traits::Custody;
use drip_core::types::Address;

/// Collateral wallets plus a single vault.
///
/// # Invariants
///
/// * `vault + Σ wallets` only changes through [`MemoryCustody::fund`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCustody {
    wallets: BTreeMap<Address, u128>,
    vault: u128,
    /// When set, every release is rejected. Lets tests exercise the
    /// unstake rollback path.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    freeze_releases: bool,
}

impl MemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of fresh collateral to `owner`'s wallet.
    pub fn fund(&mut self, owner: &Address, amount: u128) -> Result<(), CustodyError> {
        let wallet = self.wallets.entry(*owner).or_insert(0);
        *wallet = wallet
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Rejected("wallet overflow".into()))?;
        debug!(%owner, amount, "wallet funded");
        Ok(())
    }

    /// Free collateral held by `owner` outside the vault.
    pub fn wallet(&self, owner: &Address) -> u128 {
        self.wallets.get(owner).copied().unwrap_or(0)
    }

    /// Reject (or stop rejecting) all releases.
    pub fn set_freeze_releases(&mut self, frozen: bool) {
        self.freeze_releases = frozen;
    }
}

impl Custody for MemoryCustody {
    fn deposit(&mut self, owner: &Address, amount: u128) -> Result<(), CustodyError> {
        let have = self.wallet(owner);
        if have < amount {
            return Err(CustodyError::InsufficientFunds { have, need: amount });
        }
        let vault = self
            .vault
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Rejected("vault overflow".into()))?;
        self.wallets.insert(*owner, have - amount);
        self.vault = vault;
        Ok(())
    }

    fn refund(&mut self, owner: &Address, amount: u128) {
        // Reverses a deposit of `amount` from this same owner, which
        // removed exactly that much from the wallet; both sides fit.
        self.vault -= amount;
        *self.wallets.entry(*owner).or_insert(0) += amount;
    }

    fn release(&mut self, owner: &Address, amount: u128) -> Result<(), CustodyError> {
        if self.freeze_releases {
            return Err(CustodyError::Rejected("releases frozen".into()));
        }
        if self.vault < amount {
            return Err(CustodyError::VaultUnderfunded {
                held: self.vault,
                requested: amount,
            });
        }
        let wallet = self
            .wallet(owner)
            .checked_add(amount)
            .ok_or_else(|| CustodyError::Rejected("wallet overflow".into()))?;
        self.vault -= amount;
        self.wallets.insert(*owner, wallet);
        Ok(())
    }

    fn held(&self) -> u128 {
        self.vault
    }
}
