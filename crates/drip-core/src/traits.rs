//! Trait interfaces for the Drip ledger.
//!
//! - [`Custody`]: collateral custody behind the stake wrapper
//!   (drip-stake implements an in-memory version; hosts plug in their own)

use crate::error::CustodyError;
use crate::types::Address;

/// Holds collateral on behalf of stakers.
///
/// The stake wrapper calls [`deposit`](Custody::deposit) before crediting
/// productivity and [`release`](Custody::release) only after all ledger
/// effects of an unstake are committed.
pub trait Custody {
    /// Move `amount` of collateral from `owner` into custody.
    fn deposit(&mut self, owner: &Address, amount: u128) -> Result<(), CustodyError>;

    /// Undo a [`deposit`](Custody::deposit) made earlier in the same call.
    ///
    /// Must succeed for any deposit that has not yet been released.
    fn refund(&mut self, owner: &Address, amount: u128);

    /// Move `amount` of collateral out of custody to `owner`.
    fn release(&mut self, owner: &Address, amount: u128) -> Result<(), CustodyError>;

    /// Total collateral currently held.
    fn held(&self) -> u128;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // ------------------------------------------------------------------
    // Mock: Custody
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct MockCustody {
        wallets: HashMap<Address, u128>,
        vault: u128,
    }

    impl Custody for MockCustody {
        fn deposit(&mut self, owner: &Address, amount: u128) -> Result<(), CustodyError> {
            let have = self.wallets.get(owner).copied().unwrap_or(0);
            if have < amount {
                return Err(CustodyError::InsufficientFunds { have, need: amount });
            }
            self.wallets.insert(*owner, have - amount);
            self.vault += amount;
            Ok(())
        }

        fn refund(&mut self, owner: &Address, amount: u128) {
            self.vault -= amount;
            *self.wallets.entry(*owner).or_insert(0) += amount;
        }

        fn release(&mut self, owner: &Address, amount: u128) -> Result<(), CustodyError> {
            if self.vault < amount {
                return Err(CustodyError::VaultUnderfunded {
                    held: self.vault,
                    requested: amount,
                });
            }
            self.refund(owner, amount);
            Ok(())
        }

        fn held(&self) -> u128 {
            self.vault
        }
    }

    #[test]
    fn mock_deposit_and_release() {
        let owner = Address([7; 20]);
        let mut c = MockCustody::default();
        c.wallets.insert(owner, 100);
        c.deposit(&owner, 60).unwrap();
        assert_eq!(c.held(), 60);
        c.release(&owner, 60).unwrap();
        assert_eq!(c.held(), 0);
        assert_eq!(c.wallets[&owner], 100);
    }

    #[test]
    fn mock_refund_restores_wallet() {
        let owner = Address([8; 20]);
        let mut c = MockCustody::default();
        c.wallets.insert(owner, 10);
        c.deposit(&owner, 10).unwrap();
        c.refund(&owner, 10);
        assert_eq!(c.wallets[&owner], 10);
        assert_eq!(c.held(), 0);
    }

    #[test]
    fn trait_object_usable() {
        let mut c: Box<dyn Custody> = Box::new(MockCustody::default());
        let err = c.deposit(&Address::ZERO, 1).unwrap_err();
        assert_eq!(err, CustodyError::InsufficientFunds { have: 0, need: 1 });
    }
}
