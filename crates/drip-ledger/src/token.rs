//! Fungible-token bookkeeping over realized balances.
//!
//! Transfers move realized balance only; they never settle and never move
//! productivity, so pending reward stays with the participant who earned it.

use drip_core::error::LedgerError;
use drip_core::events::LedgerEvent;
use drip_core::types::{Address, CallContext};

use crate::ledger::Ledger;

impl Ledger {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Sum of all realized balances.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Realized balance of `owner`. Excludes unrealized pending reward.
    pub fn balance_of(&self, owner: &Address) -> u128 {
        self.accounts.get(owner).map_or(0, |a| a.balance)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Move `value` from `ctx.caller` to `to`.
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        to: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        self.move_balance(&ctx.caller, to, value)
    }

    /// Set `spender`'s allowance over `ctx.caller`'s balance to `value`.
    pub fn approve(
        &mut self,
        ctx: &CallContext,
        spender: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        self.allowances.insert((ctx.caller, *spender), value);
        self.emit(LedgerEvent::Approval {
            owner: ctx.caller,
            spender: *spender,
            value,
        });
        Ok(())
    }

    /// Move `value` from `from` to `to`, spending `ctx.caller`'s allowance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientBalance`] if either the allowance or
    /// `from`'s balance is short.
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: &Address,
        to: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, &ctx.caller);
        if allowed < value {
            return Err(LedgerError::InsufficientBalance {
                have: allowed,
                need: value,
            });
        }
        self.move_balance(from, to, value)?;
        self.allowances.insert((*from, ctx.caller), allowed - value);
        Ok(())
    }

    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        let have = self.balance_of(from);
        if have < value {
            return Err(LedgerError::InsufficientBalance { have, need: value });
        }
        // A zero-value transfer must not create records for either side.
        if from != to && value > 0 {
            let credited = self
                .balance_of(to)
                .checked_add(value)
                .ok_or(LedgerError::ArithmeticOverflow)?;
            self.accounts.entry(*from).or_default().balance = have - value;
            self.accounts.entry(*to).or_default().balance = credited;
        }
        self.emit(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            value,
        });
        Ok(())
    }
}
