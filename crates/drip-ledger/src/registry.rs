//! Productivity registry.
//!
//! Only the bound authority may change a participant's productivity. Every
//! change settles the accumulator and flushes the participant's pending
//! reward into their balance first, so the new weight only earns from the
//! current block onward.

use tracing::{info, warn};

use drip_core::error::LedgerError;
use drip_core::events::LedgerEvent;
use drip_core::types::{Address, CallContext};

use crate::ledger::Ledger;

impl Ledger {
    fn require_authority(&self, ctx: &CallContext) -> Result<(), LedgerError> {
        if ctx.caller != self.global.authority.current() {
            warn!(caller = %ctx.caller, "productivity change from non-authority");
            return Err(LedgerError::Unauthorized { caller: ctx.caller });
        }
        Ok(())
    }

    /// Add `value` to `user`'s productivity.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Unauthorized`] unless `ctx.caller` is the authority
    /// - [`LedgerError::InvalidAmount`] if `value == 0`
    /// - [`LedgerError::BlockRegressed`] / [`LedgerError::ArithmeticOverflow`]
    ///   from settlement
    pub fn increase_productivity(
        &mut self,
        ctx: &CallContext,
        user: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        self.require_authority(ctx)?;
        if value == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let mut staged = self.stage_flush(user, ctx.block)?;
        staged.account.productivity = staged
            .account
            .productivity
            .checked_add(value)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let total = self
            .global
            .total_productivity
            .checked_add(value)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.commit_flush(staged);
        self.global.total_productivity = total;
        self.emit(LedgerEvent::ProductivityIncreased { user: *user, value });
        info!(%user, value, total, block = ctx.block, "productivity increased");
        Ok(())
    }

    /// Remove `value` from `user`'s productivity.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Unauthorized`] unless `ctx.caller` is the authority
    /// - [`LedgerError::InvalidAmount`] if `value == 0`
    /// - [`LedgerError::InsufficientProductivity`] if `value` exceeds the
    ///   user's productivity
    pub fn decrease_productivity(
        &mut self,
        ctx: &CallContext,
        user: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        self.require_authority(ctx)?;
        if value == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let have = self.account(user).productivity;
        if value > have {
            return Err(LedgerError::InsufficientProductivity { have, need: value });
        }

        let mut staged = self.stage_flush(user, ctx.block)?;
        staged.account.productivity = have - value;
        // Sum of accounts ≥ any single account, so this cannot underflow
        // while the productivity-sum invariant holds.
        let total = self
            .global
            .total_productivity
            .checked_sub(value)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.commit_flush(staged);
        self.global.total_productivity = total;
        self.emit(LedgerEvent::ProductivityDecreased { user: *user, value });
        info!(%user, value, total, block = ctx.block, "productivity decreased");
        Ok(())
    }

    /// `(productivity, total_productivity)` as last written. Does not settle.
    pub fn get_productivity(&self, user: &Address) -> (u128, u128) {
        (self.account(user).productivity, self.global.total_productivity)
    }
}
