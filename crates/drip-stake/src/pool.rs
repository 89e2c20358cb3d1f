//! Stake wrapper.
//!
//! One unit of staked collateral is one unit of productivity. The pool
//! calls the ledger as its bound authority, so it must be installed with
//! [`StakePool::bind`] before the first stake.
//!
//! Ordering per call:
//! - `stake`: custody deposit → productivity increase → position update.
//!   A failed increase refunds the deposit.
//! - `unstake`: productivity decrease → position update → custody release.
//!   The release is the only external interaction and runs last; if it
//!   fails the ledger is rolled back to a savepoint taken before the
//!   decrease.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use drip_core::error::{LedgerError, StakeError};
use drip_core::traits::Custody;
use drip_core::types::{Address, CallContext};
use drip_ledger::Ledger;

/// Collateral positions plus the custody holding them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakePool<C> {
    /// Address the pool acts under when calling the ledger.
    address: Address,
    custody: C,
    positions: BTreeMap<Address, u128>,
    total_staked: u128,
}

impl<C: Custody> StakePool<C> {
    pub fn new(address: Address, custody: C) -> Self {
        Self {
            address,
            custody,
            positions: BTreeMap::new(),
            total_staked: 0,
        }
    }

    /// Bind this pool as `ledger`'s productivity authority. `deployer` must
    /// be the ledger's deployer and the ledger must still be unbound.
    pub fn bind(&self, ledger: &mut Ledger, deployer: &CallContext) -> Result<(), LedgerError> {
        ledger.upgrade_impl(deployer, &self.address)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Collateral staked by `owner`.
    pub fn position(&self, owner: &Address) -> u128 {
        self.positions.get(owner).copied().unwrap_or(0)
    }

    pub fn total_staked(&self) -> u128 {
        self.total_staked
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    /// Stake `amount` of `ctx.caller`'s collateral.
    ///
    /// # Errors
    ///
    /// - [`StakeError::InvalidAmount`] if `amount == 0`
    /// - [`StakeError::Custody`] if the deposit is refused
    /// - [`StakeError::Ledger`] if the productivity increase fails; the
    ///   deposit is refunded
    pub fn stake(
        &mut self,
        ledger: &mut Ledger,
        ctx: &CallContext,
        amount: u128,
    ) -> Result<(), StakeError> {
        if amount == 0 {
            return Err(StakeError::InvalidAmount);
        }
        let position = self
            .position(&ctx.caller)
            .checked_add(amount)
            .ok_or(StakeError::ArithmeticOverflow)?;
        let total = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakeError::ArithmeticOverflow)?;

        self.custody.deposit(&ctx.caller, amount)?;
        let as_pool = ctx.with_caller(self.address);
        if let Err(e) = ledger.increase_productivity(&as_pool, &ctx.caller, amount) {
            warn!(
                staker = %ctx.caller,
                amount,
                error = %e,
                "stake rejected by ledger, refunding"
            );
            self.custody.refund(&ctx.caller, amount);
            return Err(e.into());
        }

        self.positions.insert(ctx.caller, position);
        self.total_staked = total;
        info!(staker = %ctx.caller, amount, position, block = ctx.block, "staked");
        Ok(())
    }

    /// Withdraw `amount` of `ctx.caller`'s staked collateral.
    ///
    /// # Errors
    ///
    /// - [`StakeError::InvalidAmount`] if `amount == 0`
    /// - [`StakeError::InsufficientStake`] if `amount` exceeds the position
    /// - [`StakeError::Ledger`] if the productivity decrease fails
    /// - [`StakeError::Custody`] if the release fails; all ledger effects
    ///   are rolled back
    pub fn unstake(
        &mut self,
        ledger: &mut Ledger,
        ctx: &CallContext,
        amount: u128,
    ) -> Result<(), StakeError> {
        if amount == 0 {
            return Err(StakeError::InvalidAmount);
        }
        let have = self.position(&ctx.caller);
        if amount > have {
            return Err(StakeError::InsufficientStake { have, need: amount });
        }

        let savepoint = ledger.savepoint(&[ctx.caller]);
        ledger.decrease_productivity(&ctx.with_caller(self.address), &ctx.caller, amount)?;
        let total_before = self.total_staked;
        self.positions.insert(ctx.caller, have - amount);
        self.total_staked = total_before - amount;

        if let Err(e) = self.custody.release(&ctx.caller, amount) {
            warn!(
                staker = %ctx.caller,
                amount,
                error = %e,
                "collateral release failed, rolling back"
            );
            ledger.rollback(savepoint);
            self.positions.insert(ctx.caller, have);
            self.total_staked = total_before;
            return Err(e.into());
        }

        info!(
            staker = %ctx.caller,
            amount,
            position = have - amount,
            block = ctx.block,
            "unstaked"
        );
        Ok(())
    }
}
