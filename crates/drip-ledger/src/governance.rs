//! Governance control: emission rate, governor rotation, and the one-time
//! authority rebinding.

use tracing::{info, warn};

use drip_core::error::LedgerError;
use drip_core::events::LedgerEvent;
use drip_core::types::{Address, CallContext, U256};

use crate::ledger::Ledger;
use crate::settlement::preview_settlement;
use crate::state::AuthorityBinding;

/// `(last_reward_block, total_productivity, acc_amount_per_share, mint_cumulation)`.
pub type LedgerStatus = (u64, u128, U256, u128);

impl Ledger {
    fn require_governor(&self, ctx: &CallContext) -> Result<(), LedgerError> {
        if ctx.caller != self.global.governor {
            warn!(caller = %ctx.caller, "governance call from non-governor");
            return Err(LedgerError::Unauthorized { caller: ctx.caller });
        }
        Ok(())
    }

    /// Current emission rate per block.
    pub fn interests_per_block(&self) -> u128 {
        self.global.interests_per_block
    }

    /// Change the emission rate. Blocks up to `ctx.block` accrue at the old
    /// rate.
    pub fn change_interest_rate_per_block(
        &mut self,
        ctx: &CallContext,
        new_rate: u128,
    ) -> Result<(), LedgerError> {
        self.require_governor(ctx)?;
        let settlement = preview_settlement(&self.global, ctx.block)?;

        self.global.apply_settlement(&settlement);
        let old_rate = self.global.interests_per_block;
        self.global.interests_per_block = new_rate;
        self.emit(LedgerEvent::InterestRatePerBlockChanged {
            old_value: old_rate,
            new_value: new_rate,
        });
        info!(old_rate, new_rate, block = ctx.block, "interest rate changed");
        Ok(())
    }

    /// Bind the productivity authority to `new_authority`. Allowed once,
    /// and only by the deployer.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Unauthorized`] if `ctx.caller` is not the current authority
    /// - [`LedgerError::AlreadyUpgraded`] if the authority is already bound
    pub fn upgrade_impl(
        &mut self,
        ctx: &CallContext,
        new_authority: &Address,
    ) -> Result<(), LedgerError> {
        let current = self.global.authority;
        if ctx.caller != current.current() {
            warn!(caller = %ctx.caller, "authority upgrade from non-authority");
            return Err(LedgerError::Unauthorized { caller: ctx.caller });
        }
        let AuthorityBinding::Unbound(deployer) = current else {
            return Err(LedgerError::AlreadyUpgraded);
        };

        self.global.authority = AuthorityBinding::Bound(*new_authority);
        self.emit(LedgerEvent::AuthorityUpgraded {
            old_authority: deployer,
            new_authority: *new_authority,
        });
        info!(from = %deployer, to = %new_authority, "authority bound");
        Ok(())
    }

    /// Hand the governor role to `new_governor`.
    pub fn change_governor(
        &mut self,
        ctx: &CallContext,
        new_governor: &Address,
    ) -> Result<(), LedgerError> {
        self.require_governor(ctx)?;
        let old_governor = self.global.governor;
        self.global.governor = *new_governor;
        self.emit(LedgerEvent::GovernorChanged {
            old_governor,
            new_governor: *new_governor,
        });
        info!(from = %old_governor, to = %new_governor, "governor changed");
        Ok(())
    }

    /// Address currently allowed to change productivity.
    pub fn authority(&self) -> Address {
        self.global.authority.current()
    }

    /// Address holding the governance capability.
    pub fn governor(&self) -> Address {
        self.global.governor
    }

    /// Snapshot of the accrual counters as last written. Does not settle.
    pub fn get_status(&self) -> LedgerStatus {
        let g = &self.global;
        (
            g.last_reward_block,
            g.total_productivity,
            g.acc_amount_per_share,
            g.mint_cumulation,
        )
    }
}
