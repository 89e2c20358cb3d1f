//! Reward realization: quoting and minting a participant's pending share.

use tracing::info;

use drip_core::error::LedgerError;
use drip_core::fixed::pending_reward;
use drip_core::types::CallContext;

use crate::ledger::Ledger;
use crate::settlement::preview_settlement;

impl Ledger {
    /// Pending reward of `ctx.caller` as of `ctx.block`. Writes nothing.
    pub fn take(&self, ctx: &CallContext) -> Result<u128, LedgerError> {
        let settlement = preview_settlement(&self.global, ctx.block)?;
        let account = self.account(&ctx.caller);
        pending_reward(
            account.productivity,
            settlement.acc_amount_per_share,
            account.checkpoint,
        )
        .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// [`take`](Self::take) together with the block height the quote is for.
    pub fn take_with_block(&self, ctx: &CallContext) -> Result<(u128, u64), LedgerError> {
        Ok((self.take(ctx)?, ctx.block))
    }

    /// Settle, then credit `ctx.caller`'s pending reward to their balance.
    ///
    /// Returns the amount realized. The same amount is never credited twice:
    /// the caller's checkpoint moves to the current accumulator.
    pub fn mint(&mut self, ctx: &CallContext) -> Result<u128, LedgerError> {
        let staged = self.stage_flush(&ctx.caller, ctx.block)?;
        let realized = staged.realized;
        self.commit_flush(staged);
        if realized > 0 {
            info!(user = %ctx.caller, amount = realized, block = ctx.block, "interest minted");
        }
        Ok(realized)
    }
}
