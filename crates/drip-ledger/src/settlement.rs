//! Settlement engine.
//!
//! Brings the accumulator up to a block height. Split into a pure
//! [`preview_settlement`] that computes the post-settlement counters and
//! [`GlobalLedgerState::apply_settlement`] that writes them, so read-only
//! quotes and committing operations share the exact same arithmetic.
//!
//! Reward for blocks during which `total_productivity == 0` is dropped:
//! the clock advances but nothing is added to the accumulator or to
//! `mint_cumulation`.

use tracing::{debug, error};

use drip_core::error::LedgerError;
use drip_core::fixed::{per_share_increment, reward_for_blocks};
use drip_core::types::U256;

use crate::state::GlobalLedgerState;

/// Counters after settling to `block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub block: u64,
    /// Reward minted by this settlement. Zero when nothing was distributed.
    pub reward: u128,
    pub acc_amount_per_share: U256,
    pub mint_cumulation: u128,
}

/// Compute the settlement of `state` to `block` without writing anything.
///
/// # Errors
///
/// - [`LedgerError::BlockRegressed`] if `block < state.last_reward_block`
/// - [`LedgerError::ArithmeticOverflow`] if the reward or `mint_cumulation`
///   leaves `u128`, or the accumulator leaves `U256`
pub fn preview_settlement(
    state: &GlobalLedgerState,
    block: u64,
) -> Result<Settlement, LedgerError> {
    let Some(elapsed) = block.checked_sub(state.last_reward_block) else {
        error!(
            last = state.last_reward_block,
            current = block,
            "block height moved backwards"
        );
        return Err(LedgerError::BlockRegressed {
            last: state.last_reward_block,
            current: block,
        });
    };

    if elapsed == 0 || state.total_productivity == 0 {
        return Ok(Settlement {
            block,
            reward: 0,
            acc_amount_per_share: state.acc_amount_per_share,
            mint_cumulation: state.mint_cumulation,
        });
    }

    let reward = reward_for_blocks(state.interests_per_block, elapsed)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    let increment = per_share_increment(reward, state.total_productivity)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    let acc_amount_per_share = state
        .acc_amount_per_share
        .checked_add(increment)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    let mint_cumulation = state
        .mint_cumulation
        .checked_add(reward)
        .ok_or(LedgerError::ArithmeticOverflow)?;

    Ok(Settlement {
        block,
        reward,
        acc_amount_per_share,
        mint_cumulation,
    })
}

impl GlobalLedgerState {
    /// Write a settlement computed by [`preview_settlement`] on this state.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        debug_assert!(settlement.acc_amount_per_share >= self.acc_amount_per_share);
        if settlement.reward > 0 {
            debug!(
                from = self.last_reward_block,
                to = settlement.block,
                reward = settlement.reward,
                acc = %settlement.acc_amount_per_share,
                "settled"
            );
        }
        self.acc_amount_per_share = settlement.acc_amount_per_share;
        self.mint_cumulation = settlement.mint_cumulation;
        self.last_reward_block = settlement.block;
    }

    /// Settle this state to `block` in place.
    pub fn settle(&mut self, block: u64) -> Result<Settlement, LedgerError> {
        let settlement = preview_settlement(self, block)?;
        self.apply_settlement(&settlement);
        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drip_core::constants::{COIN, PRECISION};
    use drip_core::types::Address;
    use proptest::prelude::*;

    fn state(total: u128, rate: u128, last: u64) -> GlobalLedgerState {
        let mut s = GlobalLedgerState::genesis(Address([1; 20]), rate, last);
        s.total_productivity = total;
        s
    }

    #[test]
    fn same_block_is_noop() {
        let s = state(100, COIN, 10);
        let out = preview_settlement(&s, 10).unwrap();
        assert_eq!(out.reward, 0);
        assert!(out.acc_amount_per_share.is_zero());
        assert_eq!(out.block, 10);
    }

    #[test]
    fn zero_productivity_forfeits_and_advances() {
        let mut s = state(0, COIN, 10);
        let out = s.settle(15).unwrap();
        assert_eq!(out.reward, 0);
        assert_eq!(s.last_reward_block, 15);
        assert_eq!(s.mint_cumulation, 0);
        assert!(s.acc_amount_per_share.is_zero());
    }

    #[test]
    fn distributes_over_total() {
        let mut s = state(100, COIN, 0);
        let out = s.settle(10).unwrap();
        assert_eq!(out.reward, 10 * COIN);
        assert_eq!(s.mint_cumulation, 10 * COIN);
        assert_eq!(s.acc_amount_per_share, U256::from(10 * COIN * PRECISION / 100));
        assert_eq!(s.last_reward_block, 10);
    }

    #[test]
    fn zero_rate_advances_without_reward() {
        let mut s = state(100, 0, 0);
        s.settle(50).unwrap();
        assert!(s.acc_amount_per_share.is_zero());
        assert_eq!(s.last_reward_block, 50);
    }

    #[test]
    fn regression_is_rejected_without_change() {
        let s = state(100, COIN, 20);
        let before = s.clone();
        let err = preview_settlement(&s, 19).unwrap_err();
        assert_eq!(err, LedgerError::BlockRegressed { last: 20, current: 19 });
        assert_eq!(s, before);
    }

    #[test]
    fn overflow_is_reported() {
        let s = state(1, u128::MAX, 0);
        assert_eq!(
            preview_settlement(&s, 2).unwrap_err(),
            LedgerError::ArithmeticOverflow
        );
    }

    #[test]
    fn single_unit_holder_accrues_past_u128() {
        // 100 tokens per block onto one unit of productivity.
        let mut s = state(1, 100 * COIN, 0);
        s.settle(4_000_000).unwrap();
        assert!(s.acc_amount_per_share > U256::from(u128::MAX));
        assert_eq!(s.mint_cumulation, 400_000_000 * COIN);
        s.settle(8_000_000).unwrap();
        assert_eq!(
            s.acc_amount_per_share,
            U256::from(800_000_000 * COIN) * U256::from(PRECISION)
        );
    }

    #[test]
    fn preview_does_not_write() {
        let s = state(100, COIN, 0);
        let before = s.clone();
        let _ = preview_settlement(&s, 1_000).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn split_settlement_matches_single_when_divisible() {
        let mut once = state(100, COIN, 0);
        once.settle(10).unwrap();
        let mut twice = state(100, COIN, 0);
        twice.settle(4).unwrap();
        twice.settle(10).unwrap();
        assert_eq!(once.acc_amount_per_share, twice.acc_amount_per_share);
        assert_eq!(once.mint_cumulation, twice.mint_cumulation);
    }

    proptest! {
        #[test]
        fn accumulator_monotonic(
            total in 0u128..=1_000_000 * COIN,
            rate in 0u128..=1_000 * COIN,
            steps in proptest::collection::vec(0u64..1_000, 1..20),
        ) {
            let mut s = state(total, rate, 0);
            let mut block = 0u64;
            let mut minted = 0u128;
            for step in steps {
                block += step;
                let prev = s.acc_amount_per_share;
                let out = s.settle(block).unwrap();
                minted += out.reward;
                prop_assert!(s.acc_amount_per_share >= prev);
                prop_assert_eq!(s.last_reward_block, block);
            }
            prop_assert_eq!(s.mint_cumulation, minted);
        }
    }
}
