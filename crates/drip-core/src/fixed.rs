//! Scaled-integer arithmetic for the per-share accumulator.
//!
//! Integer-only. Every division rounds toward zero (floor, since all
//! operands are unsigned). The accumulator itself is a [`U256`]; token
//! amounts and productivity stay `u128`. Products are formed one width up
//! (`U256` for two `u128`s, `U512` for a `u128` times the accumulator) so
//! a result only fails when the final quotient does not fit.
//!
//! Rounding dust is never redistributed: a settlement credits
//! `floor(reward * PRECISION / total)` per unit of productivity, and a
//! participant realizes `floor(productivity * delta / PRECISION)`. The sum
//! realized by all participants is therefore at most the reward minted.

use primitive_types::{U256, U512};

use crate::constants::PRECISION;

/// Narrow a `U256` to `u128`, or `None` if it does not fit.
pub fn u256_to_u128(value: U256) -> Option<u128> {
    if value > U256::from(u128::MAX) {
        return None;
    }
    Some(value.low_u128())
}

fn u512_to_u128(value: U512) -> Option<u128> {
    if value > U512::from(u128::MAX) {
        return None;
    }
    Some(value.low_u128())
}

/// Compute `floor(a * b / d)` with a 256-bit intermediate product.
///
/// Returns `None` if `d == 0` or the quotient exceeds `u128::MAX`.
///
/// # Examples
///
/// ```
/// use drip_core::fixed::mul_div_floor;
///
/// assert_eq!(mul_div_floor(10, 3, 4), Some(7));
/// assert_eq!(mul_div_floor(u128::MAX, u128::MAX, u128::MAX), Some(u128::MAX));
/// assert_eq!(mul_div_floor(1, 1, 0), None);
/// ```
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    // (2^128 - 1)^2 < 2^256: the product cannot overflow.
    let product = U256::from(a) * U256::from(b);
    u256_to_u128(product / U256::from(d))
}

/// Reward minted over `elapsed` blocks at `rate` per block.
pub fn reward_for_blocks(rate: u128, elapsed: u64) -> Option<u128> {
    rate.checked_mul(elapsed as u128)
}

/// Accumulator increment for distributing `reward` over `total_productivity`.
///
/// `floor(reward * PRECISION / total_productivity)`. Returns `None` when
/// `total_productivity` is zero; callers skip distribution in that case.
pub fn per_share_increment(reward: u128, total_productivity: u128) -> Option<U256> {
    if total_productivity == 0 {
        return None;
    }
    let scaled = U256::from(reward) * U256::from(PRECISION);
    Some(scaled / U256::from(total_productivity))
}

/// Pending reward for `productivity` between `checkpoint` and `acc`.
///
/// `floor(productivity * (acc - checkpoint) / PRECISION)`. Returns `None`
/// if `checkpoint > acc`, which the accumulator's monotonicity rules out,
/// or if the reward does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use drip_core::constants::PRECISION;
/// use drip_core::fixed::pending_reward;
/// use drip_core::types::U256;
///
/// // 100 units of productivity, accumulator moved by 2.5 per unit.
/// let acc = U256::from(5 * PRECISION / 2);
/// assert_eq!(pending_reward(100, acc, U256::zero()), Some(250));
/// ```
pub fn pending_reward(productivity: u128, acc: U256, checkpoint: U256) -> Option<u128> {
    let delta = acc.checked_sub(checkpoint)?;
    if productivity == 0 || delta.is_zero() {
        return Some(0);
    }
    let product = U256::from(productivity).full_mul(delta);
    u512_to_u128(product / U512::from(PRECISION))
}
