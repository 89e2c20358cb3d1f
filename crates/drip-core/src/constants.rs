//! Ledger constants. All token amounts are in base units (1 DRIP = 10^18 units).

/// Number of decimal places of the reward token.
pub const DECIMALS: u8 = 18;

/// One whole token in base units.
pub const COIN: u128 = 1_000_000_000_000_000_000;

/// Fixed-point scale of the per-share accumulator.
///
/// `acc_amount_per_share` stores reward-per-unit-of-productivity multiplied
/// by this constant. Pending rewards divide it back out with floor rounding.
///
/// # Examples
///
/// ```
/// use drip_core::constants::PRECISION;
/// assert_eq!(PRECISION, 10u128.pow(12));
/// ```
pub const PRECISION: u128 = 1_000_000_000_000;

/// Default token name.
pub const DEFAULT_NAME: &str = "Drip";

/// Default token symbol.
pub const DEFAULT_SYMBOL: &str = "DRIP";

/// Default emission rate: one whole token per block.
pub const DEFAULT_INTERESTS_PER_BLOCK: u128 = COIN;
