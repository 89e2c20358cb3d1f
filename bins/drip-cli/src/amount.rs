//! Token amount text conversion.
//!
//! Token amounts on the command line are whole tokens with up to
//! [`DECIMALS`] fractional digits ("2.5"). Internally everything is base
//! units.

use anyhow::{bail, Context, Result};

use drip_core::constants::{COIN, DECIMALS};

/// Parse a decimal token amount into base units.
pub fn parse_tokens(s: &str) -> Result<u128> {
    let s = s.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        bail!("empty amount");
    }
    // `str::parse` would accept a sign, so check digits up front.
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        bail!("invalid amount: {s}");
    }
    if frac.len() > DECIMALS as usize {
        bail!("amount {s} has more than {DECIMALS} decimal places");
    }
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .with_context(|| format!("invalid amount: {s}"))?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let digits: u128 = frac
            .parse()
            .with_context(|| format!("invalid amount: {s}"))?;
        digits * 10u128.pow(DECIMALS as u32 - frac.len() as u32)
    };
    whole
        .checked_mul(COIN)
        .and_then(|w| w.checked_add(frac_units))
        .with_context(|| format!("amount {s} is too large"))
}

/// Render base units as a decimal token amount, trimming trailing zeros.
pub fn format_tokens(units: u128) -> String {
    let whole = units / COIN;
    let frac = units % COIN;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = DECIMALS as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
