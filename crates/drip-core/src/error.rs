//! Error types for the Drip ledger.
use thiserror::Error;

use crate::types::Address;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid amount: productivity delta must be non-zero")] InvalidAmount,
    #[error("insufficient productivity: have {have}, need {need}")] InsufficientProductivity { have: u128, need: u128 },
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: u128, need: u128 },
    #[error("unauthorized caller: {caller}")] Unauthorized { caller: Address },
    #[error("authority already upgraded")] AlreadyUpgraded,
    #[error("block height regressed: last {last}, current {current}")] BlockRegressed { last: u64, current: u64 },
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("insufficient collateral: have {have}, need {need}")] InsufficientFunds { have: u128, need: u128 },
    #[error("vault underfunded: holds {held}, release {requested}")] VaultUnderfunded { held: u128, requested: u128 },
    #[error("collateral transfer rejected: {0}")] Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakeError {
    #[error("stake amount must be non-zero")] InvalidAmount,
    #[error("insufficient stake: have {have}, need {need}")] InsufficientStake { have: u128, need: u128 },
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("ledger: {0}")] Ledger(#[from] LedgerError),
    #[error("custody: {0}")] Custody(#[from] CustodyError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address length: {0} hex digits")] InvalidLength(usize),
    #[error("invalid hex")] InvalidHex,
}

#[derive(Error, Debug)]
pub enum DripError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Stake(#[from] StakeError),
    #[error(transparent)] Custody(#[from] CustodyError),
    #[error(transparent)] Address(#[from] AddressError),
    #[error("storage: {0}")] Storage(String),
}
