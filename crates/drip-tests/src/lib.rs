//! Cross-crate test suite for the Drip ledger.
//!
//! Integration tests under `tests/` drive the ledger and the stake wrapper
//! together and try to break the accrual invariants with randomized
//! call sequences.

pub mod helpers;
