//! # drip-core
//! Foundation types, errors, and integer math for the Drip ledger.

pub mod constants;
pub mod error;
pub mod events;
pub mod fixed;
pub mod traits;
pub mod types;
