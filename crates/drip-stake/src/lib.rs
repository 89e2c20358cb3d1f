//! # drip-stake: Stake wrapper for the Drip ledger.
//!
//! Custodies collateral and mirrors every staked unit as one unit of
//! productivity on the ledger. Once bound as the ledger's authority it is
//! the only component able to change productivity.
//!
//! - [`pool::StakePool`]: stake/unstake with all-or-nothing semantics
//! - [`custody::MemoryCustody`]: in-memory [`Custody`](drip_core::traits::Custody)

pub mod custody;
pub mod pool;

pub use custody::MemoryCustody;
pub use pool::StakePool;
