//! # drip-ledger: Accumulator-based interest distribution.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! Newly minted interest is spread across participants in proportion to
//! their productivity without iterating over them:
//! - **Settlement**: each call first advances a per-share accumulator by
//!   `interests_per_block * elapsed / total_productivity`.
//! - **Checkpoints**: a participant's pending reward is their productivity
//!   times the accumulator movement since their last touch.
//! - **Realization**: pending reward becomes token balance on `mint` or on
//!   any productivity change.
//! - **Governance**: a governor sets the rate; the productivity authority
//!   moves from the deployer to a stake wrapper exactly once.

pub mod governance;
pub mod ledger;
pub mod realization;
pub mod registry;
pub mod settlement;
pub mod shared;
pub mod snapshot;
pub mod state;
pub mod token;

pub use governance::LedgerStatus;
pub use ledger::{InvariantViolation, Ledger, Savepoint};
pub use settlement::{preview_settlement, Settlement};
pub use shared::SharedLedger;
pub use snapshot::{LedgerSnapshot, SnapshotStore, StagedSnapshot};
pub use state::{AuthorityBinding, GlobalLedgerState, ParticipantAccount, TokenMetadata};
