//! The ledger value and its internal commit machinery.
//!
//! A [`Ledger`] owns all accrual state. Entry points live in sibling
//! modules (`registry`, `realization`, `governance`, `token`) as `impl
//! Ledger` blocks. Each one validates and computes every effect first
//! ("stages" it) and writes only once nothing can fail, so an `Err`
//! leaves the ledger exactly as it was.
//!
//! Per-call work is O(1) in the number of participants. Only
//! [`Ledger::check_invariants`] walks every account.

use std::collections::HashMap;

use tracing::{debug, info, trace};

use drip_core::error::LedgerError;
use drip_core::events::LedgerEvent;
use drip_core::fixed::pending_reward;
use drip_core::types::{Address, U256};

use crate::settlement::{preview_settlement, Settlement};
use crate::state::{GlobalLedgerState, ParticipantAccount, TokenMetadata};

/// The interest-bearing token ledger.
#[derive(Clone, Debug)]
pub struct Ledger {
    pub(crate) global: GlobalLedgerState,
    pub(crate) metadata: TokenMetadata,
    pub(crate) accounts: HashMap<Address, ParticipantAccount>,
    /// `(owner, spender)` → approved amount.
    pub(crate) allowances: HashMap<(Address, Address), u128>,
    pub(crate) total_supply: u128,
    pub(crate) events: Vec<LedgerEvent>,
}

/// A participant settled and flushed to a block, not yet written.
#[derive(Clone, Debug)]
pub(crate) struct StagedFlush {
    pub settlement: Settlement,
    pub user: Address,
    /// The account after crediting pending reward and moving its checkpoint.
    pub account: ParticipantAccount,
    pub realized: u128,
    pub total_supply: u128,
}

/// Everything needed to undo a composite operation touching known accounts.
///
/// Allowances are not captured; composite operations that use savepoints
/// do not touch them.
#[derive(Clone, Debug)]
pub struct Savepoint {
    global: GlobalLedgerState,
    total_supply: u128,
    accounts: Vec<(Address, Option<ParticipantAccount>)>,
    events_len: usize,
}

/// A broken ledger invariant, as found by [`Ledger::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    ProductivitySum { accounts: u128, total: u128 },
    SupplySum { balances: u128, total_supply: u128 },
    CheckpointAhead { user: Address, checkpoint: U256, acc: U256 },
    /// Realized interest cannot exceed what was minted.
    SupplyExceedsMinted { total_supply: u128, minted: u128 },
}

impl Ledger {
    /// Deploy a ledger at `block` with `deployer` holding both the
    /// productivity authority and the governor role.
    pub fn new(deployer: Address, interests_per_block: u128, block: u64) -> Self {
        Self::with_metadata(deployer, interests_per_block, block, TokenMetadata::default())
    }

    /// [`Ledger::new`] with explicit token metadata.
    pub fn with_metadata(
        deployer: Address,
        interests_per_block: u128,
        block: u64,
        metadata: TokenMetadata,
    ) -> Self {
        info!(
            %deployer,
            interests_per_block,
            block,
            symbol = %metadata.symbol,
            "ledger deployed"
        );
        Self {
            global: GlobalLedgerState::genesis(deployer, interests_per_block, block),
            metadata,
            accounts: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
            events: Vec::new(),
        }
    }

    /// Read-only view of the aggregate counters.
    pub fn global(&self) -> &GlobalLedgerState {
        &self.global
    }

    /// A participant's record, or an empty one if never touched.
    pub fn account(&self, user: &Address) -> ParticipantAccount {
        self.accounts.get(user).cloned().unwrap_or_default()
    }

    /// Number of accounts ever touched.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Events emitted since the last drain, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take and clear the event log.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        trace!(event = event.name(), "emit");
        self.events.push(event);
    }

    /// Settle to `block` and flush `user`'s pending reward, without writing.
    pub(crate) fn stage_flush(
        &self,
        user: &Address,
        block: u64,
    ) -> Result<StagedFlush, LedgerError> {
        let settlement = preview_settlement(&self.global, block)?;
        let mut account = self.account(user);
        let realized = pending_reward(
            account.productivity,
            settlement.acc_amount_per_share,
            account.checkpoint,
        )
        .ok_or(LedgerError::ArithmeticOverflow)?;
        account.balance = account
            .balance
            .checked_add(realized)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        account.checkpoint = settlement.acc_amount_per_share;
        let total_supply = self
            .total_supply
            .checked_add(realized)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok(StagedFlush {
            settlement,
            user: *user,
            account,
            realized,
            total_supply,
        })
    }

    /// Write a staged flush. Infallible.
    ///
    /// A flush of an address with no record and nothing to credit leaves
    /// the account map untouched.
    pub(crate) fn commit_flush(&mut self, staged: StagedFlush) {
        self.global.apply_settlement(&staged.settlement);
        self.total_supply = staged.total_supply;
        if staged.account.is_empty() && !self.accounts.contains_key(&staged.user) {
            trace!(user = %staged.user, "flush of untouched account");
        } else {
            self.accounts.insert(staged.user, staged.account);
        }
        if staged.realized > 0 {
            self.emit(LedgerEvent::Transfer {
                from: Address::ZERO,
                to: staged.user,
                value: staged.realized,
            });
        }
    }

    /// Capture the global counters and the named accounts.
    pub fn savepoint(&self, touched: &[Address]) -> Savepoint {
        Savepoint {
            global: self.global.clone(),
            total_supply: self.total_supply,
            accounts: touched
                .iter()
                .map(|a| (*a, self.accounts.get(a).cloned()))
                .collect(),
            events_len: self.events.len(),
        }
    }

    /// Restore the state captured by `savepoint`.
    ///
    /// Only correct if nothing outside the captured accounts changed since.
    pub fn rollback(&mut self, savepoint: Savepoint) {
        debug!(accounts = savepoint.accounts.len(), "rolling back");
        self.global = savepoint.global;
        self.total_supply = savepoint.total_supply;
        for (addr, account) in savepoint.accounts {
            match account {
                Some(a) => {
                    self.accounts.insert(addr, a);
                }
                None => {
                    self.accounts.remove(&addr);
                }
            }
        }
        self.events.truncate(savepoint.events_len);
    }

    /// Audit every invariant by walking all accounts. O(n).
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut productivity: u128 = 0;
        let mut balances: u128 = 0;
        for (user, a) in &self.accounts {
            productivity = productivity.saturating_add(a.productivity);
            balances = balances.saturating_add(a.balance);
            if a.checkpoint > self.global.acc_amount_per_share {
                return Err(InvariantViolation::CheckpointAhead {
                    user: *user,
                    checkpoint: a.checkpoint,
                    acc: self.global.acc_amount_per_share,
                });
            }
        }
        if productivity != self.global.total_productivity {
            return Err(InvariantViolation::ProductivitySum {
                accounts: productivity,
                total: self.global.total_productivity,
            });
        }
        if balances != self.total_supply {
            return Err(InvariantViolation::SupplySum {
                balances,
                total_supply: self.total_supply,
            });
        }
        if self.total_supply > self.global.mint_cumulation {
            return Err(InvariantViolation::SupplyExceedsMinted {
                total_supply: self.total_supply,
                minted: self.global.mint_cumulation,
            });
        }
        Ok(())
    }
}
