//! Whole-ledger snapshots and their JSON file store.
//!
//! A [`LedgerSnapshot`] is a serde image of every piece of ledger state
//! except the event log. Restoring one re-checks the ledger invariants so a
//! hand-edited or truncated file is rejected rather than loaded.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use drip_core::error::DripError;
use drip_core::types::Address;

use crate::ledger::Ledger;
use crate::state::{GlobalLedgerState, ParticipantAccount, TokenMetadata};

/// One allowance entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub owner: Address,
    pub spender: Address,
    pub value: u128,
}

/// Serializable image of a [`Ledger`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub global: GlobalLedgerState,
    pub metadata: TokenMetadata,
    pub total_supply: u128,
    /// Sorted for stable output.
    pub accounts: BTreeMap<Address, ParticipantAccount>,
    pub allowances: Vec<AllowanceEntry>,
}

impl Ledger {
    /// Capture the ledger as a snapshot. Pending events are not included.
    pub fn to_snapshot(&self) -> LedgerSnapshot {
        let mut allowances: Vec<AllowanceEntry> = self
            .allowances
            .iter()
            .filter(|(_, v)| **v > 0)
            .map(|((owner, spender), value)| AllowanceEntry {
                owner: *owner,
                spender: *spender,
                value: *value,
            })
            .collect();
        allowances.sort_by(|a, b| (a.owner, a.spender).cmp(&(b.owner, b.spender)));

        LedgerSnapshot {
            global: self.global.clone(),
            metadata: self.metadata.clone(),
            total_supply: self.total_supply,
            accounts: self
                .accounts
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
            allowances,
        }
    }

    /// Rebuild a ledger from a snapshot, rejecting inconsistent state.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, DripError> {
        let ledger = Self {
            global: snapshot.global,
            metadata: snapshot.metadata,
            accounts: snapshot.accounts.into_iter().collect(),
            allowances: snapshot
                .allowances
                .into_iter()
                .map(|e| ((e.owner, e.spender), e.value))
                .collect::<HashMap<_, _>>(),
            total_supply: snapshot.total_supply,
            events: Vec::new(),
        };
        ledger
            .check_invariants()
            .map_err(|v| DripError::Storage(format!("snapshot violates invariant: {v:?}")))?;
        Ok(ledger)
    }
}

/// Reads and writes a ledger snapshot as pretty-printed JSON.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and validate the stored ledger.
    pub fn load(&self) -> Result<Ledger, DripError> {
        let bytes = fs::read(&self.path)
            .map_err(|e| DripError::Storage(format!("read {}: {e}", self.path.display())))?;
        let snapshot: LedgerSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| DripError::Storage(format!("decode {}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), accounts = snapshot.accounts.len(), "snapshot loaded");
        Ledger::from_snapshot(snapshot)
    }

    /// Persist `ledger`, replacing any previous snapshot.
    pub fn save(&self, ledger: &Ledger) -> Result<(), DripError> {
        self.stage(ledger)?.commit()
    }

    /// Write `ledger` to the sibling `.tmp` file without touching the
    /// current snapshot. Callers persisting several files write all of them
    /// this way before committing any.
    pub fn stage(&self, ledger: &Ledger) -> Result<StagedSnapshot, DripError> {
        let json = serde_json::to_vec_pretty(&ledger.to_snapshot())
            .map_err(|e| DripError::Storage(format!("encode: {e}")))?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| DripError::Storage(format!("create {}: {e}", dir.display())))?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)
            .map_err(|e| DripError::Storage(format!("write {}: {e}", tmp.display())))?;
        Ok(StagedSnapshot {
            tmp,
            path: self.path.clone(),
        })
    }
}

/// A snapshot written next to its target, awaiting [`StagedSnapshot::commit`].
#[derive(Debug)]
#[must_use = "a staged snapshot does nothing until committed"]
pub struct StagedSnapshot {
    tmp: PathBuf,
    path: PathBuf,
}

impl StagedSnapshot {
    /// Rename the staged file over the target.
    pub fn commit(self) -> Result<(), DripError> {
        fs::rename(&self.tmp, &self.path)
            .map_err(|e| DripError::Storage(format!("rename {}: {e}", self.path.display())))?;
        info!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}
