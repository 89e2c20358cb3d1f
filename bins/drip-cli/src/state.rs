//! On-disk CLI state: the ledger snapshot plus the stake pool.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use drip_ledger::{Ledger, SnapshotStore, StagedSnapshot};
use drip_stake::{MemoryCustody, StakePool};

use crate::config::DripConfig;

pub type Pool = StakePool<MemoryCustody>;

/// Ledger and pool loaded from a data directory.
pub struct State {
    pub ledger: Ledger,
    pub pool: Pool,
    store: SnapshotStore,
    pool_path: PathBuf,
}

impl State {
    /// Wrap freshly created state; nothing is written until [`State::save`].
    pub fn create(cfg: &DripConfig, ledger: Ledger, pool: Pool) -> Result<Self> {
        let store = SnapshotStore::new(cfg.ledger_path());
        if store.exists() {
            bail!(
                "ledger already initialized at {} (remove it to start over)",
                store.path().display()
            );
        }
        Ok(Self {
            ledger,
            pool,
            store,
            pool_path: cfg.pool_path(),
        })
    }

    pub fn load(cfg: &DripConfig) -> Result<Self> {
        let store = SnapshotStore::new(cfg.ledger_path());
        if !store.exists() {
            bail!(
                "no ledger at {} (run `drip-cli init` first)",
                store.path().display()
            );
        }
        let ledger = store.load().context("Failed to load ledger snapshot")?;
        let pool_path = cfg.pool_path();
        let bytes = fs::read(&pool_path)
            .with_context(|| format!("Failed to read {}", pool_path.display()))?;
        let pool: Pool = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to decode {}", pool_path.display()))?;
        if pool.total_staked() != ledger.global().total_productivity {
            bail!(
                "pool stake {} disagrees with ledger productivity {}",
                pool.total_staked(),
                ledger.global().total_productivity
            );
        }
        debug!(accounts = ledger.account_count(), "state loaded");
        Ok(Self {
            ledger,
            pool,
            store,
            pool_path,
        })
    }

    /// Write the pool and the ledger snapshot to temporary files, then
    /// rename both into place. Nothing is replaced if either write fails.
    pub fn save(&self) -> Result<()> {
        let pool_tmp = stage_json(&self.pool_path, &self.pool)?;
        let ledger = match self.store.stage(&self.ledger) {
            Ok(staged) => staged,
            Err(e) => {
                discard(&pool_tmp);
                return Err(e).context("Failed to save ledger");
            }
        };
        commit(&pool_tmp, &self.pool_path, ledger)?;
        info!(dir = %self.store.path().display(), "state saved");
        Ok(())
    }
}

fn stage_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let json = serde_json::to_vec_pretty(value).context("Failed to encode JSON")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    Ok(tmp)
}

fn commit(pool_tmp: &Path, pool_path: &Path, ledger: StagedSnapshot) -> Result<()> {
    fs::rename(pool_tmp, pool_path)
        .with_context(|| format!("Failed to replace {}", pool_path.display()))?;
    ledger.commit().context("Failed to save ledger")
}

fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        debug!(path = %tmp.display(), error = %e, "could not remove staged file");
    }
}
