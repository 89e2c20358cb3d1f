//! CLI configuration.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! `drip.toml` in the data directory, `DRIP_*` environment variables, and
//! finally command-line flags (applied by the caller).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use drip_core::constants::{DEFAULT_INTERESTS_PER_BLOCK, DEFAULT_NAME, DEFAULT_SYMBOL};

use crate::amount::format_tokens;

/// Name of the optional config file inside the data directory.
pub const CONFIG_FILE: &str = "drip.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DripConfig {
    /// Directory holding `ledger.json`, `pool.json` and `drip.toml`.
    pub data_dir: PathBuf,
    /// Log level filter string (e.g. "info", "drip_ledger=debug").
    pub log_level: String,
    /// "text" or "json".
    pub log_format: String,
    pub token_name: String,
    pub token_symbol: String,
    /// Emission rate used by `init`, in whole tokens (decimals allowed).
    pub interests_per_block: String,
}

impl Default for DripConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drip");

        Self {
            data_dir,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            token_name: DEFAULT_NAME.to_string(),
            token_symbol: DEFAULT_SYMBOL.to_string(),
            interests_per_block: format_tokens(DEFAULT_INTERESTS_PER_BLOCK),
        }
    }
}

impl DripConfig {
    /// Load from `<data_dir>/drip.toml` and the process environment.
    ///
    /// `data_dir` overrides both the default location and any configured
    /// one.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(data_dir, None)
    }

    /// [`DripConfig::load`] reading `DRIP_*` variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        data_dir: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let base = data_dir
            .clone()
            .unwrap_or_else(|| DripConfig::default().data_dir);
        let mut cfg: DripConfig = Config::builder()
            .add_source(File::from(base.join(CONFIG_FILE)).required(false))
            .add_source(Environment::with_prefix("DRIP").source(env))
            .build()?
            .try_deserialize()?;
        if let Some(dir) = data_dir {
            cfg.data_dir = dir;
        }
        Ok(cfg)
    }

    /// Path of the persisted ledger snapshot.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("ledger.json")
    }

    /// Path of the persisted stake pool.
    pub fn pool_path(&self) -> PathBuf {
        self.data_dir.join("pool.json")
    }

    pub fn config_file(&self) -> PathBuf {
        config_file_in(&self.data_dir)
    }
}

fn config_file_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}
