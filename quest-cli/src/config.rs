//! Configuration for the quest CLI
//!
//! Values are layered: built-in defaults, then the TOML config file, then
//! environment variables. Command-line flags are applied last by the caller.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use quest_proofgen::DEFAULT_CONCURRENCY;

pub const CONFIG_ENV: &str = "QUEST_CONFIG";
pub const CHAIN_ID_ENV: &str = "QUEST_CHAIN_ID";
pub const CONCURRENCY_ENV: &str = "QUEST_CONCURRENCY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Chain id bound into whitelist leaves
    pub chain_id: Option<u64>,

    /// Proofs derived concurrently
    pub concurrency: usize,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: None,
            concurrency: DEFAULT_CONCURRENCY,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// `explicit` comes from `--config`; without it `$QUEST_CONFIG` is tried,
    /// then `<config dir>/quest/config.toml`. Only an explicitly named file
    /// must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("quest").join("config.toml"))
    }

    /// Override fields from environment variables, looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var(CHAIN_ID_ENV) {
            let chain_id = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", CHAIN_ID_ENV, value))?;
            self.chain_id = Some(chain_id);
        }

        if let Some(value) = var(CONCURRENCY_ENV) {
            self.concurrency = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", CONCURRENCY_ENV, value))?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        Ok(())
    }
}
