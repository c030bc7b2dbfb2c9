//! Bot configuration
//!
//! Defaults, overlaid by an optional TOML file, overlaid by command-line
//! flags.
//!
//! ```toml
//! db_path = "/var/lib/crossbot/crossbot.db"
//! log_profile = "production"
//!
//! [executor]
//! pool_size = 2
//! budget_ms = 1000
//! ```

use std::path::{Path, PathBuf};

use clap::Args;
use crossbot_core::logging_facility::Profile;
use crossbot_sandbox::ExecutorConfig;
use serde::Deserialize;

pub const DEFAULT_DB_PATH: &str = ".crossbot/crossbot.db";

/// Flags shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Logging profile: development, production or test
    #[arg(long, global = true)]
    pub log_profile: Option<Profile>,

    /// Wall-clock budget for one saved query, in milliseconds
    #[arg(long, global = true)]
    pub query_budget_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub db_path: PathBuf,
    pub executor: ExecutorConfig,
    pub log_profile: Profile,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            executor: ExecutorConfig::default(),
            log_profile: Profile::default(),
        }
    }
}

impl BotConfig {
    /// Resolve the effective configuration for this invocation
    pub fn load(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match &global.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(db) = &global.db {
            config.db_path = db.clone();
        }
        if let Some(profile) = global.log_profile {
            config.log_profile = profile;
        }
        if let Some(budget_ms) = global.query_budget_ms {
            config.executor.budget_ms = budget_ms;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
        Self::from_toml(&text).map_err(|e| format!("invalid config {}: {}", path.display(), e).into())
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
