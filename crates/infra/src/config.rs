//! Application configuration.
//!
//! Read from an optional TOML file, then `EVENTSTOCK__*` environment
//! variables (`__` separates nested keys, e.g. `EVENTSTOCK__LOGGING__JSON`).

use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use eventstock_observability::LoggingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "config/eventstock.toml";
pub const ENV_PREFIX: &str = "EVENTSTOCK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for notification links. Links stay relative when unset.
    pub site_url: Option<String>,
    /// Business time zone as minutes east of UTC.
    pub utc_offset_minutes: i32,
    /// Dashboard cut-off for low-availability items.
    pub low_stock_threshold: u32,
    /// Snapshot file used by the sweeper binary.
    pub data_file: String,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            utc_offset_minutes: 0,
            low_stock_threshold: 3,
            data_file: "data/eventstock.json".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from [`DEFAULT_CONFIG_FILE`] (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(ConfigError::Message(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Business time zone. Falls back to UTC for an out-of-range offset.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}
