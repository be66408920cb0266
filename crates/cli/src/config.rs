// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Layered operator configuration.
//!
//! Precedence, lowest first: built-in defaults, `tire-ledger.toml` in the
//! working directory (or the file passed with `--config`), `TIRE_LEDGER_*`
//! environment variables with `__` separating nested keys, and finally the
//! command line.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tire_ledger_domain::SeasonPolicy;

/// File read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tire-ledger.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TIRE_LEDGER_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(Box<figment::Error>),

    #[error("configuration file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Values taken from the command line; each one wins over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TireLedgerConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub season: SeasonConfig,
    #[serde(default)]
    pub wear: WearConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file. Empty selects a throwaway in-memory database.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    String::from("tire-ledger.db")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    String::from("info")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonConfig {
    #[serde(default = "default_final_stage")]
    pub final_stage: u8,
    #[serde(default = "default_first_stage_quota")]
    pub first_stage_quota: u32,
    #[serde(default = "default_later_stage_quota")]
    pub later_stage_quota: u32,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            final_stage: default_final_stage(),
            first_stage_quota: default_first_stage_quota(),
            later_stage_quota: default_later_stage_quota(),
        }
    }
}

fn default_final_stage() -> u8 {
    SeasonPolicy::default().final_stage
}

fn default_first_stage_quota() -> u32 {
    SeasonPolicy::default().first_stage_quota
}

fn default_later_stage_quota() -> u32 {
    SeasonPolicy::default().later_stage_quota
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WearConfig {
    /// Limit used for tires registered with a non-positive distance limit.
    #[serde(default = "default_limit_floor_km")]
    pub default_limit_floor_km: i64,
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            default_limit_floor_km: default_limit_floor_km(),
        }
    }
}

fn default_limit_floor_km() -> i64 {
    SeasonPolicy::default().limit_floor_km
}

impl TireLedgerConfig {
    /// Builds the provider chain without extracting it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when an explicit `--config` path
    /// does not exist. The default file is optional.
    pub fn figment(overrides: &CliOverrides) -> Result<Figment, ConfigError> {
        let file: &Path = match overrides.config.as_deref() {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::MissingFile(path.to_path_buf()));
                }
                path
            }
            None => Path::new(DEFAULT_CONFIG_FILE),
        };

        let mut figment: Figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(database) = overrides.database.as_deref() {
            figment = figment.merge(Serialized::default(
                "database.path",
                database.display().to_string(),
            ));
        }

        Ok(figment)
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be parsed or a value is out of range.
    pub fn load(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(overrides)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.season.final_stage == 0 {
            return Err(ConfigError::InvalidValue {
                key: "season.final_stage",
                reason: String::from("a season has at least one stage"),
            });
        }
        if self.season.first_stage_quota == 0 {
            return Err(ConfigError::InvalidValue {
                key: "season.first_stage_quota",
                reason: String::from("must be positive"),
            });
        }
        if self.season.later_stage_quota == 0 {
            return Err(ConfigError::InvalidValue {
                key: "season.later_stage_quota",
                reason: String::from("must be positive"),
            });
        }
        if self.wear.default_limit_floor_km <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "wear.default_limit_floor_km",
                reason: format!("must be positive, got {}", self.wear.default_limit_floor_km),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn policy(&self) -> SeasonPolicy {
        SeasonPolicy {
            final_stage: self.season.final_stage,
            first_stage_quota: self.season.first_stage_quota,
            later_stage_quota: self.season.later_stage_quota,
            limit_floor_km: self.wear.default_limit_floor_km,
        }
    }

    /// `None` when the database path is empty.
    #[must_use]
    pub fn database_path(&self) -> Option<&Path> {
        let path: &str = self.database.path.trim();
        if path.is_empty() {
            None
        } else {
            Some(Path::new(path))
        }
    }
}
