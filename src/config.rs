//! Startup configuration.
//!
//! A [`Config`] is read once, from a YAML file and/or the environment, and
//! handed to [`Config::build`]. Nothing here is global.
//!
//! ```yaml
//! datacenter_id: 1
//! machine_id: 1
//! is_debug: false
//! log:
//!   level: info
//! ```

use crate::Snowflake;
use crate::error::Error;
use chrono::DateTime;
use serde::Deserialize;
use std::{fs, io, path::Path};

pub const ENV_DATACENTER_ID: &str = "SNOWFLAKE_DATACENTER_ID";
pub const ENV_MACHINE_ID: &str = "SNOWFLAKE_MACHINE_ID";
pub const ENV_EPOCH_MS: &str = "SNOWFLAKE_EPOCH_MS";
pub const ENV_LOG_LEVEL: &str = "SNOWFLAKE_LOG_LEVEL";

/// Errors raised while loading a [`Config`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("environment variable {var} has invalid value `{value}`")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub datacenter_id: Option<i64>,
    pub machine_id: Option<i64>,
    /// Custom epoch in milliseconds since the Unix epoch.
    pub epoch_ms: Option<i64>,
    #[serde(default)]
    pub is_debug: bool,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
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
    "info".to_string()
}

impl Config {
    /// Read `path` as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `path` if given, then apply `SNOWFLAKE_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides looked up through `lookup`, keyed by variable name.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_env(&lookup, ENV_DATACENTER_ID)? {
            self.datacenter_id = Some(value);
        }
        if let Some(value) = parse_env(&lookup, ENV_MACHINE_ID)? {
            self.machine_id = Some(value);
        }
        if let Some(value) = parse_env(&lookup, ENV_EPOCH_MS)? {
            self.epoch_ms = Some(value);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log.level = level;
        }
        Ok(self)
    }

    /// Level to hand to the logger; `is_debug` forces `debug`.
    pub fn log_level(&self) -> &str {
        if self.is_debug {
            "debug"
        } else {
            self.log.level.as_str()
        }
    }

    /// Construct the generator this configuration describes.
    pub fn build(&self) -> Result<Snowflake, Error> {
        let mut builder = Snowflake::builder();
        if let Some(datacenter_id) = self.datacenter_id {
            builder = builder.datacenter_id(datacenter_id);
        }
        if let Some(machine_id) = self.machine_id {
            builder = builder.machine_id(machine_id);
        }
        if let Some(epoch_ms) = self.epoch_ms {
            let start_time =
                DateTime::from_timestamp_millis(epoch_ms).ok_or(Error::InvalidEpoch(epoch_ms))?;
            builder = builder.start_time(start_time);
        }
        builder.finalize()
    }
}

fn parse_env<F>(lookup: &F, var: &'static str) -> Result<Option<i64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        None => Ok(None),
    }
}
