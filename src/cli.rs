//! Command-line front end.

use crate::batch::MAX_BATCH_SIZE;
use crate::config::{Config, ConfigError};
use crate::error::BoxDynError;
use crate::snowflake::{DEFAULT_EPOCH, parse_id_with_epoch};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Top-level CLI parser for `snowflake-id`.
#[derive(Debug, Parser)]
#[command(name = "snowflake-id", version, about = "Generate and decode Snowflake IDs")]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Data center id (0-31), overrides the config file and environment.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub datacenter_id: Option<i64>,
    /// Machine id (0-31), overrides the config file and environment.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub machine_id: Option<i64>,
    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    pub log: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate one id, or a batch of up to 10000.
    Generate {
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Decode an id into its fields.
    Parse {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Show the generator's identity and layout.
    Stats,
    /// Time a batch of ids.
    Bench {
        #[arg(short, long, default_value_t = MAX_BATCH_SIZE)]
        count: usize,
    },
}

impl Cli {
    /// Config file and environment, with command-line flags applied last.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(datacenter_id) = self.datacenter_id {
            config.datacenter_id = Some(datacenter_id);
        }
        if let Some(machine_id) = self.machine_id {
            config.machine_id = Some(machine_id);
        }
        if let Some(level) = &self.log {
            config.log.level = level.clone();
        }
        Ok(config)
    }
}

/// Run `command` and render its JSON output.
pub fn execute(command: &Command, config: &Config) -> Result<String, BoxDynError> {
    let output = match command {
        Command::Generate { count: None } => {
            let id = config.build()?.next_id()?;
            json!({ "id": id })
        }
        Command::Generate { count: Some(count) } => {
            let batch = config.build()?.next_ids(*count)?;
            serde_json::to_value(batch)?
        }
        Command::Parse { id } => {
            let epoch = config.epoch_ms.unwrap_or(DEFAULT_EPOCH);
            serde_json::to_value(parse_id_with_epoch(*id, epoch))?
        }
        Command::Stats => serde_json::to_value(config.build()?.stats())?,
        Command::Bench { count } => {
            let batch = config.build()?.next_ids(*count)?;
            info!(
                count = batch.count,
                duration_micros = batch.duration_micros,
                "generated {} ids ({:.2} ids/second)",
                batch.count,
                batch.rate()
            );
            json!({
                "count": batch.count,
                "duration_micros": batch.duration_micros,
                "rate": batch.rate(),
            })
        }
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::Value;

    fn config(datacenter_id: i64, machine_id: i64) -> Config {
        Config {
            datacenter_id: Some(datacenter_id),
            machine_id: Some(machine_id),
            ..Config::default()
        }
    }

    #[test]
    fn parses_generate_with_global_flags() {
        let cli = Cli::parse_from([
            "snowflake-id",
            "generate",
            "--count",
            "5",
            "--datacenter-id",
            "2",
            "--machine-id",
            "9",
        ]);
        assert!(matches!(cli.command, Command::Generate { count: Some(5) }));
        assert_eq!(cli.datacenter_id, Some(2));
        assert_eq!(cli.machine_id, Some(9));
    }

    #[test]
    fn parses_negative_id() {
        let cli = Cli::parse_from(["snowflake-id", "parse", "-42"]);
        assert!(matches!(cli.command, Command::Parse { id: -42 }));
    }

    #[test]
    fn bench_defaults_to_max_batch() {
        let cli = Cli::parse_from(["snowflake-id", "bench"]);
        assert!(matches!(cli.command, Command::Bench { count: MAX_BATCH_SIZE }));
    }

    #[test]
    fn generate_single_id() {
        let out = execute(&Command::Generate { count: None }, &config(4, 5)).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let id = value["id"].as_i64().unwrap();
        let parsed = crate::parse_id(id);
        assert_eq!(parsed.datacenter_id, 4);
        assert_eq!(parsed.machine_id, 5);
    }

    #[test]
    fn generate_batch() {
        let out = execute(&Command::Generate { count: Some(3) }, &config(0, 0)).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 3);
        assert_eq!(value["ids"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn generate_rejects_oversized_batch() {
        let err = execute(&Command::Generate { count: Some(10_001) }, &config(0, 0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidBatchSize { .. })
        ));
    }

    #[test]
    fn parse_needs_no_identity() {
        let id = ((1_700_000_000_000 - DEFAULT_EPOCH) << 22) | (1 << 17) | (2 << 12) | 3;
        let out = execute(&Command::Parse { id }, &Config::default()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["datetime"], "2023-11-14T22:13:20Z");
        assert_eq!(value["datacenter_id"], 1);
        assert_eq!(value["machine_id"], 2);
        assert_eq!(value["sequence"], 3);
    }

    #[test]
    fn stats_reports_identity() {
        let out = execute(&Command::Stats, &config(7, 8)).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["datacenter_id"], 7);
        assert_eq!(value["machine_id"], 8);
        assert_eq!(value["max_sequence"], 4095);
        assert_eq!(value["epoch"], DEFAULT_EPOCH);
    }

    #[test]
    fn invalid_identity_is_reported() {
        let err = execute(&Command::Stats, &config(32, 0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidConfiguration { field: "datacenter_id", .. })
        ));
    }
}
