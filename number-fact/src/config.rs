//! Runtime configuration
//!
//! Defaults, then an optional TOML file, then command-line flags. The log
//! file can also come from `NUMBER_FACT_LOG`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "NUMBER_FACT_LOG";

pub const DEFAULT_BASE_URL: &str = "http://numbersapi.com";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Counter with number trivia and an auto-increment timer
#[derive(Parser, Debug, Default)]
#[command(name = "number-fact")]
#[command(about = "Count up and down, fetch facts about the count, or let a timer count for you")]
pub struct Args {
    /// TOML config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Base URL of the facts service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Timer period in milliseconds
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,

    /// Write logs to this file (logging is off otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("tick_interval_ms must be greater than zero")]
    ZeroTickInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    pub tick_interval_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            log_file: None,
        }
    }
}

impl Config {
    /// Resolve the configuration for a run.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if config.log_file.is_none() {
            config.log_file = std::env::var_os(LOG_ENV).map(PathBuf::from);
        }
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(url) = &args.base_url {
            self.base_url = url.clone();
        }
        if let Some(ms) = args.tick_interval_ms {
            self.tick_interval_ms = ms;
        }
        if let Some(path) = &args.log_file {
            self.log_file = Some(path.clone());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://numbersapi.com");
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("tick_interval_ms = 250\n").unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_toml_str("base_uri = \"http://x\"\n").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = Config::from_toml_str(
            "base_url = \"http://file.example\"\ntick_interval_ms = 500\n",
        )
        .unwrap();
        let args = Args {
            base_url: Some("http://flag.example".into()),
            ..Default::default()
        };
        config.apply_args(&args);
        assert_eq!(config.base_url, "http://flag.example");
        assert_eq!(config.tick_interval_ms, 500);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let args = Args {
            tick_interval_ms: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Config::load(&args),
            Err(ConfigError::ZeroTickInterval)
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/number-fact.toml")),
            ..Default::default()
        };
        let err = Config::load(&args).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/number-fact.toml"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "number-fact",
            "--base-url",
            "http://localhost:8080",
            "--tick-interval-ms",
            "100",
        ]);
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(args.tick_interval_ms, Some(100));
        assert_eq!(args.config, None);
    }
}
