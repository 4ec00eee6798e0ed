use serde::{Deserialize, Serialize};
use std::path::Path;

use super::checker::CheckerConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub checker: CheckerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub resolver: Option<String>,
    pub zones: Option<Vec<String>>,
    pub query_timeout_ms: Option<u64>,
    pub max_in_flight: Option<usize>,
    pub max_retries: Option<u32>,
    pub verbose: bool,
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(resolver) = overrides.resolver {
            self.checker.resolver = resolver;
        }
        if let Some(zones) = overrides.zones {
            self.checker.zones = zones;
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.checker.query_timeout_ms = timeout;
        }
        if let Some(max_in_flight) = overrides.max_in_flight {
            self.checker.max_in_flight = max_in_flight;
        }
        if let Some(max_retries) = overrides.max_retries {
            self.checker.retry.max_retries = max_retries;
        }
        if overrides.verbose {
            self.checker.verbose = true;
            self.logging.level = "debug".to_string();
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checker = &self.checker;

        if checker.resolver.trim().is_empty() {
            return Err(ConfigError::Validation(
                "checker.resolver cannot be empty".to_string(),
            ));
        }
        if checker.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "checker.query_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if checker.max_in_flight == 0 {
            return Err(ConfigError::Validation(
                "checker.max_in_flight must be greater than 0".to_string(),
            ));
        }
        if let Some(zone) = checker.zones.iter().find(|z| z.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "checker.zones contains a blank entry: {:?}",
                zone
            )));
        }
        if checker.retry.initial_backoff_ms > checker.retry.max_backoff_ms {
            return Err(ConfigError::Validation(format!(
                "checker.retry.initial_backoff_ms ({}) exceeds max_backoff_ms ({})",
                checker.retry.initial_backoff_ms, checker.retry.max_backoff_ms
            )));
        }

        Ok(())
    }
}
