//! Configuration system for FleetForge.
//!
//! Load fleet search configuration from TOML or YAML files to control time
//! budgets, patience and the initialization strategy without code changes.
//!
//! # Examples
//!
//! ```
//! use fleetforge_config::{FleetConfig, InitStrategy};
//! use std::time::Duration;
//!
//! let config = FleetConfig::from_toml_str(r#"
//!     time_limit_seconds = 1800
//!
//!     [init]
//!     strategy = "greedy"
//!     oracle_time_limit_seconds = 30
//!
//!     [removal]
//!     patience = 3
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(1800));
//! assert_eq!(config.init.strategy, InitStrategy::Greedy);
//! assert_eq!(config.removal.patience, 3);
//! assert_eq!(config.switch.patience, 1);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use fleetforge_config::FleetConfig;
//!
//! let config = FleetConfig::load("fleet.toml").unwrap_or_default();
//! ```

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use fleetforge_core::Instance;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main fleet search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FleetConfig {
    /// Total wall-clock budget of the run in seconds.
    ///
    /// Also bounds the oracle call that checks the full fleet.
    pub time_limit_seconds: f64,

    /// Share of the total budget available to INIT and improvement.
    pub improvement_fraction: f64,

    /// Lower bound for the time limit handed to the routing solve.
    pub routing_min_time_limit_seconds: f64,

    /// Per-call oracle limit during improvement phases.
    pub oracle_time_limit_seconds: f64,

    /// Initialization phase configuration.
    pub init: InitConfig,

    /// Removal phase configuration.
    pub removal: RemovalConfig,

    /// Switch phase configuration.
    pub switch: SwitchConfig,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 3600.0,
            improvement_fraction: 0.75,
            routing_min_time_limit_seconds: 100.0,
            oracle_time_limit_seconds: 60.0,
            init: InitConfig::default(),
            removal: RemovalConfig::default(),
            switch: SwitchConfig::default(),
        }
    }
}

impl FleetConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the total time limit.
    pub fn with_time_limit_seconds(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = seconds;
        self
    }

    /// Sets the initialization strategy.
    pub fn with_init_strategy(mut self, strategy: InitStrategy) -> Self {
        self.init.strategy = strategy;
        self
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.time_limit_seconds)
    }

    /// Deadline of INIT plus improvement, measured from run start.
    pub fn improvement_time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.time_limit_seconds * self.improvement_fraction)
    }

    pub fn routing_min_time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.routing_min_time_limit_seconds)
    }

    pub fn oracle_time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.oracle_time_limit_seconds)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("time_limit_seconds", self.time_limit_seconds)?;
        positive("oracle_time_limit_seconds", self.oracle_time_limit_seconds)?;
        positive("init.oracle_time_limit_seconds", self.init.oracle_time_limit_seconds)?;
        positive("removal.time_limit_seconds", self.removal.time_limit_seconds)?;
        seconds(
            "routing_min_time_limit_seconds",
            self.routing_min_time_limit_seconds,
            0.0..=MAX_SECONDS,
        )?;
        if !(self.improvement_fraction > 0.0 && self.improvement_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "improvement_fraction must be in (0, 1], got {}",
                self.improvement_fraction
            )));
        }
        if self.removal.patience == 0 || self.switch.patience == 0 {
            return Err(ConfigError::Invalid("patience must be at least 1".to_string()));
        }
        if !(1..=3).contains(&self.switch.max_swap_out) {
            return Err(ConfigError::Invalid(format!(
                "switch.max_swap_out must be 1, 2 or 3, got {}",
                self.switch.max_swap_out
            )));
        }
        Ok(())
    }
}

/// Largest accepted time setting, about 31 years.
pub const MAX_SECONDS: f64 = 1e9;

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        seconds(key, value, 0.0..=MAX_SECONDS)
    } else {
        Err(ConfigError::Invalid(format!(
            "{key} must be a positive number of seconds, got {value}"
        )))
    }
}

// NaN fails `contains`, so every accepted value converts to a `Duration`
fn seconds(key: &str, value: f64, range: RangeInclusive<f64>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{key} must be between {} and {} seconds, got {value}",
            range.start(),
            range.end()
        )))
    }
}

/// How the first feasible fleet is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    /// Bisect the shortest feasible prefix of the score-sorted pool.
    #[default]
    Bisection,

    /// Grow or shrink an energy-balance estimate one vehicle at a time.
    Greedy,
}

/// Initialization phase configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct InitConfig {
    pub strategy: InitStrategy,

    /// Per-call oracle limit during initialization.
    pub oracle_time_limit_seconds: f64,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            strategy: InitStrategy::Bisection,
            oracle_time_limit_seconds: 60.0,
        }
    }
}

impl InitConfig {
    pub fn oracle_time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.oracle_time_limit_seconds)
    }
}

/// Removal phase configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RemovalConfig {
    /// Phase budget in seconds.
    pub time_limit_seconds: f64,

    /// Failed removals per scan before the phase stops.
    pub patience: u64,

    /// Failed removals tolerated after a feasible one was found in a scan.
    pub after_feasible_patience: u64,

    /// Maximum oracle calls of the phase.
    pub oracle_call_limit: Option<u64>,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 120.0,
            patience: 2,
            after_feasible_patience: 1,
            oracle_call_limit: None,
        }
    }
}

impl RemovalConfig {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.time_limit_seconds)
    }
}

/// Switch phase configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SwitchConfig {
    /// Consecutive infeasible candidates tried per swapped-out subset.
    pub patience: u64,

    /// Failed candidates tolerated after a feasible replacement was found.
    pub after_feasible_patience: u64,

    /// Largest number of vehicles swapped out at once (1 to 3).
    pub max_swap_out: usize,

    /// Maximum oracle calls of a single switch phase run.
    pub oracle_call_limit: Option<u64>,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            patience: 1,
            after_feasible_patience: 1,
            max_swap_out: 3,
            oracle_call_limit: None,
        }
    }
}

/// Parses an instance from a TOML string.
pub fn instance_from_toml_str(s: &str) -> Result<Instance, ConfigError> {
    Ok(toml::from_str(s)?)
}

/// Loads an instance from a TOML file.
pub fn instance_from_toml_file(path: impl AsRef<Path>) -> Result<Instance, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    instance_from_toml_str(&contents)
}

/// Parses an instance from a YAML string.
pub fn instance_from_yaml_str(s: &str) -> Result<Instance, ConfigError> {
    Ok(serde_yaml::from_str(s)?)
}

/// Loads an instance from a YAML file.
pub fn instance_from_yaml_file(path: impl AsRef<Path>) -> Result<Instance, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    instance_from_yaml_str(&contents)
}

#[cfg(test)]
mod tests;
