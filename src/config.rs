//! Runtime configuration, loaded from the environment.

use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating [`TavernConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a valid number, got {value:?}")]
    Unparsable { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Tavern configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TavernConfig {
    /// Orders a generation accepts before it drains and continues as new.
    pub restart_threshold: u32,
    /// Wall-clock budget of one order's sub-task.
    pub order_timeout: Duration,
    /// Wall-clock budget of one validation step.
    pub step_timeout: Duration,
    /// Signals that may queue before `submit_order` waits for room.
    pub signal_buffer: usize,
    /// Requests that may queue in the customer directory's mailbox.
    pub directory_buffer: usize,
}

impl Default for TavernConfig {
    fn default() -> Self {
        Self {
            restart_threshold: 3,
            order_timeout: Duration::from_secs(120),
            step_timeout: Duration::from_secs(60),
            signal_buffer: 32,
            directory_buffer: 32,
        }
    }
}

impl TavernConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TAVERN_RESTART_THRESHOLD` | 3 |
    /// | `TAVERN_ORDER_TIMEOUT_SECS` | 120 |
    /// | `TAVERN_STEP_TIMEOUT_SECS` | 60 |
    /// | `TAVERN_SIGNAL_BUFFER` | 32 |
    /// | `TAVERN_DIRECTORY_BUFFER` | 32 |
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        let config = Self {
            restart_threshold: var_or("TAVERN_RESTART_THRESHOLD", defaults.restart_threshold)?,
            order_timeout: Duration::from_secs(var_or(
                "TAVERN_ORDER_TIMEOUT_SECS",
                defaults.order_timeout.as_secs(),
            )?),
            step_timeout: Duration::from_secs(var_or(
                "TAVERN_STEP_TIMEOUT_SECS",
                defaults.step_timeout.as_secs(),
            )?),
            signal_buffer: var_or("TAVERN_SIGNAL_BUFFER", defaults.signal_buffer)?,
            directory_buffer: var_or("TAVERN_DIRECTORY_BUFFER", defaults.directory_buffer)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restart_threshold == 0 {
            return Err(ConfigError::Zero("restart_threshold"));
        }
        if self.order_timeout.is_zero() {
            return Err(ConfigError::Zero("order_timeout"));
        }
        if self.step_timeout.is_zero() {
            return Err(ConfigError::Zero("step_timeout"));
        }
        // tokio channels panic on a zero capacity
        if self.signal_buffer == 0 {
            return Err(ConfigError::Zero("signal_buffer"));
        }
        if self.directory_buffer == 0 {
            return Err(ConfigError::Zero("directory_buffer"));
        }
        Ok(())
    }
}

fn var_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Unparsable { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TavernConfig::default();
        assert_eq!(config.restart_threshold, 3);
        assert_eq!(config.order_timeout, Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let config = TavernConfig {
            restart_threshold: 0,
            ..TavernConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero("restart_threshold"))
        );
    }

    #[test]
    fn test_unparsable_variable() {
        // Unique name so parallel tests never race on it.
        env::set_var("TAVERN_TEST_UNPARSABLE", "three");
        let result: Result<u32, _> = var_or("TAVERN_TEST_UNPARSABLE", 3);
        assert_eq!(
            result,
            Err(ConfigError::Unparsable {
                var: "TAVERN_TEST_UNPARSABLE",
                value: "three".to_string(),
            })
        );

        let missing: Result<u32, _> = var_or("TAVERN_TEST_MISSING", 7);
        assert_eq!(missing, Ok(7));
    }
}
