//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `TICKCHART_ALPHAVANTAGE_API_KEY` | `demo` |
//! | `TICKCHART_ALPHAVANTAGE_URL` | `https://www.alphavantage.co/query` |
//! | `TICKCHART_TIMEOUT_MS` | `30000` |
//! | `TICKCHART_SEARCH_TIMEOUT_MS` | `20000` |
//! | `TICKCHART_RATE_LIMIT_COOLDOWN_SECS` | `60` |
//! | `TICKCHART_SYMBOLS_CSV` | `stocks.csv` |
//! | `TICKCHART_STATIC_DIR` | `static` |
//! | `TICKCHART_BIND` | `0.0.0.0:5000` (`PORT` overrides the port) |
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_API_KEY: &str = "demo";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
    pub search_timeout_ms: u64,
    pub rate_limit_cooldown: Duration,
    pub symbols_csv: PathBuf,
    pub static_dir: PathBuf,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::from(DEFAULT_API_KEY),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 30_000,
            search_timeout_ms: 20_000,
            rate_limit_cooldown: crate::retry::DEFAULT_COOLDOWN,
            symbols_csv: PathBuf::from("stocks.csv"),
            static_dir: PathBuf::from("static"),
            bind_addr: String::from("0.0.0.0:5000"),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                tracing::warn!(%error, "ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let text = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr = match (text("TICKCHART_BIND"), text("PORT")) {
            (Some(bind), _) => bind,
            (None, Some(port)) => {
                let port = parse_number("PORT", &port)?;
                format!("0.0.0.0:{port}")
            }
            (None, None) => defaults.bind_addr,
        };

        Ok(Self {
            api_key: text("TICKCHART_ALPHAVANTAGE_API_KEY").unwrap_or(defaults.api_key),
            base_url: text("TICKCHART_ALPHAVANTAGE_URL").unwrap_or(defaults.base_url),
            timeout_ms: number_or(&text, "TICKCHART_TIMEOUT_MS", defaults.timeout_ms)?,
            search_timeout_ms: number_or(
                &text,
                "TICKCHART_SEARCH_TIMEOUT_MS",
                defaults.search_timeout_ms,
            )?,
            rate_limit_cooldown: Duration::from_secs(number_or(
                &text,
                "TICKCHART_RATE_LIMIT_COOLDOWN_SECS",
                defaults.rate_limit_cooldown.as_secs(),
            )?),
            symbols_csv: text("TICKCHART_SYMBOLS_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.symbols_csv),
            static_dir: text("TICKCHART_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            bind_addr,
        })
    }

    /// Single retry after the configured cooldown.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.rate_limit_cooldown, 1)
    }
}

fn number_or(
    text: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match text(var) {
        Some(value) => parse_number(var, &value),
        None => Ok(default),
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TICKCHART_ALPHAVANTAGE_API_KEY", "secret"),
            ("TICKCHART_RATE_LIMIT_COOLDOWN_SECS", "5"),
            ("PORT", "8080"),
        ]))
        .expect("valid overrides");

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.rate_limit_cooldown, Duration::from_secs(5));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn explicit_bind_beats_port() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TICKCHART_BIND", "127.0.0.1:9000"),
            ("PORT", "8080"),
        ]))
        .expect("valid overrides");
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn rejects_malformed_numbers() {
        let error = AppConfig::from_lookup(lookup(&[("TICKCHART_TIMEOUT_MS", "soon")]))
            .expect_err("must fail");
        assert_eq!(
            error,
            ConfigError::InvalidNumber {
                var: "TICKCHART_TIMEOUT_MS",
                value: String::from("soon"),
            }
        );
    }
}
