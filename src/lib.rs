//! Cryptodash: a terminal cryptocurrency market dashboard.
//!
//! Cryptodash fetches the top-N assets by market cap from a remote price API
//! and shows them as a live-filterable table:
//! - Fetch lifecycle with loading/ready/failed states and manual refetch
//! - Stale results from superseded fetches are discarded, never shown
//! - Case-insensitive name/symbol filter with a trailing debounce
//! - Single-coin details and remote search from the command line

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI shell (main.rs)                                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Fetch controller (generation-tagged)             │
//! │  - Debounced filter                                 │
//! │  - Event handling / view model computation          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Source Layer  │   │ Worker Layer  │
//! │ (ui/)         │   │ (source/)     │   │ (worker/)     │
//! │ - View models │   │ - CoinGecko   │   │ - Fetch tasks │
//! │ - Text frames │   │ - Mock        │   │ - Debounce    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data/config paths (infrastructure/)              │
//! │  - Error types (domain/error)                       │
//! │  - Asset model (domain/asset)                       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, rotating log file            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `~/.config/cryptodash/config.toml` if present)
//! 3. `CRYPTODASH_*` environment variables
//! 4. command-line flags
//!
//! ```toml
//! api_base_url = "https://api.coingecko.com/api/v3"
//! vs_currency = "usd"
//! per_page = 50
//! debounce_ms = 250
//! log_format = "json"
//! ```
//!
//! # Example
//!
//! ```rust
//! use cryptodash::{handle_event, Action, Dashboard, Event};
//!
//! let mut state = Dashboard::default();
//! let (_, actions) = handle_event(&mut state, &Event::Initialize)?;
//! assert!(matches!(actions.as_slice(), [Action::PostToWorker(_)]));
//! # Ok::<(), cryptodash::DashboardError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod source;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, Dashboard, Event, LoadState};
pub use domain::{AssetRecord, DashboardError, FetchError, MarketQuery, Result};
pub use source::{CoinGeckoSource, PriceSource};
pub use worker::{DashboardWorker, Dispatch};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Prefix of environment variables read by [`Config::apply_env`].
pub const ENV_PREFIX: &str = "CRYPTODASH_";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(DashboardError::Config(format!(
                "unknown log format '{other}' (expected 'pretty' or 'json')"
            ))),
        }
    }
}

/// A configuration override that could not be applied.
///
/// Overrides are parsed before logging is set up, so they are collected and
/// reported with [`RejectedSetting::warn`] once a subscriber exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSetting {
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl RejectedSetting {
    /// Emits the rejection as a warning on the current subscriber.
    pub fn warn(&self) {
        tracing::warn!(
            key = %self.key,
            value = %self.value,
            reason = %self.reason,
            "invalid config value, keeping previous value"
        );
    }
}

/// Dashboard configuration.
///
/// # Example
///
/// ```toml
/// api_key = "CG-xxxx"
/// per_page = 100
/// request_timeout_ms = 5000
/// log_level = "debug"
/// log_file = "-"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the CoinGecko-compatible API. Default: the public v3 endpoint.
    pub api_base_url: String,

    /// Sent as the `api_key` query parameter when set.
    pub api_key: Option<String>,

    /// Quote currency. Default: `"usd"`
    pub vs_currency: String,

    /// Number of assets fetched (single page). Default: 20
    pub per_page: u32,

    /// Page number. Default: 1
    pub page: u32,

    /// Filter debounce window in milliseconds. Default: 300
    pub debounce_ms: u64,

    /// Transport-level request timeout; none by default.
    pub request_timeout_ms: Option<u64>,

    /// Tracing level when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub log_level: String,

    pub log_format: LogFormat,

    /// Log file path; `-` logs to stderr. Default: `<data dir>/cryptodash.log`
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: source::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            vs_currency: "usd".to_string(),
            per_page: 20,
            page: 1,
            debounce_ms: 300,
            request_timeout_ms: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            log_file: None,
        }
    }
}

impl Config {
    /// Builds the effective configuration from defaults, a config file, and
    /// the process environment.
    ///
    /// An explicit `path` must exist. Without one, the default config file is
    /// read only if present.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the file cannot be read or parsed.
    /// Environment overrides that fail to parse are not errors; they are
    /// returned alongside the configuration for the caller to report.
    pub fn load(path: Option<&Path>) -> Result<(Self, Vec<RejectedSetting>)> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = infrastructure::default_config_file();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        let rejected = config.apply_env();
        Ok((config, rejected))
    }

    /// Parses a TOML config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the file cannot be read or is not
    /// valid TOML for this schema.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&text).map_err(|e| {
            DashboardError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Builds a configuration from string key/value pairs over the defaults.
    ///
    /// Rejected values are logged right away.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use cryptodash::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("per_page".to_string(), "50".to_string());
    /// map.insert("debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.per_page, 50);
    /// assert_eq!(config.debounce_ms, 300);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        for setting in config.apply_map(map) {
            setting.warn();
        }
        config
    }

    /// Overrides fields from string key/value pairs.
    ///
    /// # Parsing Rules
    ///
    /// - Unknown keys are ignored
    /// - Values that fail to parse keep the current value and are returned
    /// - An empty `api_key`, `request_timeout_ms` or `log_file` clears it
    pub fn apply_map(&mut self, map: &BTreeMap<String, String>) -> Vec<RejectedSetting> {
        let mut rejected = Vec::new();
        for (key, value) in map {
            let value = value.trim();
            let failure = match key.as_str() {
                "api_base_url" => assign(&mut self.api_base_url, value.to_string()),
                "api_key" => assign(&mut self.api_key, non_empty(value)),
                "vs_currency" => assign(&mut self.vs_currency, value.to_string()),
                "per_page" => parse_into(value, &mut self.per_page),
                "page" => parse_into(value, &mut self.page),
                "debounce_ms" => parse_into(value, &mut self.debounce_ms),
                "request_timeout_ms" if value.is_empty() => {
                    assign(&mut self.request_timeout_ms, None)
                }
                "request_timeout_ms" => match value.parse::<u64>() {
                    Ok(ms) => assign(&mut self.request_timeout_ms, Some(ms)),
                    Err(e) => Some(e.to_string()),
                },
                "log_level" => assign(&mut self.log_level, value.to_string()),
                "log_format" => parse_into(value, &mut self.log_format),
                "log_file" => assign(&mut self.log_file, non_empty(value)),
                _ => {
                    tracing::debug!(key = %key, "ignoring unknown config key");
                    None
                }
            };
            if let Some(reason) = failure {
                rejected.push(RejectedSetting {
                    key: key.clone(),
                    value: value.to_string(),
                    reason,
                });
            }
        }
        rejected
    }

    /// Overrides fields from `CRYPTODASH_*` environment variables.
    ///
    /// `CRYPTODASH_PER_PAGE=50` sets `per_page`, and so on.
    pub fn apply_env(&mut self) -> Vec<RejectedSetting> {
        let map: BTreeMap<String, String> = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|suffix| (suffix.to_ascii_lowercase(), value))
            })
            .collect();
        self.apply_map(&map)
    }

    /// Market request parameters.
    #[must_use]
    pub fn market_query(&self) -> MarketQuery {
        MarketQuery {
            vs_currency: self.vs_currency.clone(),
            page: self.page.max(1),
            per_page: self.per_page.max(1),
        }
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn assign<T>(slot: &mut T, value: T) -> Option<String> {
    *slot = value;
    None
}

/// Parses `value` into `slot`, returning the parse error message on failure.
fn parse_into<T>(value: &str, slot: &mut T) -> Option<String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.parse::<T>() {
        Ok(parsed) => assign(slot, parsed),
        Err(e) => Some(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_public_api() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.market_query(), MarketQuery::default());
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn map_overrides_and_falls_back() {
        let config = Config::from_map(&map(&[
            ("vs_currency", "eur"),
            ("page", "x"),
            ("request_timeout_ms", "2500"),
            ("log_format", "JSON"),
            ("api_key", ""),
        ]));
        assert_eq!(config.vs_currency, "eur");
        assert_eq!(config.page, 1);
        assert_eq!(config.request_timeout_ms, Some(2500));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_timeout_keeps_it_unset() {
        let config = Config::from_map(&map(&[("request_timeout_ms", "later")]));
        assert_eq!(config.request_timeout_ms, None);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rejected_values_are_returned_and_logged_later() {
        let mut config = Config::default();
        let rejected = config.apply_map(&map(&[
            ("per_page", "lots"),
            ("log_format", "xml"),
            ("page", "3"),
        ]));

        assert_eq!(config.per_page, 20);
        assert_eq!(config.page, 3);
        assert_eq!(config.log_format, LogFormat::Pretty);
        let keys: Vec<&str> = rejected.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["log_format", "per_page"]);

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            for setting in &rejected {
                setting.warn();
            }
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("per_page"));
        assert!(output.contains("lots"));
        assert!(output.contains("unknown log format 'xml'"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
