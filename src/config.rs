//! Configuration types for mover-watch

use crate::alert::{ThresholdConfig, ThresholdError};
use crate::market::CoinGeckoConfig;
use crate::momentum::DeriveConfig;
use crate::ranking::{SortKey, SortOrder, SortSelection};
use crate::snapshot::FetchPlan;
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Allowed range for a single page request timeout
const MIN_TIMEOUT_SECS: u64 = 10;
const MAX_TIMEOUT_SECS: u64 = 15;

/// Longest supported spacing between price samples (one day)
const MAX_SAMPLE_INTERVAL_MINS: i64 = 24 * 60;

/// Rejected configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("provider.timeout_secs must be between 10 and 15, got {0}")]
    Timeout(u64),
    #[error("provider.pages and provider.per_page must be positive")]
    EmptyUniverse,
    #[error("refresh.interval_secs must be positive")]
    ZeroInterval,
    #[error("momentum.sample_interval_mins must be between 1 and 1440, got {0}")]
    SampleInterval(i64),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Market data provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Quote currency
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// Rows per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Pages per cycle
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Bound on each page request (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional demo API key
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    crate::market::COINGECKO_API_URL.to_string()
}
fn default_vs_currency() -> String {
    "usd".to_string()
}
fn default_per_page() -> u32 {
    250
}
fn default_pages() -> u32 {
    2
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            vs_currency: default_vs_currency(),
            per_page: default_per_page(),
            pages: default_pages(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings for the HTTP client
    pub fn client_config(&self) -> CoinGeckoConfig {
        CoinGeckoConfig {
            base_url: self.base_url.clone(),
            vs_currency: self.vs_currency.clone(),
            timeout: self.timeout(),
            api_key: self.api_key.clone(),
        }
    }

    /// Pages to request each cycle
    pub fn fetch_plan(&self) -> FetchPlan {
        FetchPlan {
            pages: self.pages,
            per_page: self.per_page,
            timeout: self.timeout(),
        }
    }
}

/// Refresh scheduler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Momentum derivation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MomentumConfig {
    /// Spacing of the provider's price samples (minutes)
    #[serde(default = "default_sample_interval_mins")]
    pub sample_interval_mins: i64,
}

fn default_sample_interval_mins() -> i64 {
    60
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            sample_interval_mins: default_sample_interval_mins(),
        }
    }
}

impl MomentumConfig {
    /// Deriver settings; out-of-range values are clamped, `Config::validate` rejects them
    pub fn derive_config(&self) -> DeriveConfig {
        let mins = self
            .sample_interval_mins
            .clamp(1, MAX_SAMPLE_INTERVAL_MINS);
        DeriveConfig {
            sample_interval: chrono::Duration::minutes(mins),
        }
    }
}

/// Initial view settings
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_sort_key")]
    pub sort_key: SortKey,

    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,

    /// Start with notifications muted
    #[serde(default)]
    pub muted: bool,

    /// Ring the terminal bell on alerts
    #[serde(default = "default_true")]
    pub bell: bool,
}

fn default_sort_key() -> SortKey {
    SortSelection::default().key
}
fn default_sort_order() -> SortOrder {
    SortSelection::default().order
}
fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sort_key: default_sort_key(),
            sort_order: default_sort_order(),
            muted: false,
            bell: true,
        }
    }
}

impl DisplayConfig {
    pub fn sort(&self) -> SortSelection {
        SortSelection::new(self.sort_key, self.sort_order)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeout = self.provider.timeout_secs;
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout) {
            return Err(ConfigError::Timeout(timeout));
        }
        if self.provider.pages == 0 || self.provider.per_page == 0 {
            return Err(ConfigError::EmptyUniverse);
        }
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        let sample_mins = self.momentum.sample_interval_mins;
        if !(1..=MAX_SAMPLE_INTERVAL_MINS).contains(&sample_mins) {
            return Err(ConfigError::SampleInterval(sample_mins));
        }
        self.thresholds.validate()?;
        Ok(())
    }
}
