//! CoinGecko API client
//!
//! Fetches one page of market rows from `/coins/markets`, ordered by
//! descending market capitalization, with 1h/24h/7d changes and the 7-day
//! sparkline attached.

use super::{FetchError, MarketDataProvider, MarketRow, PageRequest};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// CoinGecko public API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying a demo-plan API key
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Horizons requested from the provider
const PROVIDED_CHANGES: &str = "1h,24h,7d";

/// Configuration for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Quote currency (e.g., "usd")
    pub vs_currency: String,
    /// Request timeout
    pub timeout: Duration,
    /// Optional API key
    pub api_key: Option<String>,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            vs_currency: "usd".to_string(),
            timeout: Duration::from_secs(10),
            api_key: None,
        }
    }
}

/// Client for CoinGecko's market endpoint
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    client: Client,
}

impl CoinGeckoClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(CoinGeckoConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: CoinGeckoConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Endpoint URL for the markets listing
    fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.config.base_url.trim_end_matches('/'))
    }

    /// Query parameters for one page
    fn query(&self, request: &PageRequest) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.config.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", request.per_page.to_string()),
            ("page", request.page.to_string()),
            ("sparkline", "true".to_string()),
            ("price_change_percentage", PROVIDED_CHANGES.to_string()),
        ]
    }

    /// Decode a page body
    fn parse_page(page: u32, body: &str) -> Result<Vec<MarketRow>, FetchError> {
        serde_json::from_str(body).map_err(|e| FetchError::Malformed {
            page,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<MarketRow>, FetchError> {
        let url = self.markets_url();

        tracing::debug!(url = %url, page = request.page, per_page = request.per_page, "Fetching market page");

        let mut builder = self.client.get(&url).query(&self.query(request));
        if let Some(key) = &self.config.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    page: request.page,
                    after: self.config.timeout,
                }
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                page: request.page,
                status: status.as_u16(),
                body,
            });
        }

        let rows = Self::parse_page(request.page, &body)?;

        tracing::debug!(page = request.page, rows = rows.len(), "Market page received");

        Ok(rows)
    }
}
