//! Market data module
//!
//! Data model for the tracked universe and the provider that supplies it.

mod coingecko;
mod error;
mod types;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig, COINGECKO_API_URL};
pub use error::FetchError;
pub use types::{Asset, Horizon, HorizonChanges, MarketRow, Snapshot, Sparkline};

use async_trait::async_trait;

/// Which page of the ranked listing to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u32,
    /// Rows per page
    pub per_page: u32,
}

/// Source of ranked market rows
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch one page of rows ordered by descending market capitalization
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<MarketRow>, FetchError>;
}
