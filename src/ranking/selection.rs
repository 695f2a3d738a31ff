//! Sort key and direction selection

use crate::market::{Asset, Horizon};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown sort key string
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct SortKeyError(pub String);

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Column the ranking is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortKey {
    Rank,
    Price,
    /// Percentage change over a horizon
    Change(Horizon),
    MarketCap,
    Volume,
}

impl SortKey {
    /// Every selectable key, in column order
    pub fn all() -> Vec<SortKey> {
        let mut keys = vec![SortKey::Rank, SortKey::Price];
        keys.extend(Horizon::ALL.into_iter().map(SortKey::Change));
        keys.extend([SortKey::MarketCap, SortKey::Volume]);
        keys
    }

    /// Comparison value for an asset; `None` is unavailable
    pub fn value(self, asset: &Asset) -> Option<Decimal> {
        match self {
            SortKey::Rank => Some(Decimal::from(asset.rank)),
            SortKey::Price => Some(asset.price),
            SortKey::Change(horizon) => asset.change.get(horizon),
            SortKey::MarketCap => asset.market_cap,
            SortKey::Volume => asset.volume,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Rank => f.write_str("rank"),
            SortKey::Price => f.write_str("price"),
            SortKey::Change(h) => write!(f, "change_{h}"),
            SortKey::MarketCap => f.write_str("market_cap"),
            SortKey::Volume => f.write_str("volume"),
        }
    }
}

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "rank" => Ok(SortKey::Rank),
            "price" => Ok(SortKey::Price),
            "market_cap" | "marketcap" => Ok(SortKey::MarketCap),
            "volume" => Ok(SortKey::Volume),
            other => other
                .strip_prefix("change_")
                .unwrap_or(other)
                .parse::<Horizon>()
                .map(SortKey::Change)
                .map_err(|_| SortKeyError(s.to_string())),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = SortKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

/// Active (key, order) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSelection {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortSelection {
    fn default() -> Self {
        Self {
            key: SortKey::Rank,
            order: SortOrder::Descending,
        }
    }
}

impl SortSelection {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Column-header click: same key flips the order, a new key starts descending
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.order = self.order.toggled();
        } else {
            self.key = key;
            self.order = SortOrder::Descending;
        }
    }
}
