//! Market data model
//!
//! `MarketRow` is what the provider hands back, `Asset` is what the rest of
//! the crate works with once a row has been merged into a `Snapshot`.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lookback window a percentage change is measured over
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "7d")]
    D7,
}

impl Horizon {
    /// Every horizon, shortest first
    pub const ALL: [Horizon; 5] = [
        Horizon::M15,
        Horizon::H1,
        Horizon::H4,
        Horizon::H24,
        Horizon::D7,
    ];

    /// Horizons wired to the aggregate alert
    pub const FAST: [Horizon; 3] = [Horizon::M15, Horizon::H1, Horizon::H4];

    /// Horizons computed locally from the price series
    pub const DERIVED: [Horizon; 2] = [Horizon::M15, Horizon::H4];

    /// Length of the lookback window
    pub fn duration(self) -> Duration {
        match self {
            Horizon::M15 => Duration::minutes(15),
            Horizon::H1 => Duration::hours(1),
            Horizon::H4 => Duration::hours(4),
            Horizon::H24 => Duration::hours(24),
            Horizon::D7 => Duration::days(7),
        }
    }

    /// Short label used in config files and CLI output
    pub fn label(self) -> &'static str {
        match self {
            Horizon::M15 => "15m",
            Horizon::H1 => "1h",
            Horizon::H4 => "4h",
            Horizon::H24 => "24h",
            Horizon::D7 => "7d",
        }
    }

    /// Whether the value is derived locally rather than supplied by the provider
    pub fn is_derived(self) -> bool {
        matches!(self, Horizon::M15 | Horizon::H4)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Horizon::ALL
            .into_iter()
            .find(|h| h.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown horizon: {s}"))
    }
}

/// Percentage change per horizon; `None` means unavailable, never zero
///
/// Serialized as a map keyed by horizon label, e.g. `{"15m": null, "1h": "0.42"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<Horizon, Option<Decimal>>",
    from = "BTreeMap<Horizon, Option<Decimal>>"
)]
pub struct HorizonChanges {
    values: [Option<Decimal>; 5],
}

impl HorizonChanges {
    /// Value for a horizon
    pub fn get(&self, horizon: Horizon) -> Option<Decimal> {
        self.values[horizon.index()]
    }

    /// Set the value for a horizon
    pub fn set(&mut self, horizon: Horizon, value: Option<Decimal>) {
        self.values[horizon.index()] = value;
    }

    /// Builder-style setter
    pub fn with(mut self, horizon: Horizon, value: Option<Decimal>) -> Self {
        self.set(horizon, value);
        self
    }
}

impl From<HorizonChanges> for BTreeMap<Horizon, Option<Decimal>> {
    fn from(changes: HorizonChanges) -> Self {
        Horizon::ALL.into_iter().map(|h| (h, changes.get(h))).collect()
    }
}

impl From<BTreeMap<Horizon, Option<Decimal>>> for HorizonChanges {
    fn from(map: BTreeMap<Horizon, Option<Decimal>>) -> Self {
        map.into_iter()
            .fold(Self::default(), |changes, (h, value)| changes.with(h, value))
    }
}

/// One tracked instrument inside a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Provider identifier (e.g., "bitcoin")
    pub id: String,
    /// Ticker symbol (e.g., "btc")
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Market-cap rank, unique within a snapshot
    pub rank: u32,
    /// Current unit price in the quote currency
    pub price: Decimal,
    pub market_cap: Option<Decimal>,
    pub volume: Option<Decimal>,
    /// Percentage changes, provided and derived
    pub change: HorizonChanges,
    /// Historical samples, oldest first
    pub price_series: Vec<Decimal>,
}

/// A complete capture of the tracked universe, ordered by ascending rank
///
/// Never mutated once built; a new cycle replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    assets: Vec<Asset>,
    captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot; callers are responsible for rank ordering
    pub(crate) fn new(assets: Vec<Asset>, captured_at: DateTime<Utc>) -> Self {
        Self {
            assets,
            captured_at,
        }
    }

    /// Assets in rank order
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// When the underlying pages were fetched
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Look up an asset by provider id
    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Look up an asset by rank
    pub fn by_rank(&self, rank: u32) -> Option<&Asset> {
        self.assets
            .binary_search_by_key(&rank, |a| a.rank)
            .ok()
            .map(|i| &self.assets[i])
    }
}

/// Raw row as returned by the provider's `/coins/markets` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(rename = "market_cap_rank", default)]
    pub rank: Option<u32>,
    #[serde(rename = "current_price", default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    #[serde(rename = "total_volume", default)]
    pub volume: Option<Decimal>,
    #[serde(rename = "price_change_percentage_1h_in_currency", default)]
    pub change_1h: Option<Decimal>,
    #[serde(rename = "price_change_percentage_24h_in_currency", default)]
    pub change_24h: Option<Decimal>,
    #[serde(rename = "price_change_percentage_7d_in_currency", default)]
    pub change_7d: Option<Decimal>,
    #[serde(rename = "sparkline_in_7d", default)]
    pub sparkline: Option<Sparkline>,
}

/// Recent price samples attached to a row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<Decimal>,
}

impl MarketRow {
    /// Sample series, oldest first; empty when the provider sent none
    pub fn price_series(&self) -> &[Decimal] {
        self.sparkline
            .as_ref()
            .map(|s| s.price.as_slice())
            .unwrap_or_default()
    }
}
