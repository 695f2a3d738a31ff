//! Snapshot merger
//!
//! Concatenates the pages of one cycle, drops duplicate ids and rows that
//! lack a rank or price, orders by rank and fills the derived horizons.
//! Ranks are expected to run `1..=N` where N is the fetched universe size.

use crate::market::{Asset, Horizon, HorizonChanges, MarketRow, Snapshot};
use crate::momentum::MomentumDeriver;
use crate::telemetry::{increment_counter, CounterMetric};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Integrity anomalies seen while merging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Rows dropped because their id was already seen
    pub duplicates: usize,
    /// Rows dropped for lacking a rank
    pub missing_rank: usize,
    /// Rows dropped for lacking a price
    pub missing_price: usize,
    /// Ranks are not exactly 1..N
    pub non_contiguous: bool,
    /// Assets missing from the expected universe size
    pub short_by: usize,
}

impl MergeReport {
    /// Rows excluded from the snapshot
    pub fn dropped(&self) -> usize {
        self.duplicates + self.missing_rank + self.missing_price
    }

    /// No anomaly at all
    pub fn is_clean(&self) -> bool {
        self.dropped() == 0 && !self.non_contiguous && self.short_by == 0
    }
}

/// Builds snapshots from fetched pages
#[derive(Debug, Clone, Default)]
pub struct SnapshotMerger {
    deriver: MomentumDeriver,
    universe_size: Option<usize>,
}

impl SnapshotMerger {
    /// Create a merger using the given deriver
    pub fn new(deriver: MomentumDeriver) -> Self {
        Self {
            deriver,
            universe_size: None,
        }
    }

    /// Expect exactly `size` assets ranked `1..=size`
    pub fn with_universe_size(mut self, size: usize) -> Self {
        self.universe_size = Some(size);
        self
    }

    pub fn universe_size(&self) -> Option<usize> {
        self.universe_size
    }

    /// Merge pages into a rank-ordered snapshot
    pub fn merge(
        &self,
        pages: Vec<Vec<MarketRow>>,
        captured_at: DateTime<Utc>,
    ) -> (Snapshot, MergeReport) {
        let mut report = MergeReport::default();
        let mut seen = HashSet::new();
        let mut assets = Vec::with_capacity(pages.iter().map(Vec::len).sum());

        for row in pages.into_iter().flatten() {
            if !seen.insert(row.id.clone()) {
                tracing::debug!(id = %row.id, "Dropping duplicate asset id");
                report.duplicates += 1;
                continue;
            }

            let Some(rank) = row.rank else {
                tracing::debug!(id = %row.id, "Dropping asset without rank");
                report.missing_rank += 1;
                continue;
            };

            let Some(price) = row.price else {
                tracing::debug!(id = %row.id, "Dropping asset without price");
                report.missing_price += 1;
                continue;
            };

            assets.push(self.build_asset(row, rank, price));
        }

        // Rank drift between page requests can hand two ids the same rank
        assets.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));

        let expected = self.universe_size.unwrap_or(assets.len());
        report.short_by = expected.saturating_sub(assets.len());
        report.non_contiguous = assets.len() > expected
            || assets
                .iter()
                .enumerate()
                .any(|(i, a)| a.rank as usize != i + 1);

        if !report.is_clean() {
            tracing::warn!(
                duplicates = report.duplicates,
                missing_rank = report.missing_rank,
                missing_price = report.missing_price,
                non_contiguous = report.non_contiguous,
                short_by = report.short_by,
                "Snapshot merged with integrity anomalies"
            );
            increment_counter(CounterMetric::DroppedRows, report.dropped() as u64);
        }

        (Snapshot::new(assets, captured_at), report)
    }

    fn build_asset(&self, row: MarketRow, rank: u32, price: Decimal) -> Asset {
        let price_series = row
            .sparkline
            .map(|s| s.price)
            .unwrap_or_default();

        let mut change = HorizonChanges::default()
            .with(Horizon::H1, row.change_1h)
            .with(Horizon::H24, row.change_24h)
            .with(Horizon::D7, row.change_7d);
        self.deriver.apply(&mut change, &price_series, price);

        Asset {
            id: row.id,
            symbol: row.symbol,
            name: row.name,
            rank,
            price,
            market_cap: row.market_cap,
            volume: row.volume,
            change,
            price_series,
        }
    }
}
