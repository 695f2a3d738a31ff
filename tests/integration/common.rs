//! Synthetic market data shared by the integration tests

use async_trait::async_trait;
use mover_watch::alert::{AlertReport, AlertSink, Notifier};
use mover_watch::market::{FetchError, MarketDataProvider, MarketRow, PageRequest, Sparkline};
use mover_watch::screener::{Screener, Settings};
use mover_watch::snapshot::{FetchPlan, SnapshotFetcher, SnapshotMerger};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PAGES: u32 = 2;
pub const PER_PAGE: u32 = 250;

/// Rank whose 24h change sits exactly on the default 24h threshold
pub const BOUNDARY_RANK: u32 = 37;

/// Rank sent without a sparkline
pub const NO_SERIES_RANK: u32 = 500;

/// Ranks 1..=500 with flat hourly series at 100
///
/// Every row has a 0.1% 1h move, so nothing is flagged unless a test adds a
/// mover.
#[derive(Default)]
pub struct SyntheticProvider {
    failing: Mutex<HashSet<u32>>,
    short: Mutex<HashSet<u32>>,
    movers: Mutex<HashMap<u32, Decimal>>,
    delay: Mutex<Duration>,
    pub calls: AtomicU32,
}

impl SyntheticProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_page(&self, page: u32) {
        self.failing.lock().unwrap().insert(page);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Serve `page` one row short
    pub fn shorten_page(&self, page: u32) {
        self.short.lock().unwrap().insert(page);
    }

    /// Give `rank` the supplied 1h change
    pub fn set_mover(&self, rank: u32, change_1h: Decimal) {
        self.movers.lock().unwrap().insert(rank, change_1h);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn row(&self, rank: u32) -> MarketRow {
        let change_1h = self
            .movers
            .lock()
            .unwrap()
            .get(&rank)
            .copied()
            .unwrap_or(dec!(0.1));

        MarketRow {
            id: format!("coin-{rank}"),
            symbol: format!("c{rank}"),
            name: format!("Coin {rank}"),
            rank: Some(rank),
            price: Some(dec!(100)),
            market_cap: Some(Decimal::from(1_000_000u64 * u64::from(501 - rank))),
            volume: Some(Decimal::from(rank)),
            change_1h: Some(change_1h),
            change_24h: Some(if rank == BOUNDARY_RANK { dec!(15) } else { dec!(1) }),
            change_7d: Some(dec!(2)),
            sparkline: (rank != NO_SERIES_RANK).then(|| Sparkline {
                price: vec![dec!(100); 169],
            }),
        }
    }

    pub fn page_rows(&self, request: &PageRequest) -> Vec<MarketRow> {
        let first = (request.page - 1) * request.per_page + 1;
        (first..first + request.per_page).map(|rank| self.row(rank)).collect()
    }
}

#[async_trait]
impl MarketDataProvider for SyntheticProvider {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<MarketRow>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&request.page) {
            return Err(FetchError::Status {
                page: request.page,
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        let mut rows = self.page_rows(request);
        if self.short.lock().unwrap().contains(&request.page) {
            rows.pop();
        }
        Ok(rows)
    }
}

/// Counts notifications
#[derive(Default)]
pub struct RecordingSink {
    pub fired: AtomicUsize,
}

impl AlertSink for RecordingSink {
    fn notify(&self, _report: &AlertReport) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn plan() -> FetchPlan {
    FetchPlan {
        pages: PAGES,
        per_page: PER_PAGE,
        timeout: Duration::from_secs(10),
    }
}

pub fn screener(
    provider: Arc<SyntheticProvider>,
    sink: Arc<RecordingSink>,
) -> Arc<Screener<SyntheticProvider>> {
    Arc::new(Screener::new(
        SnapshotFetcher::new(provider, plan()),
        SnapshotMerger::default(),
        Notifier::new(sink),
        Settings::default(),
    ))
}
