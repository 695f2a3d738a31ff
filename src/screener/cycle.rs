//! Fetch, merge and evaluate cycle

use super::state::{RowView, ScreenerState, ScreenerView, Settings};
use crate::alert::{classify_asset, evaluate, AlertReport, Notifier, ThresholdError};
use crate::config::Config;
use crate::market::{Horizon, MarketDataProvider, Snapshot};
use crate::momentum::MomentumDeriver;
use crate::ranking::{rank_assets, SortKey, SortSelection};
use crate::snapshot::{MergeReport, SnapshotFetcher, SnapshotMerger};
use crate::telemetry::{record_latency, set_gauge, GaugeMetric, LatencyMetric};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new snapshot replaced the previous one
    Updated {
        assets: usize,
        alert: AlertReport,
        /// The alert notification actually fired
        notified: bool,
        /// Rows dropped and rank anomalies seen while merging
        merge: MergeReport,
    },
    /// The previous snapshot was kept
    Failed { error: String },
}

impl CycleOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, CycleOutcome::Updated { .. })
    }
}

/// Marks a cycle in flight for as long as it lives
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the current snapshot and the user settings
pub struct Screener<P: MarketDataProvider> {
    fetcher: SnapshotFetcher<P>,
    merger: SnapshotMerger,
    notifier: Notifier,
    state: RwLock<ScreenerState>,
    settings: RwLock<Settings>,
    in_flight: AtomicUsize,
}

impl<P: MarketDataProvider> Screener<P> {
    /// Create a screener from its parts
    ///
    /// The merger is told to expect the fetcher's full universe.
    pub fn new(
        fetcher: SnapshotFetcher<P>,
        merger: SnapshotMerger,
        notifier: Notifier,
        settings: Settings,
    ) -> Self {
        Self {
            merger: merger.with_universe_size(fetcher.plan().universe_size()),
            fetcher,
            notifier,
            state: RwLock::new(ScreenerState::default()),
            settings: RwLock::new(settings),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a screener wired from configuration
    pub fn from_config(provider: Arc<P>, config: &Config, notifier: Notifier) -> Self {
        Self::new(
            SnapshotFetcher::new(provider, config.provider.fetch_plan()),
            SnapshotMerger::new(MomentumDeriver::new(config.momentum.derive_config())),
            notifier,
            Settings {
                thresholds: config.thresholds,
                sort: config.display.sort(),
                muted: config.display.muted,
            },
        )
    }

    /// Run one fetch, merge and evaluate cycle
    ///
    /// On failure the previous snapshot stays in place and only the error
    /// message changes. Whichever cycle completes last owns the snapshot.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let started = Instant::now();
        let _in_flight = InFlight::enter(&self.in_flight);

        let outcome = match self.fetcher.fetch().await {
            Ok(fetched) => {
                let (snapshot, merge) = self.merger.merge(fetched.pages, fetched.fetched_at);
                let settings = *self.settings.read().await;
                let alert = evaluate(&snapshot, &settings.thresholds);
                let assets = snapshot.len();

                self.replace_snapshot(snapshot, alert).await;

                set_gauge(GaugeMetric::SnapshotAssets, assets as f64);
                set_gauge(GaugeMetric::FlaggedCells, alert.flagged_cells as f64);

                let notified = self.notifier.dispatch(&alert, settings.muted);

                tracing::info!(
                    assets,
                    flagged_cells = alert.flagged_cells,
                    alert = alert.triggered,
                    notified,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Snapshot updated"
                );

                CycleOutcome::Updated {
                    assets,
                    alert,
                    notified,
                    merge,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, page = ?e.page(), "Fetch failed, keeping previous snapshot");
                let error = format!("Failed to refresh market data: {e}");

                let mut state = self.state.write().await;
                state.error = Some(error.clone());
                state.cycles += 1;

                CycleOutcome::Failed { error }
            }
        };

        record_latency(LatencyMetric::Cycle, started.elapsed());
        outcome
    }

    async fn replace_snapshot(&self, snapshot: Snapshot, alert: AlertReport) {
        let mut state = self.state.write().await;
        state.last_updated = Some(snapshot.captured_at());
        state.snapshot = Some(Arc::new(snapshot));
        state.last_alert = Some(alert);
        state.error = None;
        state.cycles += 1;
    }

    /// Current snapshot, if any cycle has succeeded
    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.read().await.snapshot.clone()
    }

    /// Copy of the cycle state
    pub async fn state(&self) -> ScreenerState {
        self.state.read().await.clone()
    }

    /// A cycle is currently running
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Ranked, classified rows plus status for a presentation layer
    pub async fn view(&self) -> ScreenerView {
        let settings = *self.settings.read().await;
        let state = self.state.read().await.clone();

        let rows = state
            .snapshot
            .as_deref()
            .map(|snapshot| {
                rank_assets(snapshot, &settings.sort)
                    .into_iter()
                    .map(|asset| RowView {
                        asset: asset.clone(),
                        classes: classify_asset(asset, &settings.thresholds),
                    })
                    .collect()
            })
            .unwrap_or_default();

        ScreenerView {
            rows,
            loading: self.is_loading(),
            error: state.error,
            last_updated: state.last_updated,
            settings,
            alert: state.last_alert,
        }
    }

    pub async fn settings(&self) -> Settings {
        *self.settings.read().await
    }

    /// Change one threshold; rejected values leave settings untouched
    pub async fn set_threshold(&self, horizon: Horizon, value: Decimal) -> Result<(), ThresholdError> {
        self.settings.write().await.thresholds.set(horizon, value)
    }

    /// Column-header click semantics
    pub async fn select_sort(&self, key: SortKey) -> SortSelection {
        let mut settings = self.settings.write().await;
        settings.sort.select(key);
        settings.sort
    }

    pub async fn set_sort(&self, selection: SortSelection) {
        self.settings.write().await.sort = selection;
    }

    pub async fn set_muted(&self, muted: bool) {
        self.settings.write().await.muted = muted;
    }
}
