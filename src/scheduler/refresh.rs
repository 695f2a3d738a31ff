//! Fixed-interval refresh loop with an explicit stop

use crate::market::MarketDataProvider;
use crate::screener::{CycleOutcome, Screener};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Buffered outcomes before new ones are dropped
const OUTCOME_BUFFER: usize = 16;

/// Drives `Screener::run_cycle` immediately and then every `interval`
pub struct RefreshScheduler<P: MarketDataProvider> {
    screener: Arc<Screener<P>>,
    interval: Duration,
}

impl<P: MarketDataProvider + 'static> RefreshScheduler<P> {
    /// Create a scheduler for the given screener
    pub fn new(screener: Arc<Screener<P>>, interval: Duration) -> Self {
        Self { screener, interval }
    }

    /// Spawn the refresh loop
    ///
    /// The first cycle starts right away. Dropping the returned handle stops
    /// the loop the same way `SchedulerHandle::stop` does.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_BUFFER);

        tracing::info!(interval_secs = self.interval.as_secs(), "Starting refresh scheduler");

        let task = tokio::spawn(Self::run_loop(
            self.screener,
            self.interval,
            stop_rx,
            outcome_tx,
        ));

        SchedulerHandle {
            stop_tx,
            task,
            outcomes: outcome_rx,
        }
    }

    async fn run_loop(
        screener: Arc<Screener<P>>,
        interval: Duration,
        mut stop_rx: watch::Receiver<bool>,
        outcome_tx: mpsc::Sender<CycleOutcome>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {}
            }

            if *stop_rx.borrow() {
                break;
            }

            // A stop during the cycle drops it before it can touch state
            let outcome = tokio::select! {
                biased;
                _ = stop_rx.changed() => {
                    tracing::info!("Refresh cycle abandoned on stop");
                    break;
                }
                outcome = screener.run_cycle() => outcome,
            };

            match &outcome {
                CycleOutcome::Updated { assets, .. } => {
                    tracing::debug!(assets, "Cycle complete");
                }
                CycleOutcome::Failed { error } => {
                    tracing::debug!(error = %error, "Cycle failed, retrying on next tick");
                }
            }

            if let Err(mpsc::error::TrySendError::Full(_)) = outcome_tx.try_send(outcome) {
                tracing::debug!("Outcome receiver lagging, dropping cycle outcome");
            }
        }

        tracing::info!("Refresh scheduler stopped");
    }
}

/// Running scheduler; owns its cancellation
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    outcomes: mpsc::Receiver<CycleOutcome>,
}

impl SchedulerHandle {
    /// Wait for the next completed cycle; `None` once the loop has ended
    pub async fn next_outcome(&mut self) -> Option<CycleOutcome> {
        self.outcomes.recv().await
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop ticking, abandon any cycle in flight, and wait for the loop to exit
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Refresh loop ended abnormally");
        }
    }
}
