//! Notification side effects for a triggered alert

use super::AlertReport;
use crate::telemetry::{increment_counter, CounterMetric};
use std::io::Write;
use std::sync::Arc;

/// Receives the per-cycle notification when an alert fires
pub trait AlertSink: Send + Sync {
    fn notify(&self, report: &AlertReport);
}

/// Writes the alert to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn notify(&self, report: &AlertReport) {
        tracing::warn!(
            flagged_assets = report.flagged_assets,
            flagged_cells = report.flagged_cells,
            snapshot_at = %report.snapshot_at,
            "Movers detected"
        );
    }
}

/// Rings the terminal bell, then logs
#[derive(Debug, Default, Clone, Copy)]
pub struct BellSink;

impl AlertSink for BellSink {
    fn notify(&self, report: &AlertReport) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            tracing::debug!(error = %e, "Failed to ring terminal bell");
        }
        LogSink.notify(report);
    }
}

/// Decides whether a report turns into a notification
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn AlertSink>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self { sink }
    }

    /// Fire once for a triggered report unless muted; returns whether it fired
    pub fn dispatch(&self, report: &AlertReport, muted: bool) -> bool {
        if !report.triggered {
            return false;
        }

        if muted {
            tracing::info!(
                flagged_cells = report.flagged_cells,
                "Alert suppressed (muted)"
            );
            return false;
        }

        self.sink.notify(report);
        increment_counter(CounterMetric::AlertsFired, 1);
        true
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}
