//! Screener state and the views handed to a presentation layer

use crate::alert::{AlertReport, HorizonClasses, ThresholdConfig};
use crate::market::{Asset, Snapshot};
use crate::ranking::SortSelection;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// User-adjustable settings, kept in memory only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub thresholds: ThresholdConfig,
    pub sort: SortSelection,
    /// Suppress the notification side effect; classification still runs
    pub muted: bool,
}

/// Result of the most recent cycles
#[derive(Debug, Clone, Default)]
pub struct ScreenerState {
    /// Latest successfully merged snapshot
    pub snapshot: Option<Arc<Snapshot>>,
    /// Status message of the last failed cycle, cleared on success
    pub error: Option<String>,
    /// Capture time of `snapshot`
    pub last_updated: Option<DateTime<Utc>>,
    /// Alert evaluation of `snapshot` at the time it was merged
    pub last_alert: Option<AlertReport>,
    /// Completed cycles, successful or not
    pub cycles: u64,
}

/// One ranked row with its cell classifications
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub asset: Asset,
    pub classes: HorizonClasses,
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct ScreenerView {
    /// Assets in the order of `settings.sort`
    pub rows: Vec<RowView>,
    /// A cycle is in flight
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub settings: Settings,
    pub alert: Option<AlertReport>,
}

impl ScreenerView {
    /// Rows with at least one flagged fast-horizon cell
    pub fn flagged_rows(&self) -> impl Iterator<Item = &RowView> {
        self.rows.iter().filter(|r| r.classes.any_fast_flagged())
    }

    /// Whether the data on display is older than `max_age`
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        match self.last_updated {
            Some(at) => now - at > max_age,
            None => true,
        }
    }
}
