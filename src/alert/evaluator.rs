//! Aggregate alert evaluation over a snapshot

use super::{classify, ThresholdConfig};
use crate::market::{Horizon, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one snapshot against the fast-horizon thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertReport {
    /// At least one fast-horizon cell crossed its threshold
    pub triggered: bool,
    /// Fast-horizon cells at or beyond their threshold
    pub flagged_cells: usize,
    /// Assets with at least one such cell
    pub flagged_assets: usize,
    /// Capture time of the evaluated snapshot
    pub snapshot_at: DateTime<Utc>,
}

/// Compare every asset's 15m/1h/4h change against its threshold
///
/// Runs regardless of mute state; muting only affects what is done with the
/// report.
pub fn evaluate(snapshot: &Snapshot, thresholds: &ThresholdConfig) -> AlertReport {
    let mut flagged_cells = 0;
    let mut flagged_assets = 0;

    for asset in snapshot.assets() {
        let cells = Horizon::FAST
            .into_iter()
            .filter(|h| classify(asset.change.get(*h), thresholds.get(*h)).is_flagged())
            .count();
        if cells > 0 {
            flagged_assets += 1;
            flagged_cells += cells;
        }
    }

    AlertReport {
        triggered: flagged_cells > 0,
        flagged_cells,
        flagged_assets,
        snapshot_at: snapshot.captured_at(),
    }
}
