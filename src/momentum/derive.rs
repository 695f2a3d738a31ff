//! Percentage change over a horizon from a fixed-interval sample series

use crate::market::{Horizon, HorizonChanges};
use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Decimal places kept on derived changes
const CHANGE_DP: u32 = 4;

/// Configuration for momentum derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveConfig {
    /// Spacing between consecutive price samples
    pub sample_interval: Duration,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            // 7-day sparkline: 168 hourly points
            sample_interval: Duration::hours(1),
        }
    }
}

/// Number of samples to step back from the newest one for `horizon`
///
/// Rounded up, never less than one.
pub fn steps_for(horizon: Horizon, sample_interval: Duration) -> usize {
    let window = horizon.duration().num_seconds();
    let step = sample_interval.num_seconds().max(1);
    ((window + step - 1) / step).max(1) as usize
}

/// Percentage change from the reference sample to `current`
///
/// The reference is the sample `steps_for(horizon)` positions before the newest
/// one, or the oldest sample when the series is shorter than that. Returns
/// `None` for an empty series or a non-positive reference price.
pub fn derive_change(
    series: &[Decimal],
    current: Decimal,
    horizon: Horizon,
    sample_interval: Duration,
) -> Option<Decimal> {
    let newest = series.len().checked_sub(1)?;
    let reference = series[newest.saturating_sub(steps_for(horizon, sample_interval))];

    if reference <= Decimal::ZERO {
        return None;
    }

    let pct = (current - reference)
        .checked_div(reference)?
        .checked_mul(dec!(100))?;

    Some(pct.round_dp_with_strategy(CHANGE_DP, RoundingStrategy::MidpointAwayFromZero))
}

/// Fills the derived horizons of an asset's change table
#[derive(Debug, Clone, Default)]
pub struct MomentumDeriver {
    config: DeriveConfig,
}

impl MomentumDeriver {
    /// Create a deriver with the given configuration
    pub fn new(config: DeriveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeriveConfig {
        &self.config
    }

    /// Derive one horizon
    pub fn derive(&self, series: &[Decimal], current: Decimal, horizon: Horizon) -> Option<Decimal> {
        derive_change(series, current, horizon, self.config.sample_interval)
    }

    /// Populate every derived horizon in `changes`
    pub fn apply(&self, changes: &mut HorizonChanges, series: &[Decimal], current: Decimal) {
        for horizon in Horizon::DERIVED {
            changes.set(horizon, self.derive(series, current, horizon));
        }
    }
}
