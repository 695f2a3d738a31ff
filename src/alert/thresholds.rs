//! Per-horizon alert thresholds

use crate::market::Horizon;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest threshold a user may set, in percent
pub const MIN_THRESHOLD: Decimal = Decimal::ONE;

/// Highest threshold a user may set, in percent
pub const MAX_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Threshold rejected by validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("threshold for {horizon} must be between 1 and 50 percent, got {value}")]
    OutOfRange { horizon: Horizon, value: Decimal },
}

/// Absolute percentage change at which a horizon counts as flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    #[serde(rename = "15m")]
    m15: Decimal,
    #[serde(rename = "1h")]
    h1: Decimal,
    #[serde(rename = "4h")]
    h4: Decimal,
    #[serde(rename = "24h")]
    h24: Decimal,
    #[serde(rename = "7d")]
    d7: Decimal,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            m15: Decimal::new(3, 0),
            h1: Decimal::new(5, 0),
            h4: Decimal::new(8, 0),
            h24: Decimal::new(15, 0),
            d7: Decimal::new(25, 0),
        }
    }
}

impl ThresholdConfig {
    /// Threshold for a horizon
    pub fn get(&self, horizon: Horizon) -> Decimal {
        match horizon {
            Horizon::M15 => self.m15,
            Horizon::H1 => self.h1,
            Horizon::H4 => self.h4,
            Horizon::H24 => self.h24,
            Horizon::D7 => self.d7,
        }
    }

    /// Replace one threshold; out-of-range values are rejected and nothing changes
    pub fn set(&mut self, horizon: Horizon, value: Decimal) -> Result<(), ThresholdError> {
        check(horizon, value)?;
        let slot = match horizon {
            Horizon::M15 => &mut self.m15,
            Horizon::H1 => &mut self.h1,
            Horizon::H4 => &mut self.h4,
            Horizon::H24 => &mut self.h24,
            Horizon::D7 => &mut self.d7,
        };
        *slot = value;
        Ok(())
    }

    /// Builder-style setter
    pub fn with(mut self, horizon: Horizon, value: Decimal) -> Result<Self, ThresholdError> {
        self.set(horizon, value)?;
        Ok(self)
    }

    /// Check every horizon is within range
    pub fn validate(&self) -> Result<(), ThresholdError> {
        Horizon::ALL
            .into_iter()
            .try_for_each(|h| check(h, self.get(h)))
    }
}

fn check(horizon: Horizon, value: Decimal) -> Result<(), ThresholdError> {
    if (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value) {
        Ok(())
    } else {
        Err(ThresholdError::OutOfRange { horizon, value })
    }
}
