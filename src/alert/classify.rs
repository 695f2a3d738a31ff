//! Cell-level classification of percentage changes

use super::ThresholdConfig;
use crate::market::{Asset, Horizon};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a single (asset, horizon) value should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    /// Zero or unavailable
    Neutral,
    PositiveNormal,
    NegativeNormal,
    /// Gain at or beyond the threshold
    PositiveFlagged,
    /// Loss at or beyond the threshold
    NegativeFlagged,
}

impl CellClass {
    pub fn is_flagged(self) -> bool {
        matches!(self, CellClass::PositiveFlagged | CellClass::NegativeFlagged)
    }
}

/// Classify one value against its threshold; `|value| >= threshold` is flagged
pub fn classify(value: Option<Decimal>, threshold: Decimal) -> CellClass {
    let Some(value) = value else {
        return CellClass::Neutral;
    };

    let flagged = value.abs() >= threshold;
    if value > Decimal::ZERO {
        if flagged {
            CellClass::PositiveFlagged
        } else {
            CellClass::PositiveNormal
        }
    } else if value < Decimal::ZERO {
        if flagged {
            CellClass::NegativeFlagged
        } else {
            CellClass::NegativeNormal
        }
    } else {
        CellClass::Neutral
    }
}

/// Classification of every horizon for one asset, serialized keyed by horizon label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<Horizon, CellClass>",
    from = "BTreeMap<Horizon, CellClass>"
)]
pub struct HorizonClasses {
    classes: [CellClass; 5],
}

impl HorizonClasses {
    pub fn get(&self, horizon: Horizon) -> CellClass {
        self.classes[horizon.index()]
    }

    /// Any fast horizon flagged
    pub fn any_fast_flagged(&self) -> bool {
        Horizon::FAST.into_iter().any(|h| self.get(h).is_flagged())
    }
}

impl From<HorizonClasses> for BTreeMap<Horizon, CellClass> {
    fn from(classes: HorizonClasses) -> Self {
        Horizon::ALL.into_iter().map(|h| (h, classes.get(h))).collect()
    }
}

impl From<BTreeMap<Horizon, CellClass>> for HorizonClasses {
    fn from(map: BTreeMap<Horizon, CellClass>) -> Self {
        HorizonClasses {
            classes: Horizon::ALL.map(|h| map.get(&h).copied().unwrap_or(CellClass::Neutral)),
        }
    }
}

/// Classify all five horizons of an asset
pub fn classify_asset(asset: &Asset, thresholds: &ThresholdConfig) -> HorizonClasses {
    HorizonClasses {
        classes: Horizon::ALL.map(|h| classify(asset.change.get(h), thresholds.get(h))),
    }
}
