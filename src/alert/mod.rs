//! Threshold alert module
//!
//! Classifies each (asset, horizon) change against user thresholds and folds
//! the fast horizons into one alert signal per snapshot.

mod classify;
mod evaluator;
mod sink;
mod thresholds;

pub use classify::{classify, classify_asset, CellClass, HorizonClasses};
pub use evaluator::{evaluate, AlertReport};
pub use sink::{AlertSink, BellSink, LogSink, Notifier};
pub use thresholds::{ThresholdConfig, ThresholdError, MAX_THRESHOLD, MIN_THRESHOLD};
