//! Screener module
//!
//! Holds the current snapshot and user settings, runs the fetch/merge/evaluate
//! cycle, and exposes the ranked and classified view.

mod cycle;
mod state;

pub use cycle::{CycleOutcome, Screener};
pub use state::{RowView, ScreenerState, ScreenerView, Settings};
