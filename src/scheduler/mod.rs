//! Refresh scheduler module
//!
//! Runs the screener's cycle on a fixed interval until stopped.

mod refresh;

pub use refresh::{RefreshScheduler, SchedulerHandle};
