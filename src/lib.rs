//! mover-watch: screener for the top crypto assets by market cap
//!
//! This library provides the core components for:
//! - Paged market data retrieval from CoinGecko
//! - Snapshot merging with derived 15m/4h momentum
//! - Sorting by any column with unavailable values last
//! - Threshold classification and aggregate alerts
//! - A fixed-interval refresh scheduler
//! - Structured logging and Prometheus metrics

pub mod alert;
pub mod cli;
pub mod config;
pub mod market;
pub mod momentum;
pub mod ranking;
pub mod scheduler;
pub mod screener;
pub mod snapshot;
pub mod telemetry;
