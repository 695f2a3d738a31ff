//! CLI interface for mover-watch
//!
//! Provides subcommands for:
//! - `run`: Refresh on the configured interval and print movers
//! - `snapshot`: Fetch once and print the ranked table
//! - `config`: Show the effective configuration

mod run;
mod snapshot;
mod table;

pub use run::RunArgs;
pub use snapshot::SnapshotArgs;
pub use table::render_table;

use crate::alert::{AlertSink, BellSink, LogSink, Notifier};
use crate::config::Config;
use crate::market::CoinGeckoClient;
use crate::screener::Screener;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "mover-watch")]
#[command(about = "Screener for the largest crypto assets by market cap")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh continuously until interrupted
    Run(RunArgs),
    /// Fetch a single snapshot and print it
    Snapshot(SnapshotArgs),
    /// Show configuration
    Config,
}

/// Wire a CoinGecko-backed screener from configuration
pub fn build_screener(config: &Config) -> anyhow::Result<Arc<Screener<CoinGeckoClient>>> {
    let client = CoinGeckoClient::with_config(config.provider.client_config())?;
    let sink: Arc<dyn AlertSink> = if config.display.bell {
        Arc::new(BellSink)
    } else {
        Arc::new(LogSink)
    };

    Ok(Arc::new(Screener::from_config(
        Arc::new(client),
        config,
        Notifier::new(sink),
    )))
}
