//! Run command implementation

use super::{build_screener, render_table};
use crate::config::Config;
use crate::scheduler::RefreshScheduler;
use crate::screener::CycleOutcome;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Rows to print after each refresh
    #[arg(short, long, default_value = "25")]
    pub limit: usize,

    /// Only print rows with a flagged fast-horizon change
    #[arg(long)]
    pub movers_only: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let screener = build_screener(config)?;
        let mut handle = RefreshScheduler::new(screener.clone(), config.refresh.interval()).start();

        loop {
            tokio::select! {
                outcome = handle.next_outcome() => {
                    let Some(outcome) = outcome else {
                        tracing::warn!("Refresh loop exited");
                        break;
                    };

                    let view = screener.view().await;
                    if let CycleOutcome::Failed { error } = &outcome {
                        eprintln!("{error}");
                    }
                    if outcome.is_updated() || view.last_updated.is_some() {
                        println!("{}", render_table(&view, self.limit, self.movers_only));
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown requested");
                    break;
                }
            }
        }

        handle.stop().await;
        Ok(())
    }
}
