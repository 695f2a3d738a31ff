//! Snapshot command implementation

use super::{build_screener, render_table};
use crate::config::Config;
use crate::ranking::{SortKey, SortOrder, SortSelection};
use crate::screener::CycleOutcome;
use clap::Args;

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Sort column: rank, price, market_cap, volume, change_15m, change_1h, ...
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort direction: asc or desc
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Rows to print
    #[arg(short, long, default_value = "50")]
    pub limit: usize,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl SnapshotArgs {
    /// Sort selection after applying flags over the configured default
    fn selection(&self, config: &Config) -> SortSelection {
        let base = config.display.sort();
        match (self.sort, self.order) {
            (None, None) => base,
            (key, order) => SortSelection::new(
                key.unwrap_or(base.key),
                order.unwrap_or(SortOrder::Descending),
            ),
        }
    }

    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let screener = build_screener(config)?;
        screener.set_sort(self.selection(config)).await;

        if let CycleOutcome::Failed { error } = screener.run_cycle().await {
            anyhow::bail!(error);
        }

        let view = screener.view().await;
        if self.json {
            let rows: Vec<_> = view.rows.iter().take(self.limit).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            println!("{}", render_table(&view, self.limit, false));
        }
        Ok(())
    }
}
