use clap::Parser;
use mover_watch::cli::{Cli, Commands};
use mover_watch::config::Config;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
        Config::default()
    };

    // Initialize telemetry
    mover_watch::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!(
                interval_secs = config.refresh.interval_secs,
                "Starting screener"
            );
            args.execute(&config).await?;
        }
        Commands::Snapshot(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            let provider = &config.provider;
            println!("Current configuration:");
            println!(
                "  Provider: {} ({} pages x {} rows, {}s timeout)",
                provider.base_url, provider.pages, provider.per_page, provider.timeout_secs
            );
            println!("  Refresh: every {}s", config.refresh.interval_secs);
            println!(
                "  Momentum: {}m sample interval",
                config.momentum.sample_interval_mins
            );
            let thresholds: Vec<String> = mover_watch::market::Horizon::ALL
                .iter()
                .map(|h| format!("{}={}%", h, config.thresholds.get(*h)))
                .collect();
            println!("  Thresholds: {}", thresholds.join(", "));
            let sort = config.display.sort();
            println!(
                "  Display: sort {} {:?}, muted={}, bell={}",
                sort.key, sort.order, config.display.muted, config.display.bell
            );
        }
    }

    Ok(())
}
