//! Prometheus metrics

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// All pages of one cycle
    Fetch,
    /// Fetch, merge and evaluate
    Cycle,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Assets in the current snapshot
    SnapshotAssets,
    /// Fast-horizon cells over threshold
    FlaggedCells,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    FetchFailures,
    AlertsFired,
    /// Rows excluded while merging
    DroppedRows,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Fetch => "moverwatch_fetch_latency_ms",
        LatencyMetric::Cycle => "moverwatch_cycle_latency_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::SnapshotAssets => "moverwatch_snapshot_assets",
        GaugeMetric::FlaggedCells => "moverwatch_flagged_cells",
    };

    metrics::gauge!(metric_name).set(value);
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric, by: u64) {
    let metric_name = match metric {
        CounterMetric::FetchFailures => "moverwatch_fetch_failures_total",
        CounterMetric::AlertsFired => "moverwatch_alerts_fired_total",
        CounterMetric::DroppedRows => "moverwatch_dropped_rows_total",
    };

    metrics::counter!(metric_name).increment(by);
}

/// Install the Prometheus recorder and serve `/metrics` on `port`
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}
