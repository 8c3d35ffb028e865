//! Gatemon - live timing-gate monitor
//!
//! Polls a remote gate device over HTTP, reconciles each snapshot into a
//! stable gate ordering, and logs derived timing metrics. Use the
//! `gatemon-tui` binary for the interactive dashboard.
//!
//! Module structure:
//! - `domain/` - Core types (GateId, GateView, SequenceDelta)
//! - `io/` - External interfaces (HTTP snapshot source)
//! - `services/` - Engine logic (order, merger, selection, analyzer, poller)
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use gatemon::infra::{Config, Metrics};
use gatemon::io::HttpSnapshotSource;
use gatemon::services::{GateEngine, PollDriver};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Gatemon - timing gate sequence monitor
#[derive(Parser, Debug)]
#[command(name = "gatemon", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging, level configurable via RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("gatemon starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        source_url = %config.source_url(),
        poll_interval_ms = %config.poll_interval_ms(),
        request_timeout_ms = %config.request_timeout_ms(),
        "config_loaded"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let engine = Arc::new(Mutex::new(GateEngine::new(config.activity_thresholds())));
    let metrics = Arc::new(Metrics::new());
    let source = Arc::new(HttpSnapshotSource::new(&config)?);

    // Poll driver - the only writer of engine state
    let driver = PollDriver::new(
        source,
        engine.clone(),
        metrics.clone(),
        Duration::from_millis(config.poll_interval_ms()),
    );
    let driver_handle = tokio::spawn(driver.run(shutdown_rx));

    // Periodic metrics reporter
    let report_engine = engine.clone();
    let report_metrics = metrics.clone();
    let report_interval = config.metrics_interval_secs();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(report_interval));
        loop {
            interval.tick().await;
            let (known_gates, connected) = {
                let engine = report_engine.lock();
                (engine.gate_count(), engine.connected())
            };
            report_metrics.report(known_gates, connected);
        }
    });

    // Handle shutdown on Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    driver_handle.await?;

    info!("gatemon shutdown complete");
    Ok(())
}
