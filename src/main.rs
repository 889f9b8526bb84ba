//! Realtime Trade Router - terminal monitor
//!
//! Prints the slippage surface and pending mempool swaps, refreshing on an
//! interval, or once with `--once`.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use trade_router::{
    config::Config,
    monitor::{Monitor, MonitorSettings},
    network::{BitqueryClient, BitquerySource},
    service::RefreshService,
    utils,
};

#[derive(Debug, Parser)]
#[command(name = "trade-router", about = "Realtime Trade Router", version)]
struct Args {
    /// Fetch data once and exit (no auto-refresh)
    #[arg(long)]
    once: bool,

    /// Override refresh interval in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    utils::setup_output_directories()?;
    let _logging_guard = utils::setup_logging("trade-router", false)?;

    let mut config = Config::from_env()?;
    if let Some(secs) = args.interval {
        config = config.with_refresh_interval(Duration::from_secs(secs));
    }

    info!("📋 Configuration:");
    info!("   API: {}", config.api_url);
    info!("   Refresh Interval: {}s", config.refresh_interval.as_secs());
    info!("   Trade Size: {}", config.default_trade_amount);
    if let Some(pair) = &config.watch_pair {
        info!("   Watch Pair: {} / {}", pair.token_a, pair.token_b);
    }

    let client = BitqueryClient::new(&config)?;
    let source = BitquerySource::new(client, &config);
    let service = Arc::new(RefreshService::new(source, &config));
    let monitor = Monitor::new(service, MonitorSettings::from(&config));

    if args.once {
        return monitor.run_once(&mut std::io::stdout().lock()).await.inspect_err(|e| {
            error!("Single fetch failed: {:#}", e);
        });
    }

    println!("Starting Realtime Trade Router monitor...");
    println!("Data will refresh every {} seconds", config.refresh_interval.as_secs());
    println!("Press Ctrl+C to exit\n");

    monitor
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}
