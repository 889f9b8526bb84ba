//! Realtime Trade Router - dashboard API
//!
//! Runs the refresh loop in the background and serves the snapshot over HTTP.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};
use trade_router::{
    config::Config,
    network::{BitqueryClient, BitquerySource},
    service::RefreshService,
    utils,
    web::{self, AppState},
};

#[derive(Debug, Parser)]
#[command(name = "trade-router-dashboard", about = "Realtime Trade Router dashboard API", version)]
struct Args {
    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Override refresh interval in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    utils::setup_output_directories()?;
    let _logging_guard = utils::setup_logging("trade-router-dashboard", true)?;

    let mut config = Config::from_env()?;
    if let Some(secs) = args.interval {
        config = config.with_refresh_interval(Duration::from_secs(secs));
    }
    let bind = args.bind.unwrap_or(config.dashboard_bind);

    info!("🚀 Starting Realtime Trade Router dashboard");
    info!("   Data refresh interval: {}s", config.refresh_interval.as_secs());

    let client = BitqueryClient::new(&config)?;
    let source = BitquerySource::new(client, &config);
    let service = Arc::new(RefreshService::new(source, &config));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    let refresh_task = Arc::clone(&service).spawn(config.refresh_interval, shutdown_rx.clone());

    let state = Arc::new(AppState::new(service, &config));
    let mut server_shutdown = shutdown_rx;
    let server = web::start_server(state, bind, async move {
        let _ = server_shutdown.wait_for(|stop| *stop).await;
    });

    let signal_tx = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("\n📛 Received shutdown signal (Ctrl+C)..."),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
        }
        let _ = signal_tx.send(true);
    });

    let result = server.await;
    if let Err(e) = &result {
        error!("Dashboard server stopped with error: {:#}", e);
    }
    let _ = shutdown_tx.send(true);

    if let Err(e) = refresh_task.await {
        warn!("Refresh task ended abnormally: {}", e);
    }

    result
}
