//! The monitor loop and its single-shot variant

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};
use crate::{
    monitor::{Header, MonitorSettings, SnapshotView},
    network::MarketDataSource,
    service::{RefreshOutcome, RefreshService},
    types::SnapshotState,
};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

pub struct Monitor<S> {
    service: Arc<RefreshService<S>>,
    settings: MonitorSettings,
}

impl<S: MarketDataSource> Monitor<S> {
    pub fn new(service: Arc<RefreshService<S>>, settings: MonitorSettings) -> Self {
        Self { service, settings }
    }

    /// One fetch, one render. Errors if the fetch fails.
    pub async fn run_once<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Fetching data from Bitquery...")?;

        if let RefreshOutcome::Failed(e) = self.service.refresh_now().await {
            bail!("Fetch failed: {}", e);
        }
        let state = self.service.current_snapshot().await;
        let Some(snapshot) = state.ready() else {
            bail!("No snapshot available after refresh");
        };

        write!(
            out,
            "{}",
            SnapshotView {
                snapshot,
                settings: &self.settings,
                now: Utc::now(),
            }
        )?;
        out.flush()?;
        Ok(())
    }

    /// Refreshes and redraws every interval until `shutdown` resolves.
    pub async fn run<F: Future<Output = ()>>(&self, shutdown: F) -> Result<()> {
        tokio::pin!(shutdown);
        let mut ticker = time::interval(self.settings.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Monitor started ({}s refresh)",
            self.settings.refresh_interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received, exiting monitor loop...");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                outcome = self.service.refresh_now() => outcome,
                _ = &mut shutdown => {
                    info!("Shutdown signal received during refresh, exiting monitor loop...");
                    break;
                }
            };
            if let RefreshOutcome::Failed(e) = &outcome {
                warn!("Monitor cycle refresh failed: {}", e);
            }
            let state = self.service.current_snapshot().await;
            self.render_cycle(&mut std::io::stdout().lock(), &state, &outcome, Utc::now())?;
        }

        println!("\n\nShutting down...");
        Ok(())
    }

    pub fn render_cycle<W: Write>(
        &self,
        out: &mut W,
        state: &SnapshotState,
        outcome: &RefreshOutcome,
        now: DateTime<Utc>,
    ) -> Result<()> {
        write!(out, "{}", CLEAR_SCREEN)?;
        match state {
            SnapshotState::Ready(snapshot) => write!(
                out,
                "{}",
                SnapshotView {
                    snapshot,
                    settings: &self.settings,
                    now,
                }
            )?,
            SnapshotState::Pending => {
                write!(out, "{}", Header(&self.settings))?;
                writeln!(out, "\n  Waiting for the first successful fetch...")?;
            }
        }

        if let RefreshOutcome::Failed(e) = outcome {
            writeln!(out, "\n[ERROR] Refresh failed: {}", e)?;
            if state.ready().is_some() {
                writeln!(out, "        Showing data from the last successful refresh")?;
            }
        }

        writeln!(out, "\n{}", "-".repeat(80))?;
        writeln!(
            out,
            "Next refresh in {}s | Press Ctrl+C to exit",
            self.settings.refresh_interval.as_secs()
        )?;
        out.flush()?;
        Ok(())
    }
}
