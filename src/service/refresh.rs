//! Refresh service: fetch, transform, and atomically publish snapshots
//!
//! One writer (whichever caller wins the in-flight flag) replaces the
//! `Arc<Snapshot>` under a short write lock; readers clone the `Arc` and never
//! wait on the network. A failed cycle leaves the previous snapshot in place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};
use uuid::Uuid;
use crate::{
    config::Config,
    network::MarketDataSource,
    slippage::to_display_pair,
    types::{HealthStatus, PoolQuote, Snapshot, SnapshotState},
    utils::run_health_check,
};

/// Snapshots older than this many refresh intervals are reported stale.
pub const STALE_AFTER_INTERVALS: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated {
        cycle_id: Uuid,
        pools: usize,
        trades: usize,
    },
    Failed(String),
    /// Another refresh was already running; this trigger was dropped.
    Coalesced,
}

#[derive(Debug, Clone, Default)]
pub struct RefreshStats {
    pub successes: u64,
    pub failures: u64,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub last_attempt: Option<DateTime<Utc>>,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RefreshService<S> {
    source: S,
    notional: Decimal,
    stale_after: Duration,
    current: RwLock<Option<Arc<Snapshot>>>,
    stats: RwLock<RefreshStats>,
    in_flight: AtomicBool,
    started_at: Instant,
}

impl<S: MarketDataSource> RefreshService<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_settings(
            source,
            config.default_trade_amount,
            config.refresh_interval * STALE_AFTER_INTERVALS,
        )
    }

    pub fn with_settings(source: S, notional: Decimal, stale_after: Duration) -> Self {
        Self {
            source,
            notional,
            stale_after,
            current: RwLock::new(None),
            stats: RwLock::new(RefreshStats::default()),
            in_flight: AtomicBool::new(false),
            started_at: Instant::now(),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns immediately with whatever was last published.
    pub async fn current_snapshot(&self) -> SnapshotState {
        match self.current.read().await.as_ref() {
            Some(snapshot) => SnapshotState::Ready(Arc::clone(snapshot)),
            None => SnapshotState::Pending,
        }
    }

    pub async fn stats(&self) -> RefreshStats {
        self.stats.read().await.clone()
    }

    /// Runs one fetch cycle now unless one is already in flight.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Refresh already in flight, coalescing trigger");
            return RefreshOutcome::Coalesced;
        };

        let started = Instant::now();
        let attempted_at = Utc::now();
        let fetched = tokio::try_join!(self.source.fetch_pools(), self.source.fetch_mempool());

        match fetched {
            Ok((pools, mempool)) => {
                let quotes: Vec<PoolQuote> = pools
                    .into_iter()
                    .map(|pool| {
                        let quote = to_display_pair(&pool, self.notional);
                        PoolQuote { pool, quote }
                    })
                    .collect();
                let snapshot = Arc::new(Snapshot::new(quotes, mempool));
                let outcome = RefreshOutcome::Updated {
                    cycle_id: snapshot.cycle_id,
                    pools: snapshot.pools.len(),
                    trades: snapshot.mempool.len(),
                };

                *self.current.write().await = Some(Arc::clone(&snapshot));

                {
                    let mut stats = self.stats.write().await;
                    stats.successes += 1;
                    stats.consecutive_failures = 0;
                    stats.last_attempt = Some(attempted_at);
                }

                info!(
                    cycle_id = %snapshot.cycle_id,
                    pools = snapshot.pools.len(),
                    trades = snapshot.mempool.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Snapshot refreshed"
                );
                outcome
            }
            Err(e) => {
                let message = e.to_string();
                {
                    let mut stats = self.stats.write().await;
                    stats.failures += 1;
                    stats.consecutive_failures += 1;
                    stats.last_error = Some(message.clone());
                    stats.last_attempt = Some(attempted_at);
                }
                error!(
                    error = %message,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Refresh cycle failed, keeping previous snapshot"
                );
                RefreshOutcome::Failed(message)
            }
        }
    }

    pub async fn health(&self) -> HealthStatus {
        let state = self.current_snapshot().await;
        let stats = self.stats().await;
        run_health_check(
            &state,
            &stats,
            self.is_refreshing(),
            self.started_at,
            self.stale_after,
        )
    }
}

impl<S: MarketDataSource + 'static> RefreshService<S> {
    /// Drives `refresh_now` on a fixed interval until `shutdown` flips to true.
    /// The first tick fires immediately.
    pub fn spawn(self: Arc<Self>, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Refresh loop started ({}s interval)", interval.as_secs());

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = stop_requested(&mut shutdown) => break,
                }
                // an in-flight fetch is abandoned on shutdown; the guard clears the flag
                tokio::select! {
                    _ = self.refresh_now() => {}
                    _ = stop_requested(&mut shutdown) => {
                        info!("Shutdown during refresh, abandoning in-flight cycle");
                        break;
                    }
                }
            }

            info!("Refresh loop stopped");
        })
    }
}

/// Resolves once shutdown is signalled or the sender is gone.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
