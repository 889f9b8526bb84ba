//! The atomically replaced bundle served to every consumer

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;
use super::{MempoolSummary, MempoolTrade, PoolQuote};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cycle_id: Uuid,
    pub pools: Vec<PoolQuote>,
    pub mempool: Vec<MempoolTrade>,
    pub last_updated: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(pools: Vec<PoolQuote>, mempool: Vec<MempoolTrade>) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            pools,
            mempool,
            last_updated: Utc::now(),
        }
    }

    pub fn latest_block(&self) -> Option<u64> {
        self.pools.iter().map(|p| p.pool.block_number).max()
    }

    pub fn unique_protocols(&self) -> Vec<String> {
        let mut protocols: Vec<String> = self
            .pools
            .iter()
            .map(|p| p.pool.protocol_label())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        protocols.sort();
        protocols
    }

    pub fn mempool_summary(&self) -> MempoolSummary {
        MempoolSummary::from_trades(&self.mempool)
    }
}

/// What a reader gets: the current snapshot, or nothing before the first good refresh.
#[derive(Debug, Clone)]
pub enum SnapshotState {
    Ready(Arc<Snapshot>),
    Pending,
}

impl SnapshotState {
    pub fn ready(&self) -> Option<&Arc<Snapshot>> {
        match self {
            SnapshotState::Ready(snapshot) => Some(snapshot),
            SnapshotState::Pending => None,
        }
    }
}
