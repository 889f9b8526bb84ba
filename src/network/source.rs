//! The boundary between the refresh service and wherever records come from

use async_trait::async_trait;
use crate::{
    config::{Config, ResolvedPair},
    errors::FetchResult,
    network::BitqueryClient,
    types::{MempoolTrade, PoolSnapshot},
};

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_pools(&self) -> FetchResult<Vec<PoolSnapshot>>;

    async fn fetch_mempool(&self) -> FetchResult<Vec<MempoolTrade>>;
}

/// Live Bitquery data with the configured limits and optional watch pair.
pub struct BitquerySource {
    client: BitqueryClient,
    slippage_limit: u32,
    mempool_limit: u32,
    pair: Option<ResolvedPair>,
}

impl BitquerySource {
    pub fn new(client: BitqueryClient, config: &Config) -> Self {
        Self {
            client,
            slippage_limit: config.slippage_query_limit,
            mempool_limit: config.mempool_query_limit,
            pair: config.watch_pair.clone(),
        }
    }
}

#[async_trait]
impl MarketDataSource for BitquerySource {
    async fn fetch_pools(&self) -> FetchResult<Vec<PoolSnapshot>> {
        match &self.pair {
            Some(pair) => {
                self.client
                    .fetch_slippage_for_pair(self.slippage_limit, &pair.token_a, &pair.token_b)
                    .await
            }
            None => self.client.fetch_slippage_data(self.slippage_limit).await,
        }
    }

    async fn fetch_mempool(&self) -> FetchResult<Vec<MempoolTrade>> {
        match &self.pair {
            Some(pair) => {
                self.client
                    .fetch_mempool_for_pair(self.mempool_limit, &pair.token_a, &pair.token_b)
                    .await
            }
            None => self.client.fetch_mempool_data(self.mempool_limit).await,
        }
    }
}
