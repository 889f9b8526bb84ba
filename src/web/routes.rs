//! API route handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::{
    config::{Config, TokenRegistry},
    network::MarketDataSource,
    service::RefreshService,
    slippage::slippage_rows,
    types::{MempoolSummary, MempoolTrade, Snapshot, SlippageRow, SnapshotState},
    web::PairFilter,
};

pub struct AppState<S> {
    pub service: Arc<RefreshService<S>>,
    pub tokens: TokenRegistry,
    pub mempool_display_limit: usize,
}

impl<S> AppState<S> {
    pub fn new(service: Arc<RefreshService<S>>, config: &Config) -> Self {
        Self {
            service,
            tokens: config.tokens.clone(),
            mempool_display_limit: config.mempool_display_limit,
        }
    }

    fn filter(&self, query: &PairQuery) -> PairFilter {
        PairFilter::new(query.token_a.as_deref(), query.token_b.as_deref(), &self.tokens)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PairQuery {
    pub token_a: Option<String>,
    pub token_b: Option<String>,
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Mempool trade as served to dashboards: token symbols instead of full descriptors.
/// Row fields keep the dashboard's snake_case keys; envelopes are camelCase.
#[derive(Debug, Serialize)]
pub struct MempoolRow {
    pub tx_hash: String,
    pub protocol: String,
    pub trade_token: String,
    pub trade_amount: Decimal,
    pub trade_amount_usd: Decimal,
    pub side_token: String,
    pub side_amount: Decimal,
    pub side_amount_usd: Decimal,
    pub gas_fee_usd: Decimal,
    pub sender: String,
    pub block_time: DateTime<Utc>,
}

impl From<&MempoolTrade> for MempoolRow {
    fn from(trade: &MempoolTrade) -> Self {
        Self {
            tx_hash: trade.tx_hash.clone(),
            protocol: trade.protocol.clone(),
            trade_token: trade.trade_token.symbol.clone(),
            trade_amount: trade.trade_amount,
            trade_amount_usd: trade.trade_amount_usd,
            side_token: trade.side_token.symbol.clone(),
            side_amount: trade.side_amount,
            side_amount_usd: trade.side_amount_usd,
            gas_fee_usd: trade.gas_fee_usd,
            sender: trade.sender.clone(),
            block_time: trade.block_time,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub success: bool,
    pub last_updated: DateTime<Utc>,
    pub latest_block: Option<u64>,
    pub slippage: Vec<SlippageRow>,
    pub mempool: Vec<MempoolRow>,
    pub summary: MempoolSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageResponse {
    pub success: bool,
    pub last_updated: DateTime<Utc>,
    pub latest_block: Option<u64>,
    pub slippage: Vec<SlippageRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MempoolResponse {
    pub success: bool,
    pub last_updated: DateTime<Utc>,
    pub mempool: Vec<MempoolRow>,
    pub summary: MempoolSummary,
}

#[derive(Debug, Serialize)]
struct PendingResponse {
    success: bool,
    status: &'static str,
}

// =============================================================================
// ROUTER
// =============================================================================

pub fn create_router<S: MarketDataSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/data", get(get_data::<S>))
        .route("/api/slippage", get(get_slippage::<S>))
        .route("/api/mempool", get(get_mempool::<S>))
        .route("/api/health", get(get_health::<S>))
        .with_state(state)
}

fn pending_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(PendingResponse {
            success: false,
            status: "pending",
        }),
    )
        .into_response()
}

async fn ready_snapshot<S: MarketDataSource>(state: &AppState<S>) -> Option<Arc<Snapshot>> {
    match state.service.current_snapshot().await {
        SnapshotState::Ready(snapshot) => Some(snapshot),
        SnapshotState::Pending => None,
    }
}

/// Matching trades, summarized over all matches and capped for display.
fn mempool_view(trades: &[&MempoolTrade], limit: usize) -> (Vec<MempoolRow>, MempoolSummary) {
    let summary = MempoolSummary::from_trades(trades.iter().copied());
    let rows = trades.iter().take(limit).map(|t| MempoolRow::from(*t)).collect();
    (rows, summary)
}

async fn get_data<S: MarketDataSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<PairQuery>,
) -> Response {
    let Some(snapshot) = ready_snapshot(&state).await else {
        return pending_response();
    };
    let filter = state.filter(&query);

    let pools = filter.pools(&snapshot.pools);
    let trades = filter.trades(&snapshot.mempool);
    let (mempool, summary) = mempool_view(&trades, state.mempool_display_limit);

    Json(DataResponse {
        success: true,
        last_updated: snapshot.last_updated,
        latest_block: snapshot.latest_block(),
        slippage: slippage_rows(&pools, &filter, true),
        mempool,
        summary,
    })
    .into_response()
}

async fn get_slippage<S: MarketDataSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<PairQuery>,
) -> Response {
    let Some(snapshot) = ready_snapshot(&state).await else {
        return pending_response();
    };
    let filter = state.filter(&query);
    let pools = filter.pools(&snapshot.pools);

    Json(SlippageResponse {
        success: true,
        last_updated: snapshot.last_updated,
        latest_block: snapshot.latest_block(),
        slippage: slippage_rows(&pools, &filter, false),
    })
    .into_response()
}

async fn get_mempool<S: MarketDataSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<PairQuery>,
) -> Response {
    let Some(snapshot) = ready_snapshot(&state).await else {
        return pending_response();
    };
    let trades = state.filter(&query).trades(&snapshot.mempool);
    let (mempool, summary) = mempool_view(&trades, state.mempool_display_limit);

    Json(MempoolResponse {
        success: true,
        last_updated: snapshot.last_updated,
        mempool,
        summary,
    })
    .into_response()
}

async fn get_health<S: MarketDataSource + 'static>(State(state): State<Arc<AppState<S>>>) -> Response {
    Json(state.service.health().await).into_response()
}
