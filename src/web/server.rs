//! Axum server lifecycle

use anyhow::{Context, Result};
use axum::http::Method;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::{
    network::MarketDataSource,
    web::{create_router, AppState},
};

/// Router plus CORS and request tracing.
pub fn build_app<S: MarketDataSource + 'static>(state: Arc<AppState<S>>) -> Router {
    create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
        .layer(TraceLayer::new_for_http())
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn start_server<S, F>(state: Arc<AppState<S>>, addr: SocketAddr, shutdown: F) -> Result<()>
where
    S: MarketDataSource + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🌐 Dashboard API listening on http://{}", addr);
    info!("📊 Endpoints: /api/data /api/slippage /api/mempool /api/health");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("✅ Dashboard API stopped gracefully");
    Ok(())
}
