//! Realtime Trade Router - DEX slippage and mempool swap monitor
//!
//! Fetches pool slippage surfaces and pending swaps from Bitquery, derives
//! directional price impact for a configured trade size, and serves the
//! result as an atomically refreshed snapshot to a JSON API and a terminal
//! monitor.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod slippage;
pub mod service;
pub mod web;
pub mod monitor;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::{ConfigError, FetchError, FetchResult, TransformError};
pub use service::{RefreshOutcome, RefreshService};
pub use types::*;
