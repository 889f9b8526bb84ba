//! Pool slippage records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use super::TokenInfo;

/// One direction of a pool's reported slippage surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionStats {
    pub price: Decimal,
    pub max_amount_in: Decimal,
    pub min_amount_out: Decimal,
}

/// A single `DEXPoolSlippages` record. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSnapshot {
    pub block_number: u64,
    pub block_time: DateTime<Utc>,
    pub protocol: String,
    pub protocol_version: String,
    pub pool_address: String,
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    /// Threshold the provider computed `max_amount_in` against.
    pub slippage_bps: u32,
    pub a_to_b: DirectionStats,
    pub b_to_a: DirectionStats,
}

impl PoolSnapshot {
    pub fn protocol_label(&self) -> String {
        if self.protocol_version.is_empty() {
            self.protocol.clone()
        } else {
            format!("{} v{}", self.protocol, self.protocol_version)
        }
    }
}
