//! Directional slippage quotes derived from pool records

use rust_decimal::Decimal;
use serde::Serialize;
use super::PoolSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DirectedQuote {
    Available {
        notional_in: Decimal,
        mid_price: Decimal,
        effective_price: Decimal,
        slippage_bps: Decimal,
        max_amount_in: Decimal,
    },
    Unavailable {
        reason: String,
    },
}

impl DirectedQuote {
    pub fn is_available(&self) -> bool {
        matches!(self, DirectedQuote::Available { .. })
    }

    pub fn slippage_bps(&self) -> Option<Decimal> {
        match self {
            DirectedQuote::Available { slippage_bps, .. } => Some(*slippage_bps),
            DirectedQuote::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPair {
    pub a_to_b: DirectedQuote,
    pub b_to_a: DirectedQuote,
}

/// A pool record together with its quote at the configured notional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolQuote {
    pub pool: PoolSnapshot,
    pub quote: DisplayPair,
}

/// Flattened slippage row served to dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlippageRow {
    pub bps: u32,
    pub max_amount: Decimal,
    pub price: Decimal,
    pub price_btoa: Decimal,
    pub protocol: String,
    pub pool_address: String,
    pub quote: DirectedQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_b: Option<String>,
}
