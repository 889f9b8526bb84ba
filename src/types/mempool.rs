//! Pending mempool swap records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;
use super::TokenInfo;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MempoolTrade {
    pub tx_hash: String,
    pub block_number: u64,
    pub block_time: DateTime<Utc>,
    pub from_address: String,
    pub to_address: String,
    pub protocol: String,
    pub protocol_family: String,
    pub trade_token: TokenInfo,
    pub side_token: TokenInfo,
    pub trade_amount: Decimal,
    pub trade_amount_usd: Decimal,
    pub side_amount: Decimal,
    pub side_amount_usd: Decimal,
    pub price: Decimal,
    pub price_usd: Decimal,
    pub gas_fee: Decimal,
    pub gas_fee_usd: Decimal,
    pub priority_fee: Decimal,
    pub priority_fee_usd: Decimal,
    pub success: bool,
    pub buyer: String,
    pub seller: String,
    pub sender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MempoolSummary {
    pub count: usize,
    pub total_value_usd: Decimal,
    pub unique_protocols: usize,
}

impl MempoolSummary {
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a MempoolTrade>,
    {
        let mut count = 0;
        let mut total_value_usd = Decimal::ZERO;
        let mut saturated = false;
        let mut protocols = HashSet::new();
        for trade in trades {
            count += 1;
            total_value_usd = match total_value_usd.checked_add(trade.trade_amount_usd) {
                Some(sum) => sum,
                None => {
                    saturated = true;
                    if trade.trade_amount_usd.is_sign_negative() { Decimal::MIN } else { Decimal::MAX }
                }
            };
            protocols.insert(trade.protocol.as_str());
        }
        if saturated {
            warn!(count, "Mempool USD total overflowed, reporting the saturated value");
        }
        Self {
            count,
            total_value_usd,
            unique_protocols: protocols.len(),
        }
    }
}
