//! Shared record builders for unit tests

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use async_trait::async_trait;
use super::{DirectionStats, MempoolTrade, PoolQuote, PoolSnapshot, TokenInfo};
use crate::{errors::FetchResult, network::MarketDataSource, slippage::to_display_pair};

pub fn token(symbol: &str, address: &str) -> TokenInfo {
    TokenInfo {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        address: address.to_string(),
        decimals: 18,
    }
}

pub fn weth() -> TokenInfo {
    token("WETH", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")
}

pub fn usdc() -> TokenInfo {
    token("USDC", "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
}

pub fn dai() -> TokenInfo {
    token("DAI", "0x6b175474e89094c44da98b954eedeac495271d0f")
}

/// WETH/USDC pool priced at `price` USDC per WETH.
pub fn pool(price: Decimal, slippage_bps: u32, max_in_a: Decimal, max_in_b: Decimal) -> PoolSnapshot {
    PoolSnapshot {
        block_number: 19_842_771,
        block_time: Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
        protocol: "uniswap_v3".to_string(),
        protocol_version: "3".to_string(),
        pool_address: "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640".to_string(),
        token_a: weth(),
        token_b: usdc(),
        slippage_bps,
        a_to_b: DirectionStats {
            price,
            max_amount_in: max_in_a,
            min_amount_out: Decimal::ZERO,
        },
        b_to_a: DirectionStats {
            price: if price.is_zero() { Decimal::ZERO } else { Decimal::ONE / price },
            max_amount_in: max_in_b,
            min_amount_out: Decimal::ZERO,
        },
    }
}

pub fn pool_between(token_a: TokenInfo, token_b: TokenInfo, slippage_bps: u32, block: u64) -> PoolSnapshot {
    PoolSnapshot {
        block_number: block,
        token_a,
        token_b,
        ..pool(dec!(2000), slippage_bps, dec!(10), dec!(20000))
    }
}

pub fn quoted(pool: PoolSnapshot) -> PoolQuote {
    let quote = to_display_pair(&pool, dec!(1));
    PoolQuote { pool, quote }
}

pub fn trade(hash: &str, trade_token: TokenInfo, side_token: TokenInfo, usd: Decimal, block: u64) -> MempoolTrade {
    MempoolTrade {
        tx_hash: hash.to_string(),
        block_number: block,
        block_time: Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 5).unwrap(),
        from_address: "0x28c6c06298d514db089934071355e5743bf21d60".to_string(),
        to_address: "0x7a250d5630b4cf539739df2c5dacb4c659f2488d".to_string(),
        protocol: "uniswap_v2".to_string(),
        protocol_family: "Uniswap".to_string(),
        trade_token,
        side_token,
        trade_amount: dec!(1.5),
        trade_amount_usd: usd,
        side_amount: dec!(4500),
        side_amount_usd: usd,
        price: dec!(3000),
        price_usd: dec!(3000),
        gas_fee: dec!(0.002),
        gas_fee_usd: dec!(6),
        priority_fee: Decimal::ZERO,
        priority_fee_usd: Decimal::ZERO,
        success: true,
        buyer: String::new(),
        seller: String::new(),
        sender: "0x28c6c06298d514db089934071355e5743bf21d60".to_string(),
    }
}

/// Serves the same records on every fetch.
pub struct StaticSource {
    pub pools: Vec<PoolSnapshot>,
    pub trades: Vec<MempoolTrade>,
}

#[async_trait]
impl MarketDataSource for StaticSource {
    async fn fetch_pools(&self) -> FetchResult<Vec<PoolSnapshot>> {
        Ok(self.pools.clone())
    }

    async fn fetch_mempool(&self) -> FetchResult<Vec<MempoolTrade>> {
        Ok(self.trades.clone())
    }
}
