//! Turns the provider's JSON records into typed pool and mempool records
//!
//! The envelope is strict: a missing `EVM.<field>` array fails the fetch.
//! Individual records are lenient the way the provider is: numbers may arrive
//! as JSON numbers or numeric strings, and absent values default to zero.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;
use crate::{
    errors::{FetchError, FetchResult},
    types::{DirectionStats, MempoolTrade, PoolSnapshot, TokenInfo, DEFAULT_TOKEN_DECIMALS},
};

/// Returns `data.EVM.<field>` as an array.
pub fn records<'a>(data: &'a Value, field: &str) -> FetchResult<&'a [Value]> {
    data.get("EVM")
        .and_then(|evm| evm.get(field))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| FetchError::MissingField {
            path: format!("data.EVM.{}", field),
        })
}

pub fn parse_pool_records(raw: &[Value], fetched_at: DateTime<Utc>) -> Vec<PoolSnapshot> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, item)| match parse_pool_record(item, fetched_at) {
            Some(record) => Some(record),
            None => {
                warn!(index, "Skipping malformed pool slippage record");
                None
            }
        })
        .collect()
}

pub fn parse_mempool_records(raw: &[Value], fetched_at: DateTime<Utc>) -> Vec<MempoolTrade> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, item)| match parse_mempool_record(item, fetched_at) {
            Some(record) => Some(record),
            None => {
                warn!(index, "Skipping malformed mempool trade record");
                None
            }
        })
        .collect()
}

fn parse_pool_record(item: &Value, fetched_at: DateTime<Utc>) -> Option<PoolSnapshot> {
    let item = item.as_object()?;
    let block = item.get("Block").unwrap_or(&Value::Null);
    let price = item.get("Price")?;
    let pool = price.get("Pool").filter(|p| p.is_object())?;
    let dex = price.get("Dex").unwrap_or(&Value::Null);

    Some(PoolSnapshot {
        block_number: uint(&block["Number"]),
        block_time: timestamp(&block["Time"]).unwrap_or(fetched_at),
        protocol: text_or(&dex["ProtocolName"], "Unknown"),
        protocol_version: text(&dex["ProtocolVersion"]),
        pool_address: text(&pool["SmartContract"]),
        token_a: token(&pool["CurrencyA"]),
        token_b: token(&pool["CurrencyB"]),
        slippage_bps: u32::try_from(uint(&price["SlippageBasisPoints"])).unwrap_or(u32::MAX),
        a_to_b: direction(&price["AtoB"]),
        b_to_a: direction(&price["BtoA"]),
    })
}

fn parse_mempool_record(item: &Value, fetched_at: DateTime<Utc>) -> Option<MempoolTrade> {
    let item = item.as_object()?;
    let block = item.get("Block").unwrap_or(&Value::Null);
    let trade = item.get("Trade").filter(|t| t.is_object())?;
    let tx = item.get("Transaction").unwrap_or(&Value::Null);
    let fee = item.get("Fee").unwrap_or(&Value::Null);
    let side = &trade["Side"];
    let dex = &trade["Dex"];

    let success = item
        .get("TransactionStatus")
        .and_then(|s| s["Success"].as_bool())
        .or_else(|| trade["Success"].as_bool())
        .unwrap_or(true);

    Some(MempoolTrade {
        tx_hash: text(&tx["Hash"]),
        block_number: uint(&block["Number"]),
        block_time: timestamp(&block["Time"]).unwrap_or(fetched_at),
        from_address: text(&tx["From"]),
        to_address: text(&tx["To"]),
        protocol: text_or(&dex["ProtocolName"], "Unknown"),
        protocol_family: text_or(&dex["ProtocolFamily"], "Unknown"),
        trade_token: token(&trade["Currency"]),
        side_token: token(&side["Currency"]),
        trade_amount: decimal(&trade["Amount"]),
        trade_amount_usd: decimal(&trade["AmountInUSD"]),
        side_amount: decimal(&side["Amount"]),
        side_amount_usd: decimal(&side["AmountInUSD"]),
        price: decimal(&trade["Price"]),
        price_usd: decimal(&trade["PriceInUSD"]),
        gas_fee: decimal(&fee["SenderFee"]),
        gas_fee_usd: decimal(&fee["SenderFeeInUSD"]),
        priority_fee: decimal(&fee["PriorityFeePerGas"]),
        priority_fee_usd: decimal(&fee["PriorityFeePerGasInUSD"]),
        success,
        buyer: text(&trade["Buyer"]),
        seller: text(&trade["Seller"]),
        sender: text(&trade["Sender"]),
    })
}

fn token(value: &Value) -> TokenInfo {
    TokenInfo {
        symbol: text(&value["Symbol"]),
        name: text(&value["Name"]),
        address: text(&value["SmartContract"]),
        decimals: match &value["Decimals"] {
            Value::Null => DEFAULT_TOKEN_DECIMALS,
            other => u32::try_from(uint(other)).unwrap_or(DEFAULT_TOKEN_DECIMALS),
        },
    }
}

fn direction(value: &Value) -> DirectionStats {
    DirectionStats {
        price: decimal(&value["Price"]),
        max_amount_in: decimal(&value["MaxAmountIn"]),
        min_amount_out: decimal(&value["MinAmountOut"]),
    }
}

fn text(value: &Value) -> String {
    text_or(value, "")
}

fn text_or(value: &Value, default: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Numbers, numeric strings, and scientific notation; anything else is zero.
pub fn decimal(value: &Value) -> Decimal {
    let parse = |s: &str| {
        let s = s.trim();
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok()
    };
    match value {
        Value::String(s) => parse(s),
        Value::Number(n) => parse(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        _ => None,
    }
    .unwrap_or(Decimal::ZERO)
}

fn uint(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 30).unwrap()
    }

    fn pool_json() -> Value {
        json!({
            "Block": { "Time": "2024-05-10T12:00:00Z", "Number": "19842771" },
            "Price": {
                "AtoB": { "Price": 3012.5, "MinAmountOut": "2990.1", "MaxAmountIn": "12.5" },
                "BtoA": { "Price": "0.000331950", "MinAmountOut": 0.0033, "MaxAmountIn": 37500 },
                "Pool": {
                    "SmartContract": "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640",
                    "CurrencyA": { "Symbol": "WETH", "Name": "Wrapped Ether",
                                   "SmartContract": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "Decimals": 18 },
                    "CurrencyB": { "Symbol": "USDC", "Name": "USD Coin",
                                   "SmartContract": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "Decimals": 6 }
                },
                "Dex": { "ProtocolName": "uniswap_v3", "ProtocolVersion": "3" },
                "SlippageBasisPoints": 10
            }
        })
    }

    #[test]
    fn parses_pool_record() {
        let data = json!({ "EVM": { "DEXPoolSlippages": [pool_json()] } });
        let raw = records(&data, "DEXPoolSlippages").unwrap();
        let pools = parse_pool_records(raw, fetched_at());

        assert_eq!(pools.len(), 1);
        let pool = &pools[0];
        assert_eq!(pool.block_number, 19_842_771);
        assert_eq!(pool.block_time, Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap());
        assert_eq!(pool.protocol_label(), "uniswap_v3 v3");
        assert_eq!(pool.token_a.symbol, "WETH");
        assert_eq!(pool.token_b.decimals, 6);
        assert_eq!(pool.slippage_bps, 10);
        assert_eq!(pool.a_to_b.price, dec!(3012.5));
        assert_eq!(pool.a_to_b.max_amount_in, dec!(12.5));
        assert_eq!(pool.b_to_a.price, dec!(0.000331950));
        assert_eq!(pool.b_to_a.max_amount_in, dec!(37500));
    }

    #[test]
    fn missing_envelope_is_an_error() {
        let data = json!({ "EVM": {} });
        let err = records(&data, "DEXPoolSlippages").unwrap_err();
        assert!(matches!(err, FetchError::MissingField { ref path } if path == "data.EVM.DEXPoolSlippages"));

        let data = json!({ "EVM": { "DEXPoolSlippages": null } });
        assert!(records(&data, "DEXPoolSlippages").is_err());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let raw = vec![json!("not an object"), json!({ "Price": {} }), pool_json()];
        let pools = parse_pool_records(&raw, fetched_at());
        assert_eq!(pools.len(), 1);
    }

    #[test]
    fn absent_values_fall_back_to_defaults() {
        let raw = vec![json!({ "Price": { "Pool": {} } })];
        let pools = parse_pool_records(&raw, fetched_at());
        let pool = &pools[0];
        assert_eq!(pool.block_time, fetched_at());
        assert_eq!(pool.protocol, "Unknown");
        assert_eq!(pool.slippage_bps, 0);
        assert_eq!(pool.a_to_b.price, Decimal::ZERO);
        assert_eq!(pool.token_a.decimals, DEFAULT_TOKEN_DECIMALS);
    }

    #[test]
    fn parses_mempool_record() {
        let raw = vec![json!({
            "Block": { "Time": "2024-05-10T12:00:05Z", "Number": 19842772 },
            "TransactionStatus": { "Success": false },
            "Fee": { "SenderFee": "0.0021", "SenderFeeInUSD": "6.3",
                     "PriorityFeePerGas": "1.5e-9", "PriorityFeePerGasInUSD": null },
            "Trade": {
                "Amount": "1.25", "AmountInUSD": "3765.6", "Price": 3012.48, "PriceInUSD": 3012.48,
                "Buyer": "0xbuyer", "Seller": "0xseller", "Sender": "0x1111111254eeb25477b68fb85ed929f73a960582",
                "Dex": { "ProtocolName": "uniswap_v2", "ProtocolFamily": "Uniswap" },
                "Currency": { "Symbol": "WETH", "Name": "Wrapped Ether",
                              "SmartContract": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2" },
                "Side": { "Amount": "3765.6", "AmountInUSD": "3765.6", "Type": "sell",
                          "Currency": { "Symbol": "USDC", "Name": "USD Coin",
                                        "SmartContract": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48" } }
            },
            "Transaction": { "Hash": "0xabc", "From": "0xfrom", "To": "0xto" }
        })];

        let trades = parse_mempool_records(&raw, fetched_at());
        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.tx_hash, "0xabc");
        assert_eq!(trade.block_number, 19_842_772);
        assert_eq!(trade.protocol_family, "Uniswap");
        assert_eq!(trade.trade_token.symbol, "WETH");
        assert_eq!(trade.side_token.symbol, "USDC");
        assert_eq!(trade.trade_amount, dec!(1.25));
        assert_eq!(trade.gas_fee_usd, dec!(6.3));
        assert_eq!(trade.priority_fee, dec!(0.0000000015));
        assert_eq!(trade.priority_fee_usd, Decimal::ZERO);
        assert!(!trade.success);
    }

    #[test]
    fn mempool_record_without_trade_is_skipped() {
        let raw = vec![json!({ "Transaction": { "Hash": "0xabc" } })];
        assert!(parse_mempool_records(&raw, fetched_at()).is_empty());
    }

    #[test]
    fn decimal_parsing_is_lenient() {
        assert_eq!(decimal(&json!("42.5")), dec!(42.5));
        assert_eq!(decimal(&json!(7)), dec!(7));
        assert_eq!(decimal(&json!("1e3")), dec!(1000));
        assert_eq!(decimal(&json!("abc")), Decimal::ZERO);
        assert_eq!(decimal(&Value::Null), Decimal::ZERO);
    }
}
