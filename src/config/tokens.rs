//! Supported token symbols and address normalization

use std::collections::HashMap;
use lazy_static::lazy_static;

lazy_static! {
    /// Ethereum mainnet addresses. ETH resolves to WETH since pools hold the wrapped token.
    pub static ref DEFAULT_TOKEN_ADDRESSES: HashMap<&'static str, &'static str> = HashMap::from([
        ("USDC", "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
        ("USDT", "0xdac17f958d2ee523a2206206994597c13d831ec7"),
        ("DAI", "0x6b175474e89094c44da98b954eedeac495271d0f"),
        ("WETH", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
        ("ETH", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
        ("WBTC", "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599"),
    ]);
}

/// Lowercases and adds the `0x` prefix.
pub fn normalize_address(address: &str) -> String {
    let s = address.trim().to_lowercase();
    if s.starts_with("0x") { s } else { format!("0x{}", s) }
}

/// Returns the normalized address if `value` already is one (with or without `0x`).
pub fn parse_address(value: &str) -> Option<String> {
    let s = value.trim();
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("0x{}", hex.to_lowercase()))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRegistry {
    addresses: HashMap<String, String>,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self {
            addresses: DEFAULT_TOKEN_ADDRESSES
                .iter()
                .map(|(symbol, address)| (symbol.to_string(), address.to_string()))
                .collect(),
        }
    }
}

impl TokenRegistry {
    pub fn insert(&mut self, symbol: &str, address: &str) {
        self.addresses
            .insert(symbol.trim().to_uppercase(), normalize_address(address));
    }

    /// Resolves a symbol or raw address to a normalized address, or `None` if unknown.
    pub fn resolve(&self, symbol_or_address: &str) -> Option<String> {
        let s = symbol_or_address.trim();
        if s.is_empty() {
            return None;
        }
        parse_address(s).or_else(|| self.addresses.get(&s.to_uppercase()).cloned())
    }
}
