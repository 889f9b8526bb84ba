//! Router configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use crate::errors::{ConfigError, ConfigResult};
use super::TokenRegistry;

// Configuration constants
pub const DEFAULT_API_URL: &str = "https://streaming.bitquery.io/graphql";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_SLIPPAGE_QUERY_LIMIT: u32 = 50;
pub const DEFAULT_MEMPOOL_QUERY_LIMIT: u32 = 20;
pub const MAX_QUERY_LIMIT: u32 = 1000;
pub const DEFAULT_MEMPOOL_DISPLAY_LIMIT: usize = 15;
pub const DEFAULT_POOL_DISPLAY_LIMIT: usize = 5;
pub const DEFAULT_TRADE_AMOUNT: Decimal = dec!(100000);
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FETCH_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_DASHBOARD_BIND: &str = "127.0.0.1:5000";

/// A token pair as configured or requested, before address resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token_a: String,
    pub token_b: String,
}

impl FromStr for TokenPair {
    type Err = ConfigError;

    /// Parses `A/B`, e.g. `WETH/USDC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: "WATCH_PAIR",
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let (a, b) = s.split_once('/').ok_or_else(|| invalid("expected A/B"))?;
        let (a, b) = (a.trim(), b.trim());
        if a.is_empty() || b.is_empty() {
            return Err(invalid("both tokens are required"));
        }
        if a.eq_ignore_ascii_case(b) {
            return Err(invalid("tokens must differ"));
        }
        Ok(Self {
            token_a: a.to_string(),
            token_b: b.to_string(),
        })
    }
}

/// Pair with both sides resolved to normalized addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPair {
    pub token_a: String,
    pub token_b: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    pub refresh_interval: Duration,
    pub slippage_query_limit: u32,
    pub mempool_query_limit: u32,
    pub mempool_display_limit: usize,
    pub pool_display_limit: usize,
    pub default_trade_amount: Decimal,
    pub watch_pair: Option<ResolvedPair>,
    pub tokens: TokenRegistry,
    pub http_timeout: Duration,
    pub fetch_max_attempts: u32,
    pub dashboard_bind: SocketAddr,
}

impl Config {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get("BITQUERY_API_URL")
            .or_else(|| get("VITE_BITQUERY_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_api_url(&api_url)?;

        let api_token = get("BITQUERY_TOKEN")
            .or_else(|| get("VITE_BITQUERY_TOKEN"))
            .ok_or(ConfigError::Missing { key: "BITQUERY_TOKEN" })?;

        let mut tokens = TokenRegistry::default();
        if let Some(extra) = get("TOKEN_ADDRESSES") {
            for entry in extra.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                let (symbol, address) = entry
                    .split_once('=')
                    .and_then(|(s, a)| super::parse_address(a).map(|a| (s.trim(), a)))
                    .filter(|(s, _)| !s.is_empty())
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: "TOKEN_ADDRESSES",
                        value: entry.to_string(),
                        reason: "expected SYMBOL=0x<40 hex chars>".to_string(),
                    })?;
                tokens.insert(symbol, &address);
            }
        }

        let watch_pair = match get("WATCH_PAIR") {
            Some(raw) => {
                let pair = TokenPair::from_str(&raw)?;
                Some(resolve_pair(&tokens, &pair)?)
            }
            None => None,
        };

        let default_trade_amount = match get("DEFAULT_TRADE_AMOUNT") {
            Some(raw) => Decimal::from_str(&raw)
                .ok()
                .filter(|d| *d > Decimal::ZERO)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "DEFAULT_TRADE_AMOUNT",
                    value: raw.clone(),
                    reason: "expected a positive number".to_string(),
                })?,
            None => DEFAULT_TRADE_AMOUNT,
        };

        let dashboard_bind = {
            let raw = get("DASHBOARD_BIND").unwrap_or_else(|| DEFAULT_DASHBOARD_BIND.to_string());
            raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "DASHBOARD_BIND",
                value: raw.clone(),
                reason: "expected host:port".to_string(),
            })?
        };

        Ok(Self {
            api_url,
            api_token,
            refresh_interval: Duration::from_secs(
                get("REFRESH_INTERVAL_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS)
                    .clamp(1, MAX_REFRESH_INTERVAL_SECS),
            ),
            slippage_query_limit: get("SLIPPAGE_QUERY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SLIPPAGE_QUERY_LIMIT)
                .clamp(1, MAX_QUERY_LIMIT),
            mempool_query_limit: get("MEMPOOL_QUERY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MEMPOOL_QUERY_LIMIT)
                .clamp(1, MAX_QUERY_LIMIT),
            mempool_display_limit: get("MEMPOOL_DISPLAY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MEMPOOL_DISPLAY_LIMIT)
                .max(1),
            pool_display_limit: get("POOL_DISPLAY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POOL_DISPLAY_LIMIT)
                .max(1),
            default_trade_amount,
            watch_pair,
            tokens,
            http_timeout: Duration::from_secs(
                get("HTTP_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
                    .max(1),
            ),
            fetch_max_attempts: get("FETCH_MAX_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FETCH_MAX_ATTEMPTS)
                .clamp(1, 10),
            dashboard_bind,
        })
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval.max(Duration::from_secs(1));
        self
    }

    /// Resolves a symbol or raw address against the token table.
    pub fn resolve_token(&self, symbol_or_address: &str) -> Option<String> {
        self.tokens.resolve(symbol_or_address)
    }
}

fn validate_api_url(url: &str) -> ConfigResult<()> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

pub fn resolve_pair(tokens: &TokenRegistry, pair: &TokenPair) -> ConfigResult<ResolvedPair> {
    let resolve = |token: &str| {
        tokens.resolve(token).ok_or_else(|| ConfigError::UnknownToken {
            token: token.to_string(),
        })
    };
    Ok(ResolvedPair {
        token_a: resolve(&pair.token_a)?,
        token_b: resolve(&pair.token_b)?,
    })
}
