//! `token_a` / `token_b` query filtering

use crate::{
    config::TokenRegistry,
    slippage::PairOrientation,
    types::{MempoolTrade, PoolQuote, TokenInfo},
};

/// One requested side: what the caller typed plus its registry address, if any.
#[derive(Debug, Clone, PartialEq)]
struct TokenNeedle {
    raw: String,
    address: Option<String>,
}

impl TokenNeedle {
    fn parse(value: Option<&str>, tokens: &TokenRegistry) -> Option<Self> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
        Some(Self {
            raw: raw.to_string(),
            address: tokens.resolve(raw),
        })
    }

    fn matches(&self, token: &TokenInfo) -> bool {
        token.matches(&self.raw, self.address.as_deref())
    }
}

/// Symbol-or-address pair filter. Records match with the pair in either order;
/// an absent side matches anything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairFilter {
    token_a: Option<TokenNeedle>,
    token_b: Option<TokenNeedle>,
}

impl PairFilter {
    pub fn new(token_a: Option<&str>, token_b: Option<&str>, tokens: &TokenRegistry) -> Self {
        Self {
            token_a: TokenNeedle::parse(token_a, tokens),
            token_b: TokenNeedle::parse(token_b, tokens),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token_a.is_none() && self.token_b.is_none()
    }

    fn in_order(&self, first: &TokenInfo, second: &TokenInfo) -> bool {
        self.token_a.as_ref().is_none_or(|n| n.matches(first))
            && self.token_b.as_ref().is_none_or(|n| n.matches(second))
    }

    fn either_order(&self, x: &TokenInfo, y: &TokenInfo) -> bool {
        self.in_order(x, y) || self.in_order(y, x)
    }

    pub fn matches_pool(&self, quote: &PoolQuote) -> bool {
        self.either_order(&quote.pool.token_a, &quote.pool.token_b)
    }

    pub fn matches_trade(&self, trade: &MempoolTrade) -> bool {
        self.either_order(&trade.trade_token, &trade.side_token)
    }

    pub fn pools(&self, quotes: &[PoolQuote]) -> Vec<PoolQuote> {
        quotes
            .iter()
            .filter(|q| self.matches_pool(q))
            .cloned()
            .collect()
    }

    pub fn trades<'a>(&self, trades: &'a [MempoolTrade]) -> Vec<&'a MempoolTrade> {
        trades.iter().filter(|t| self.matches_trade(t)).collect()
    }
}

impl PairOrientation for PairFilter {
    /// Reversed when both sides were requested and the pool only matches
    /// with its sides swapped.
    fn is_reversed(&self, quote: &PoolQuote) -> bool {
        if self.token_a.is_none() || self.token_b.is_none() {
            return false;
        }
        let pool = &quote.pool;
        !self.in_order(&pool.token_a, &pool.token_b) && self.in_order(&pool.token_b, &pool.token_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use crate::types::fixtures::{dai, pool_between, quoted, trade, usdc, weth};

    fn filter(a: Option<&str>, b: Option<&str>) -> PairFilter {
        PairFilter::new(a, b, &TokenRegistry::default())
    }

    #[test]
    fn pair_matches_in_either_order() {
        let weth_usdc = quoted(pool_between(weth(), usdc(), 10, 1));
        let usdc_dai = quoted(pool_between(usdc(), dai(), 10, 1));

        let f = filter(Some("USDC"), Some("WETH"));
        assert!(f.matches_pool(&weth_usdc));
        assert!(!f.matches_pool(&usdc_dai));
        assert!(f.is_reversed(&weth_usdc));

        let f = filter(Some("weth"), Some("usdc"));
        assert!(f.matches_pool(&weth_usdc));
        assert!(!f.is_reversed(&weth_usdc));
    }

    #[test]
    fn addresses_and_symbols_are_interchangeable() {
        let weth_usdc = quoted(pool_between(weth(), usdc(), 10, 1));
        let f = filter(
            Some("0xA0b86991c6218b36c1d19d4a2e9eB0cE3606eB48"),
            Some("WETH"),
        );
        assert!(f.matches_pool(&weth_usdc));

        // ETH aliases the WETH address in the registry
        let f = filter(Some("ETH"), Some("USDC"));
        assert!(f.matches_pool(&weth_usdc));
    }

    #[test]
    fn single_side_matches_either_position() {
        let f = filter(Some("USDC"), None);
        assert!(f.matches_pool(&quoted(pool_between(weth(), usdc(), 10, 1))));
        assert!(f.matches_pool(&quoted(pool_between(usdc(), dai(), 10, 1))));
        assert!(!f.matches_pool(&quoted(pool_between(weth(), dai(), 10, 1))));
    }

    #[test]
    fn single_side_never_reorients() {
        let weth_usdc = quoted(pool_between(weth(), usdc(), 10, 1));
        assert!(!filter(Some("USDC"), None).is_reversed(&weth_usdc));
        assert!(!filter(None, Some("WETH")).is_reversed(&weth_usdc));
        assert!(filter(Some("USDC"), Some("WETH")).is_reversed(&weth_usdc));
    }

    #[test]
    fn blank_params_mean_no_filter() {
        let f = filter(Some("  "), None);
        assert!(f.is_empty());
        assert!(f.matches_pool(&quoted(pool_between(weth(), dai(), 10, 1))));
    }

    #[test]
    fn trades_filter_on_both_tokens() {
        let trades = vec![
            trade("0x1", weth(), usdc(), dec!(100), 1),
            trade("0x2", dai(), usdc(), dec!(100), 1),
            trade("0x3", usdc(), weth(), dec!(100), 1),
        ];
        let matched = filter(Some("WETH"), Some("USDC")).trades(&trades);
        let hashes: Vec<&str> = matched.iter().map(|t| t.tx_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0x1", "0x3"]);
    }

    #[test]
    fn unknown_pair_matches_nothing() {
        let f = filter(Some("PEPE"), Some("WETH"));
        assert!(!f.matches_pool(&quoted(pool_between(weth(), usdc(), 10, 1))));
    }
}
