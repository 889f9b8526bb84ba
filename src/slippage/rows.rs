//! Dashboard rows: one per distinct slippage level, oriented to the requested pair

use std::collections::HashSet;
use rust_decimal::Decimal;
use crate::types::{PoolQuote, SlippageRow};

/// Which way round the requester named the pair.
pub trait PairOrientation {
    /// True when the pool's A/B order is the reverse of the requested order.
    fn is_reversed(&self, quote: &PoolQuote) -> bool;
}

/// No pair requested: everything is read in pool order.
pub struct PoolOrder;

impl PairOrientation for PoolOrder {
    fn is_reversed(&self, _quote: &PoolQuote) -> bool {
        false
    }
}

/// Sorted by the pool's reported bps; later pools repeating a bps level are dropped.
pub fn slippage_rows(
    quotes: &[PoolQuote],
    orientation: &dyn PairOrientation,
    include_tokens: bool,
) -> Vec<SlippageRow> {
    let mut sorted: Vec<&PoolQuote> = quotes.iter().collect();
    sorted.sort_by_key(|q| q.pool.slippage_bps);

    let mut seen_bps = HashSet::new();
    let mut rows = Vec::new();

    for quote in sorted {
        let pool = &quote.pool;
        if !seen_bps.insert(pool.slippage_bps) {
            continue;
        }

        let (stats, directed) = if orientation.is_reversed(quote) {
            (&pool.b_to_a, &quote.quote.b_to_a)
        } else {
            (&pool.a_to_b, &quote.quote.a_to_b)
        };

        rows.push(SlippageRow {
            bps: pool.slippage_bps,
            max_amount: stats.max_amount_in,
            price: stats.price.max(Decimal::ZERO),
            price_btoa: pool.b_to_a.price,
            protocol: pool.protocol_label(),
            pool_address: pool.pool_address.clone(),
            quote: directed.clone(),
            token_a: include_tokens.then(|| pool.token_a.symbol.clone()),
            token_b: include_tokens.then(|| pool.token_b.symbol.clone()),
        });
    }

    rows
}
