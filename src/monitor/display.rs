//! Text rendering of a snapshot

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use crate::{
    config::Config,
    slippage::{slippage_rows, PoolOrder},
    types::{DirectedQuote, Snapshot},
    utils::{format_token_amount, format_usd, relative_time, truncate_address},
};

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub refresh_interval: Duration,
    pub slippage_query_limit: u32,
    pub mempool_query_limit: u32,
    pub mempool_display_limit: usize,
    pub pool_display_limit: usize,
}

impl From<&Config> for MonitorSettings {
    fn from(config: &Config) -> Self {
        Self {
            refresh_interval: config.refresh_interval,
            slippage_query_limit: config.slippage_query_limit,
            mempool_query_limit: config.mempool_query_limit,
            mempool_display_limit: config.mempool_display_limit,
            pool_display_limit: config.pool_display_limit,
        }
    }
}

pub struct Header<'a>(pub &'a MonitorSettings);

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.0;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "  Realtime Trade Router")?;
        writeln!(
            f,
            "  Refresh Interval: {}s | Mempool Limit: {} | Slippage Limit: {}",
            settings.refresh_interval.as_secs(),
            settings.mempool_query_limit,
            settings.slippage_query_limit
        )?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))
    }
}

/// Full screen for one snapshot. `now` drives the relative trade ages.
pub struct SnapshotView<'a> {
    pub snapshot: &'a Snapshot,
    pub settings: &'a MonitorSettings,
    pub now: DateTime<Utc>,
}

impl SnapshotView<'_> {
    fn write_slippage(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = slippage_rows(&self.snapshot.pools, &PoolOrder, true);
        if rows.is_empty() {
            return writeln!(f, "\nNo slippage data available");
        }

        writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "SLIPPAGE SURFACE DATA")?;
        writeln!(f, "Last updated: {}", self.snapshot.last_updated.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "Protocols: {}", self.snapshot.unique_protocols().join(", "))?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            f,
            "{:<8} {:<18} {:<16} {:<12} {:<20}",
            "BPS", "Max Size", "Price", "Impact", "Protocol"
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;

        for row in rows.iter().take(self.settings.pool_display_limit) {
            let size = format!(
                "{} {}",
                format_token_amount(row.max_amount),
                row.token_a.as_deref().unwrap_or_default()
            );
            let impact = match &row.quote {
                DirectedQuote::Available { slippage_bps, .. } => format!("{} bps", slippage_bps),
                DirectedQuote::Unavailable { .. } => "n/a".to_string(),
            };
            writeln!(
                f,
                "{:<8} {:<18} {:<16.6} {:<12} {:<20}",
                row.bps, size, row.price_btoa, impact, row.protocol
            )?;
        }
        Ok(())
    }

    fn write_mempool(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trades = &self.snapshot.mempool;
        if trades.is_empty() {
            return writeln!(f, "\nNo mempool trades available");
        }
        let summary = self.snapshot.mempool_summary();

        writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "PENDING MEMPOOL TRADES")?;
        writeln!(
            f,
            "Total: {} trades | Value: {} | DEXs: {}",
            summary.count,
            format_usd(summary.total_value_usd),
            summary.unique_protocols
        )?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        for trade in trades.iter().take(self.settings.mempool_display_limit) {
            writeln!(f, "\n{} | {}", trade.protocol, relative_time(trade.block_time, self.now))?;
            writeln!(
                f,
                "  {} {} → {} {}",
                format_token_amount(trade.trade_amount),
                trade.trade_token.symbol,
                format_token_amount(trade.side_amount),
                trade.side_token.symbol
            )?;
            writeln!(
                f,
                "  Value: {} | Gas: {}",
                format_usd(trade.trade_amount_usd),
                format_usd(trade.gas_fee_usd)
            )?;
            if !trade.sender.is_empty() {
                writeln!(f, "  From: {}", truncate_address(&trade.sender))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SnapshotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Header(self.settings))?;
        if let Some(block) = self.snapshot.latest_block() {
            writeln!(f, "\n  Latest Block: {}", group_thousands(block))?;
        }
        self.write_slippage(f)?;
        self.write_mempool(f)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
