//! Human-readable number, address and time formatting for the terminal

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fixed(amount: Decimal, dp: u32) -> String {
    let rounded = amount.round_dp(dp);
    format!("{:.*}", dp as usize, rounded)
}

pub fn format_usd(amount: Decimal) -> String {
    if amount >= dec!(1_000_000) {
        format!("${}M", fixed(amount / dec!(1_000_000), 2))
    } else if amount >= dec!(1_000) {
        format!("${}k", fixed(amount / dec!(1_000), 2))
    } else if amount >= Decimal::ONE {
        format!("${}", fixed(amount, 2))
    } else if amount >= dec!(0.01) {
        format!("${}", fixed(amount, 4))
    } else {
        format!("${}", fixed(amount, 6))
    }
}

pub fn format_token_amount(amount: Decimal) -> String {
    if amount >= dec!(1_000_000) {
        format!("{}M", fixed(amount / dec!(1_000_000), 2))
    } else if amount >= dec!(1_000) {
        format!("{}k", fixed(amount / dec!(1_000), 2))
    } else if amount >= Decimal::ONE {
        fixed(amount, 4)
    } else if amount >= dec!(0.0001) {
        fixed(amount, 6)
    } else {
        format!("{:.2e}", amount.to_f64().unwrap_or_default())
    }
}

/// `0x1234...abcd`; short strings pass through.
pub fn truncate_address(address: &str) -> String {
    if address.chars().count() <= 13 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}...{}", head, tail)
}

/// Age of `at` relative to `now`. Future timestamps read as "pending".
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();
    if seconds < 0 {
        return "pending".to_string();
    }
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    format!("{}h ago", minutes / 60)
}
