//! Basis-point slippage for a notional trade against a pool's reported depth
//!
//! The provider reports, per direction, the largest input (`max_amount_in`)
//! that stays within the pool's slippage threshold. Treating the pool as
//! constant-product, that pins a virtual input reserve
//! `R = max_in * (1 - s) / s` for threshold fraction `s`. A trade of `n`
//! input units then fills at `mid * R / (R + n)`.

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use crate::{
    errors::TransformError,
    types::{DirectedQuote, DisplayPair, PoolSnapshot},
};

pub const BPS_SCALE: Decimal = dec!(10000);
pub const BPS_DISPLAY_DP: u32 = 2;
pub const PRICE_DISPLAY_DP: u32 = 8;

/// Quotes both directions for a notional denominated in token A.
pub fn to_display_pair(pool: &PoolSnapshot, notional_a: Decimal) -> DisplayPair {
    let a_to_b = quote_direction(
        pool.a_to_b.price,
        pool.a_to_b.max_amount_in,
        pool.slippage_bps,
        notional_a,
    );

    let b_to_a = notional_in_b(pool, notional_a)
        .and_then(|notional_b| {
            quote_direction(
                pool.b_to_a.price,
                pool.b_to_a.max_amount_in,
                pool.slippage_bps,
                notional_b,
            )
        });

    DisplayPair {
        a_to_b: a_to_b.unwrap_or_else(unavailable),
        b_to_a: b_to_a.unwrap_or_else(unavailable),
    }
}

/// Converts an A-denominated notional into B units using whichever price is usable.
fn notional_in_b(pool: &PoolSnapshot, notional_a: Decimal) -> Result<Decimal, TransformError> {
    if pool.a_to_b.price > Decimal::ZERO {
        notional_a
            .checked_mul(pool.a_to_b.price)
            .ok_or(TransformError::NonFinite)
    } else if pool.b_to_a.price > Decimal::ZERO {
        notional_a
            .checked_div(pool.b_to_a.price)
            .ok_or(TransformError::NonFinite)
    } else {
        Err(TransformError::ZeroPrice)
    }
}

pub fn quote_direction(
    mid_price: Decimal,
    max_amount_in: Decimal,
    threshold_bps: u32,
    notional_in: Decimal,
) -> Result<DirectedQuote, TransformError> {
    if mid_price <= Decimal::ZERO {
        return Err(TransformError::ZeroPrice);
    }
    if max_amount_in <= Decimal::ZERO {
        return Err(TransformError::ZeroLiquidity);
    }
    let threshold = Decimal::from(threshold_bps);
    if threshold <= Decimal::ZERO || threshold >= BPS_SCALE {
        return Err(TransformError::ThresholdOutOfRange);
    }

    let notional = notional_in.max(Decimal::ZERO);
    let s = threshold / BPS_SCALE;
    let reserve = max_amount_in
        .checked_mul(Decimal::ONE - s)
        .and_then(|v| v.checked_div(s))
        .ok_or(TransformError::NonFinite)?;
    let fill_ratio = reserve
        .checked_add(notional)
        .and_then(|depth| reserve.checked_div(depth))
        .ok_or(TransformError::NonFinite)?;
    let effective_price = mid_price
        .checked_mul(fill_ratio)
        .ok_or(TransformError::NonFinite)?;

    // magnitude of (effective - mid) / mid
    let slippage_bps = (mid_price - effective_price)
        .checked_div(mid_price)
        .and_then(|v| v.checked_mul(BPS_SCALE))
        .ok_or(TransformError::NonFinite)?
        .abs();

    Ok(DirectedQuote::Available {
        notional_in: notional,
        mid_price: round_price(mid_price),
        effective_price: round_price(effective_price),
        slippage_bps: slippage_bps
            .round_dp_with_strategy(BPS_DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero),
        max_amount_in,
    })
}

fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}

fn unavailable(err: TransformError) -> DirectedQuote {
    DirectedQuote::Unavailable {
        reason: err.to_string(),
    }
}
