//! Degenerate numeric inputs to the slippage transform

use thiserror::Error;

/// Never propagated past the transform; rendered as an unavailable quote.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("price is zero or negative")]
    ZeroPrice,

    #[error("pool reports no tradeable liquidity")]
    ZeroLiquidity,

    #[error("slippage threshold outside (0, 10000) bps")]
    ThresholdOutOfRange,

    #[error("calculation overflowed")]
    NonFinite,
}
