//! Slippage quotes and dashboard rows

pub mod calculator;
pub mod rows;

pub use calculator::*;
pub use rows::*;
