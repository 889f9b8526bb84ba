//! Terminal monitor

pub mod display;
pub mod runner;

pub use display::*;
pub use runner::*;
