//! Utility functions and helpers

pub mod format;
pub mod logging;
pub mod health;

pub use format::*;
pub use logging::*;
pub use health::*;
