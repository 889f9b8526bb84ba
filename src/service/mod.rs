//! Timed refresh of the shared snapshot

pub mod refresh;

pub use refresh::*;
