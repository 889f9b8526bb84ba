//! Configuration management for the trade router

pub mod settings;
pub mod tokens;

pub use settings::*;
pub use tokens::*;
