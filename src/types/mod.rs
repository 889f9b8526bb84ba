//! Core data types and structures

pub mod tokens;
pub mod pools;
pub mod mempool;
pub mod quote;
pub mod snapshot;
pub mod health;

pub use tokens::*;
pub use pools::*;
pub use mempool::*;
pub use quote::*;
pub use snapshot::*;
pub use health::*;

#[cfg(test)]
pub(crate) mod fixtures;
