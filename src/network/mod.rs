//! Data provider client and the source seam used by the refresh service

pub mod client;
pub mod parse;
pub mod queries;
pub mod retry;
pub mod source;

pub use client::*;
pub use retry::*;
pub use source::*;
