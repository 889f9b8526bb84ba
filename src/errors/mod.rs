//! Error taxonomy for configuration, fetching, and transforms

pub mod config_error;
pub mod fetch_error;
pub mod transform_error;

pub use config_error::*;
pub use fetch_error::*;
pub use transform_error::*;
