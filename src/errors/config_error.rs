//! Startup configuration errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {key}")]
    Missing { key: &'static str },

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown token '{token}' (expected a known symbol or a 0x address)")]
    UnknownToken { token: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
