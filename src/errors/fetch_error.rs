//! Errors raised while talking to the remote data provider

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {message} (after {attempts} attempt(s))")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
        attempts: u32,
    },

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    #[error("Response is missing '{path}'")]
    MissingField { path: String },

    #[error("Failed to decode response: {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn network(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source),
            attempts: 1,
        }
    }

    /// Network failures, 429 and 5xx answers are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network { .. } => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    pub(crate) fn with_attempts(self, attempts: u32) -> Self {
        match self {
            FetchError::Network {
                message, source, ..
            } => FetchError::Network {
                message,
                source,
                attempts,
            },
            other => other,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
