//! Error types for the VaultChat core

use thiserror::Error;

/// Failure of a single askChatbot round trip.
///
/// All variants collapse into the same fallback bubble once they reach the
/// conversation; the distinction only exists for logging and tests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connect, send, or body read failed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Body missing or not a chatbot response
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Server answered with a non-success status
    #[error("remote error: {0}")]
    Remote(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "network",
            ApiError::InvalidResponse(_) => "invalid_response",
            ApiError::Remote(_) => "remote",
        }
    }
}

/// Configuration that cannot be used to talk to the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("The API key is missing. Please enter a valid API key to continue.")]
    MissingApiKey,
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
