//! Error types for the Harness API layer

use thiserror::Error;

/// Errors surfaced by request construction and the HTTP exchange.
///
/// Business-level results (duplicate names, remote failures) are not errors;
/// they are decoded into [`Outcome`](super::response::Outcome) variants.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("failed to create HTTP client")]
    ClientInit(#[source] reqwest::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    #[error("response from {url} is not valid JSON")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// True for failures where no usable response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}
