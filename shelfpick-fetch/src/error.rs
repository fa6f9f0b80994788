//! Fetch error types.

use thiserror::Error;

/// Error type for outbound requests.
///
/// Every variant is a network-class failure from the caller's point of
/// view; the gateway surfaces the last one it saw.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (DNS, TLS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// URL that was requested (relay-wrapped).
        url: String,
    },

    /// Body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No relay produced a response and no error was captured.
    #[error("All relays failed")]
    AllRelaysFailed,
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}
