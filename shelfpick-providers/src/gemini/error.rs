//! Analysis errors.

use shelfpick_fetch::FetchError;
use thiserror::Error;

/// The message shown for any analysis failure.
pub const USER_MESSAGE: &str = "Analysis failed, please try again later.";

/// Errors from the analysis call.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key configured.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Non-success status.
    #[error("Analysis endpoint returned HTTP {status}: {message}")]
    Status {
        /// HTTP status.
        status: u16,
        /// Error message from the body, if any.
        message: String,
    },

    /// The reply did not contain a report.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AnalysisError {
    /// The single message surfaced to users.
    pub fn user_message(&self) -> &'static str {
        USER_MESSAGE
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::HttpError(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            AnalysisError::HttpError(format!("Connection failed: {err}"))
        } else {
            AnalysisError::HttpError(err.to_string())
        }
    }
}

impl From<FetchError> for AnalysisError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Http(e) => e.into(),
            other => AnalysisError::HttpError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::InvalidResponse(format!("JSON error: {err}"))
    }
}
