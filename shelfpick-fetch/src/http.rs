//! HTTP client with tracing.
//!
//! Thin wrapper over [`reqwest::Client`] that fixes the timeout and user
//! agent and records every request.

use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::FetchError;

/// User agent string for Shelfpick.
const USER_AGENT: &str = concat!("Shelfpick/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner: client })
    }

    /// Performs a GET request.
    #[instrument(skip(self), fields(url = %redact(url)))]
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!("GET request");

        let response = self.inner.get(url).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a POST request with a JSON body and extra headers.
    ///
    /// Header values are never logged.
    #[instrument(skip(self, headers, body), fields(url = %redact(url)))]
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &T,
    ) -> Result<Response, FetchError> {
        debug!(headers = headers.len(), "POST request with JSON");

        let mut request = self.inner.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

// ============================================================================
// Redaction
// ============================================================================

/// Query parameters that carry credentials.
const SECRET_PARAMS: &[&str] = &["ttbkey", "authkey", "key"];

/// Replaces credential query values with `***` for logging.
///
/// Relay-wrapped URLs carry the target percent-encoded in one parameter;
/// that parameter is redacted recursively.
pub fn redact(url: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(url) else {
        return url.to_string();
    };
    if parsed.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let value = if SECRET_PARAMS.iter().any(|s| k.eq_ignore_ascii_case(s)) {
                "***".to_string()
            } else if v.starts_with("http://") || v.starts_with("https://") {
                redact(&v)
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

// ============================================================================
// Tests
// ============================================================================
