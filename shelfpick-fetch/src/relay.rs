//! Relay-routed JSON fetching.
//!
//! Catalog APIs are called through public relay proxies. The gateway walks
//! the configured relays in order, trying each one a fixed number of times
//! with a fixed pause after every failed attempt. A response counts only
//! when the transport succeeds, the status is 2xx and the body is JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::FetchError;
use crate::http::{redact, HttpClient};

/// Placeholder a relay template may use for the encoded target URL.
const URL_PLACEHOLDER: &str = "{url}";

// ============================================================================
// Relay
// ============================================================================

/// One relay the gateway can route through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Relay {
    /// Request the target as-is.
    Direct,
    /// Wrap the percent-encoded target into a template.
    ///
    /// The target replaces `{url}` when present, otherwise it is appended.
    Prefix {
        /// Relay URL template, e.g. `https://corsproxy.io/?url=`.
        template: String,
    },
}

impl Relay {
    /// Creates a prefix relay.
    pub fn prefix(template: impl Into<String>) -> Self {
        Self::Prefix {
            template: template.into(),
        }
    }

    /// The relays used when nothing is configured.
    pub fn defaults() -> Vec<Relay> {
        vec![
            Self::prefix("https://corsproxy.io/?url="),
            Self::prefix("https://api.allorigins.win/raw?url="),
        ]
    }

    /// Builds the URL to request for `target`.
    pub fn wrap(&self, target: &str) -> String {
        match self {
            Self::Direct => target.to_string(),
            Self::Prefix { template } => {
                let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
                if template.contains(URL_PLACEHOLDER) {
                    template.replace(URL_PLACEHOLDER, &encoded)
                } else {
                    format!("{template}{encoded}")
                }
            }
        }
    }
}

impl fmt::Display for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Prefix { template } => f.write_str(template),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Gateway settings.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Relays, tried in order.
    pub relays: Vec<Relay>,
    /// Attempts per relay.
    pub max_attempts: u32,
    /// Pause after each failed attempt.
    pub retry_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            relays: Relay::defaults(),
            max_attempts: 2,
            retry_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RelaySettings {
    /// Settings that skip relays entirely.
    pub fn direct() -> Self {
        Self {
            relays: vec![Relay::Direct],
            ..Default::default()
        }
    }

    /// Replaces the relay list.
    #[must_use]
    pub fn with_relays(mut self, relays: Vec<Relay>) -> Self {
        self.relays = relays;
        self
    }

    /// Replaces the retry pause.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Total attempts across all relays.
    pub fn total_attempts(&self) -> usize {
        self.relays.len() * self.max_attempts.max(1) as usize
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Source of parsed JSON bodies for a target URL.
///
/// Catalog clients depend on this rather than on the gateway so they can be
/// exercised against canned responses.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// Fetches `target` and parses the body as JSON.
    async fn fetch_json(&self, target: &str) -> Result<Value, FetchError>;
}

// ============================================================================
// Gateway
// ============================================================================

/// Fetches JSON through the configured relays.
#[derive(Debug, Clone)]
pub struct RelayGateway {
    http: HttpClient,
    settings: RelaySettings,
}

impl RelayGateway {
    /// Creates a gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: RelaySettings) -> Result<Self, FetchError> {
        let http = HttpClient::with_timeout(settings.timeout)?;
        Ok(Self { http, settings })
    }

    /// Returns the gateway settings.
    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// One attempt against one relay-wrapped URL.
    async fn attempt(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.http.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: redact(url),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl JsonTransport for RelayGateway {
    #[instrument(skip(self, target), fields(target = %redact(target)))]
    async fn fetch_json(&self, target: &str) -> Result<Value, FetchError> {
        let max_attempts = self.settings.max_attempts.max(1);
        let total = self.settings.total_attempts();
        let mut made = 0;
        let mut last_error = None;

        for relay in &self.settings.relays {
            let url = relay.wrap(target);

            for attempt in 1..=max_attempts {
                made += 1;
                debug!(relay = %relay, attempt, "Relay attempt");

                match self.attempt(&url).await {
                    Ok(body) => {
                        info!(relay = %relay, attempt, "Relay succeeded");
                        return Ok(body);
                    }
                    Err(e) => {
                        warn!(relay = %relay, attempt, error = %e, "Relay attempt failed");
                        last_error = Some(e);
                    }
                }

                if made < total {
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::AllRelaysFailed))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_wrap_is_identity() {
        let target = "https://example.com/api?a=1&b=2";
        assert_eq!(Relay::Direct.wrap(target), target);
    }

    #[test]
    fn test_prefix_wrap_appends_encoded_target() {
        let relay = Relay::prefix("https://corsproxy.io/?url=");
        assert_eq!(
            relay.wrap("https://example.com/api?a=1&b=2"),
            "https://corsproxy.io/?url=https%3A%2F%2Fexample.com%2Fapi%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn test_prefix_wrap_fills_placeholder() {
        let relay = Relay::prefix("https://relay.test/get?target={url}&raw=1");
        assert_eq!(
            relay.wrap("https://x.test/?q=a"),
            "https://relay.test/get?target=https%3A%2F%2Fx.test%2F%3Fq%3Da&raw=1"
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = RelaySettings::default();
        assert_eq!(settings.relays.len(), 2);
        assert_eq!(settings.max_attempts, 2);
        assert_eq!(settings.retry_delay, Duration::from_secs(1));
        assert_eq!(settings.total_attempts(), 4);
    }

    #[test]
    fn test_relay_serde() {
        let json = serde_json::to_string(&Relay::prefix("https://r.test/?u=")).unwrap();
        assert_eq!(json, r#"{"kind":"prefix","template":"https://r.test/?u="}"#);
        let direct: Relay = serde_json::from_str(r#"{"kind":"direct"}"#).unwrap();
        assert_eq!(direct, Relay::Direct);
    }

    #[tokio::test]
    async fn test_no_relays_fails_without_error_captured() {
        let settings = RelaySettings::default().with_relays(Vec::new());
        let gateway = RelayGateway::new(settings).unwrap();
        let err = gateway.fetch_json("https://example.com").await.unwrap_err();
        assert!(matches!(err, FetchError::AllRelaysFailed));
    }
}
