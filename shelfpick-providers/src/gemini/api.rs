//! Gemini API client.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use shelfpick_core::{AnalysisReport, Book};
use shelfpick_fetch::HttpClient;
use tracing::{debug, info, instrument, warn};

use super::error::AnalysisError;
use super::prompt;

// ============================================================================
// Constants
// ============================================================================

/// Gemini API base URL (Generative Language API).
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ============================================================================
// Config
// ============================================================================

/// Analysis endpoint configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// API base, up to and including the version segment.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// API key; `None` disables the call.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnalysisConfig {
    /// Full `generateContent` URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

// ============================================================================
// API Client
// ============================================================================

/// Requests purchase-justification reports.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: HttpClient,
    config: AnalysisConfig,
}

impl AnalysisClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let http = HttpClient::with_timeout(config.timeout)
            .map_err(|e| AnalysisError::HttpError(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes `books`.
    ///
    /// An empty list returns [`AnalysisReport::empty_selection`] without a
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MissingApiKey`] without a key, and HTTP or
    /// response errors otherwise.
    #[instrument(skip(self, books), fields(count = books.len(), model = %self.config.model))]
    pub async fn analyze(&self, books: &[Book]) -> Result<AnalysisReport, AnalysisError> {
        if books.is_empty() {
            debug!("Empty selection, returning canned report");
            return Ok(AnalysisReport::empty_selection());
        }

        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AnalysisError::MissingApiKey)?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt::render(books) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": prompt::response_schema(),
            }
        });

        let response = self
            .http
            .post_json(&self.config.endpoint(), &[(API_KEY_HEADER, key)], &body)
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_default();
            warn!(status = status.as_u16(), message = %message, "Analysis request rejected");
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let report = parse_report(&text)?;
        info!(score = report.recommendation_score, "Analysis complete");
        Ok(report)
    }
}

/// Extracts the report from a `generateContent` body.
pub(crate) fn parse_report(body: &str) -> Result<AnalysisReport, AnalysisError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response
        .into_text()
        .ok_or_else(|| AnalysisError::InvalidResponse("no candidate text".to_string()))?;
    Ok(serde_json::from_str(text.trim())?)
}

// ============================================================================
// Tests
// ============================================================================
