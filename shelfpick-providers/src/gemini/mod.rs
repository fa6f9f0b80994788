//! Purchase-justification analysis through Gemini.
//!
//! The confirmed book list is rendered into a prompt and sent to
//! `models/{model}:generateContent` with a structured-output schema that
//! requires the four [`AnalysisReport`](shelfpick_core::AnalysisReport)
//! fields. The reply text is parsed as strict JSON.
//!
//! ## Request
//!
//! ```json
//! {
//!   "contents": [{ "parts": [{ "text": "..." }] }],
//!   "generationConfig": {
//!     "responseMimeType": "application/json",
//!     "responseSchema": { "type": "OBJECT", "properties": { ... }, "required": [...] }
//!   }
//! }
//! ```

// Modules
mod api;
mod error;
pub(crate) mod prompt;

// Re-exports
pub use api::{AnalysisClient, AnalysisConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::AnalysisError;
