//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use shelfpick_core::{AcquisitionBoard, AnalysisReport, ApiKeys, Book, CartItem, CredentialKind};

// ============================================================================
// Output Types
// ============================================================================

/// A page of books.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksOutput<'a> {
    pub source: String,
    pub page: u32,
    pub count: usize,
    pub books: &'a [Book],
}

/// The whole board.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOutput<'a> {
    pub discovery: &'a [Book],
    pub review: &'a [Book],
    pub confirmed: Vec<CartItem>,
    pub confirmed_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a AnalysisReport>,
}

/// One credential's status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutput {
    pub kind: CredentialKind,
    pub configured: bool,
    pub masked: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a page of books.
    pub fn format_books(&self, source: &str, page: u32, books: &[Book]) -> Result<String> {
        self.format(&BooksOutput {
            source: source.to_string(),
            page,
            count: books.len(),
            books,
        })
    }

    /// Formats the board with the confirmed list as cart items.
    pub fn format_board(&self, board: &AcquisitionBoard, cart: Vec<CartItem>) -> Result<String> {
        self.format(&BoardOutput {
            discovery: board.discovery(),
            review: board.review(),
            confirmed_total: cart.iter().map(|c| c.book.price_sales).sum(),
            confirmed: cart,
            report: board.report(),
        })
    }

    /// Formats credential status, optionally with validation results.
    pub fn format_keys(&self, keys: &ApiKeys, validation: &[(CredentialKind, bool)]) -> Result<String> {
        let outputs: Vec<KeyOutput> = CredentialKind::all()
            .iter()
            .map(|kind| KeyOutput {
                kind: *kind,
                configured: keys.configured(*kind).is_some(),
                masked: keys.masked(*kind),
                valid: validation.iter().find(|(k, _)| k == kind).map(|(_, v)| *v),
            })
            .collect();
        self.format(&outputs)
    }
}
