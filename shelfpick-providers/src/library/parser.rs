//! Library response parser.

use serde::Deserialize;
use serde_json::Value;
use shelfpick_core::{Book, BookStatus};
use tracing::debug;

use crate::error::CatalogError;
use crate::lenient;

/// Id prefix for library-sourced books.
pub const ID_PREFIX: &str = "nlk-";

/// Top-level library response.
#[derive(Debug, Deserialize)]
pub struct LibraryResponse {
    /// Body; missing means the shape is wrong.
    pub response: Option<LibraryBody>,
}

/// The `response` object.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LibraryBody {
    /// Business error message.
    pub error: Option<String>,
    /// Wrapped documents.
    pub docs: Option<Vec<DocWrapper>>,
}

/// `{ "doc": { ... } }`.
#[derive(Debug, Deserialize)]
pub struct DocWrapper {
    /// The document.
    pub doc: LibraryDoc,
}

/// One recommended book.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
#[allow(missing_docs)]
pub struct LibraryDoc {
    #[serde(deserialize_with = "lenient::string")]
    pub no: String,
    #[serde(deserialize_with = "lenient::string")]
    pub bookname: String,
    #[serde(deserialize_with = "lenient::string")]
    pub authors: String,
    #[serde(deserialize_with = "lenient::string")]
    pub publisher: String,
    #[serde(deserialize_with = "lenient::string")]
    pub publication_year: String,
    #[serde(deserialize_with = "lenient::string")]
    pub isbn13: String,
    #[serde(rename = "bookImageURL", deserialize_with = "lenient::string")]
    pub book_image_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    pub class_nm: Option<String>,
    #[serde(rename = "bookDtlUrl", deserialize_with = "lenient::string")]
    pub book_dtl_url: String,
}

impl LibraryDoc {
    /// Converts to a discovery-stage [`Book`]; `fallback_seq` is used when
    /// the document has neither an ISBN nor a sequence number.
    pub fn into_book(self, fallback_seq: usize) -> Book {
        let id = if !self.isbn13.trim().is_empty() {
            format!("{ID_PREFIX}{}", self.isbn13.trim())
        } else if !self.no.trim().is_empty() {
            format!("{ID_PREFIX}{}", self.no.trim())
        } else {
            format!("{ID_PREFIX}{fallback_seq}")
        };

        Book {
            id,
            title: self.bookname,
            author: self.authors,
            publisher: self.publisher,
            pub_date: self.publication_year,
            cover: self.book_image_url,
            description: self.description,
            isbn13: self.isbn13,
            price_standard: 0,
            price_sales: 0,
            link: self.book_dtl_url,
            category_name: self.class_nm.filter(|c| !c.is_empty()),
            status: BookStatus::Discovery,
        }
    }
}

impl LibraryResponse {
    /// Parses a raw body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the body is not an object.
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        Ok(serde_json::from_value(value)?)
    }

    /// True when the body has no error and a `docs` array.
    pub fn is_valid(&self) -> bool {
        self.response
            .as_ref()
            .is_some_and(|r| r.error.is_none() && r.docs.is_some())
    }
}

/// Parses a library body into books.
///
/// `offset` is the zero-based position of the first document across
/// pages, used for sequence ids.
///
/// # Errors
///
/// Returns [`CatalogError::Provider`] when the body carries an `error`
/// and [`CatalogError::Parse`] when `response` is missing.
pub fn parse_docs(value: Value, offset: usize) -> Result<Vec<Book>, CatalogError> {
    let body = LibraryResponse::from_value(value)?
        .response
        .ok_or_else(|| CatalogError::Parse("missing `response` object".to_string()))?;

    if let Some(message) = body.error {
        return Err(CatalogError::provider(None, message));
    }

    let books: Vec<Book> = body
        .docs
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, wrapper)| wrapper.doc.into_book(offset + i + 1))
        .collect();
    debug!(count = books.len(), "Parsed library docs");
    Ok(books)
}
