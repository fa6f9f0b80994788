//! Book-related types.
//!
//! This module contains the unified catalog record shared by every provider:
//! - [`Book`] - A catalog item in provider-neutral form
//! - [`BookStatus`] - Triage stage
//! - [`CartItem`] - A book stamped with the time it entered the cart

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Book Status
// ============================================================================

/// Stage of a book in the acquisition pipeline.
///
/// A missing status deserializes as [`BookStatus::Discovery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    /// Freshly fetched, not yet picked.
    #[default]
    Discovery,
    /// Shortlisted for review.
    Review,
    /// Approved for purchase.
    Confirmed,
}

impl BookStatus {
    /// Returns the display name for this stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Review => "review",
            Self::Confirmed => "confirmed",
        }
    }

    /// Returns all stages in pipeline order.
    pub fn all() -> &'static [BookStatus] {
        &[Self::Discovery, Self::Review, Self::Confirmed]
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Book
// ============================================================================

/// A catalog item in provider-neutral form.
///
/// Ids are namespaced by provider: the commercial catalog uses its numeric
/// item id, the library API uses `nlk-<isbn13-or-sequence>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    /// Provider-namespaced identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author line as the provider formats it.
    pub author: String,
    /// Publisher.
    pub publisher: String,
    /// Publication date in the provider's native format.
    pub pub_date: String,
    /// Cover image URL.
    pub cover: String,
    /// Description or blurb.
    pub description: String,
    /// ISBN-13.
    pub isbn13: String,
    /// List price.
    pub price_standard: u64,
    /// Sale price.
    pub price_sales: u64,
    /// Deep link to the provider's detail page.
    pub link: String,
    /// `>`-delimited category breadcrumb.
    pub category_name: Option<String>,
    /// Triage stage.
    pub status: BookStatus,
}

impl Book {
    /// Creates a discovery-stage book with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Returns true if the category breadcrumb contains `marker`.
    pub fn in_category(&self, marker: &str) -> bool {
        self.category_name
            .as_deref()
            .is_some_and(|c| c.contains(marker))
    }

    /// Returns the book with its status replaced.
    #[must_use]
    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.status = status;
        self
    }
}

// ============================================================================
// Cart Item
// ============================================================================

/// A confirmed book with the time it was added to the purchase cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The book.
    #[serde(flatten)]
    pub book: Book,
    /// When the book was added.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Wraps a book with an explicit timestamp.
    pub fn new(book: Book, added_at: DateTime<Utc>) -> Self {
        Self { book, added_at }
    }

    /// Wraps a book stamped with the current time.
    pub fn now(book: Book) -> Self {
        Self::new(book, Utc::now())
    }
}

// ============================================================================
// Tests
// ============================================================================
