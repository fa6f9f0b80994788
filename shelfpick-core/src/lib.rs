// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Shelfpick Core
//!
//! Core types, models, and the acquisition board for Shelfpick.
//!
//! This crate provides the foundational abstractions used across all other
//! Shelfpick crates:
//!
//! - Domain models (books, credentials, analysis reports, discovery sources)
//! - The acquisition board and its explicit transition table
//! - Error types
//!
//! ## Key Types
//!
//! ### Catalog Types
//! - [`Book`] - Unified catalog record produced by every provider parser
//! - [`BookStatus`] - Stage of a book in the triage pipeline
//! - [`CartItem`] - A confirmed book stamped with the time it was added
//! - [`DiscoverySource`] - Where discovery listings come from
//! - [`SearchTarget`] - Which field a catalog search matches against
//!
//! ### Credentials & Analysis
//! - [`ApiKeys`] - The persisted pair of provider credentials
//! - [`CredentialKind`] - Which of the two credentials is meant
//! - [`AnalysisReport`] - Purchase-justification report
//!
//! ### Board
//! - [`AcquisitionBoard`] - Discovery, review and confirmed collections
//! - [`Transition`] - Resolved move between stages
//! - [`FetchTicket`] - Epoch token that guards discovery loads

pub mod board;
pub mod error;
pub mod models;

// Re-export error types
pub use error::{BoardError, CoreError};

// Re-export all model types
pub use models::{
    // Catalog types
    Book,
    BookStatus,
    CartItem,
    DiscoverySource,
    SearchTarget,
    // Credentials
    ApiKeys,
    CredentialKind,
    // Analysis
    AnalysisReport,
};

// Re-export board types
pub use board::{
    excluded_ids, AcquisitionBoard, BoardAction, DiscoveryUpdate, FetchTicket, Transition,
};
