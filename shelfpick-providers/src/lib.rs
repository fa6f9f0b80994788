// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Shelfpick Providers
//!
//! Clients for the external services Shelfpick talks to.
//!
//! | Module | Service | Auth | Transport |
//! |--------|---------|------|-----------|
//! | [`aladin`] | Commercial book catalog (item search, item lists) | `ttbkey` | relay gateway |
//! | [`library`] | National library curator recommendations | `authKey` | relay gateway |
//! | [`gemini`] | Purchase-justification analysis | `GEMINI_API_KEY` | direct POST |
//!
//! [`CatalogClient`] is the facade the rest of the workspace uses: it
//! builds queries, parses both catalog shapes into [`shelfpick_core::Book`]
//! and applies the post-fetch [`filters`].
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use shelfpick_core::DiscoverySource;
//! use shelfpick_fetch::{RelayGateway, RelaySettings};
//! use shelfpick_providers::{CatalogClient, CatalogEndpoints};
//!
//! let gateway = Arc::new(RelayGateway::new(RelaySettings::default())?);
//! let catalog = CatalogClient::new(gateway, CatalogEndpoints::default());
//! let books = catalog
//!     .fetch(DiscoverySource::Combined, Some("ttbkey"), None, 1)
//!     .await?;
//! ```

pub mod aladin;
pub mod catalog;
pub mod error;
pub mod filters;
pub mod gemini;
pub mod library;
mod lenient;

pub use catalog::{CatalogClient, CatalogEndpoints, PAGE_SIZE};
pub use error::CatalogError;
pub use gemini::{AnalysisClient, AnalysisConfig, AnalysisError};
#[cfg(test)]
mod parser_edge_tests;
