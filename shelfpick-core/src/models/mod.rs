//! Domain models for Shelfpick.
//!
//! ## Submodules
//!
//! - [`book`] - Book records, stages and cart items
//! - [`source`] - Discovery sources and search targets
//! - [`credentials`] - Provider credentials
//! - [`analysis`] - Purchase-justification reports

mod analysis;
mod book;
mod credentials;
mod source;

pub use analysis::AnalysisReport;
pub use book::{Book, BookStatus, CartItem};
pub use credentials::{ApiKeys, CredentialKind};
pub use source::{DiscoverySource, SearchTarget};
#[cfg(test)]
mod serde_tests;
