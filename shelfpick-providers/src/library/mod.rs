//! National library curator recommendations (`recommandList`).
//!
//! The library API carries no pricing, so every book parsed from it has
//! both price fields at 0 and an `nlk-` namespaced id.

pub mod api;
pub mod parser;

pub use api::DEFAULT_BASE_URL;
pub use parser::{LibraryDoc, LibraryResponse};
