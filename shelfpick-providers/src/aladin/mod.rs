//! Commercial book catalog (Aladin TTB API).
//!
//! Two endpoints are used: `ItemSearch.aspx` for searches and
//! `ItemList.aspx` for the bestseller and new-release listings. Both answer
//! `{ errorCode?, errorMessage?, item?: [...] }`.

pub mod api;
pub mod parser;

pub use api::{ListKind, DEFAULT_BASE_URL};
pub use parser::{AladinItem, AladinResponse};
