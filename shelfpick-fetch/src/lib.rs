// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Shelfpick Fetch
//!
//! Outbound HTTP for Shelfpick.
//!
//! Catalog APIs are reached through public relay proxies. This crate
//! provides:
//!
//! - [`http::HttpClient`] - reqwest wrapper with tracing and a fixed user agent
//! - [`relay::RelayGateway`] - tries each relay in order with bounded retry
//! - [`relay::JsonTransport`] - the seam catalog clients depend on
//!
//! ## Example
//!
//! ```ignore
//! use shelfpick_fetch::{RelayGateway, RelaySettings, JsonTransport};
//!
//! let gateway = RelayGateway::new(RelaySettings::default())?;
//! let body = gateway.fetch_json("https://www.aladin.co.kr/ttb/api/ItemList.aspx?...").await?;
//! ```

pub mod error;
pub mod http;
pub mod relay;

pub use error::FetchError;
pub use http::HttpClient;
pub use relay::{JsonTransport, Relay, RelayGateway, RelaySettings};
