//! CLI command implementations.

pub mod config;
pub mod discover;
pub mod keys;
pub mod search;
pub mod session;
