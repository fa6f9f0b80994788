//! Aladin query URLs.

use chrono::Utc;
use shelfpick_core::SearchTarget;
use url::Url;

use crate::error::CatalogError;

// ============================================================================
// Constants
// ============================================================================

/// Aladin TTB API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.aladin.co.kr/ttb/api/";

/// Search endpoint.
const SEARCH_ENDPOINT: &str = "ItemSearch.aspx";

/// List endpoint.
const LIST_ENDPOINT: &str = "ItemList.aspx";

/// API version the response shapes are written against.
const API_VERSION: &str = "20131101";

// ============================================================================
// List Kinds
// ============================================================================

/// Listings served by `ItemList.aspx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bestsellers.
    Bestseller,
    /// Notable new releases.
    ItemNewSpecial,
}

impl ListKind {
    /// The `QueryType` value.
    pub fn query_type(&self) -> &'static str {
        match self {
            Self::Bestseller => "Bestseller",
            Self::ItemNewSpecial => "ItemNewSpecial",
        }
    }
}

// ============================================================================
// URL Builders
// ============================================================================

fn endpoint(base: &str, name: &str) -> Result<Url, CatalogError> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    Url::parse(&base)
        .and_then(|b| b.join(name))
        .map_err(|e| CatalogError::Parse(format!("Invalid catalog URL: {e}")))
}

fn common_params(url: &mut Url, max_results: u32, page: u32) {
    url.query_pairs_mut()
        .append_pair("MaxResults", &max_results.to_string())
        .append_pair("start", &page.max(1).to_string())
        .append_pair("SearchTarget", "Book")
        .append_pair("output", "js")
        .append_pair("Version", API_VERSION)
        .append_pair("Cover", "Big")
        .append_pair("_t", &Utc::now().timestamp_millis().to_string());
}

/// Builds an item-search URL.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if `base` is not a URL.
pub fn search_url(
    base: &str,
    key: &str,
    query: &str,
    target: SearchTarget,
    max_results: u32,
    page: u32,
) -> Result<String, CatalogError> {
    let mut url = endpoint(base, SEARCH_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("ttbkey", key)
        .append_pair("Query", query)
        .append_pair("QueryType", target.query_type());
    common_params(&mut url, max_results, page);
    Ok(url.into())
}

/// Builds an item-list URL.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if `base` is not a URL.
pub fn list_url(
    base: &str,
    key: &str,
    kind: ListKind,
    max_results: u32,
    page: u32,
) -> Result<String, CatalogError> {
    let mut url = endpoint(base, LIST_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("ttbkey", key)
        .append_pair("QueryType", kind.query_type());
    common_params(&mut url, max_results, page);
    Ok(url.into())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_search_url() {
        let url = search_url(DEFAULT_BASE_URL, "ttbkey1", "역사", SearchTarget::Author, 50, 2).unwrap();
        assert!(url.starts_with("https://www.aladin.co.kr/ttb/api/ItemSearch.aspx?"));

        let p = params(&url);
        assert_eq!(p["ttbkey"], "ttbkey1");
        assert_eq!(p["Query"], "역사");
        assert_eq!(p["QueryType"], "Author");
        assert_eq!(p["MaxResults"], "50");
        assert_eq!(p["start"], "2");
        assert_eq!(p["SearchTarget"], "Book");
        assert_eq!(p["output"], "js");
        assert_eq!(p["Version"], "20131101");
        assert_eq!(p["Cover"], "Big");
        assert!(p.contains_key("_t"));
    }

    #[test]
    fn test_list_url_without_trailing_slash() {
        let url = list_url("http://localhost:9000/ttb/api", "k", ListKind::ItemNewSpecial, 1, 0).unwrap();
        assert!(url.starts_with("http://localhost:9000/ttb/api/ItemList.aspx?"));

        let p = params(&url);
        assert_eq!(p["QueryType"], "ItemNewSpecial");
        assert_eq!(p["start"], "1");
    }

    #[test]
    fn test_invalid_base() {
        assert!(list_url("not a url", "k", ListKind::Bestseller, 1, 1).is_err());
    }
}
