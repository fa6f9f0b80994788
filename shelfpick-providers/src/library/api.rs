//! Library recommendation query URLs.

use url::Url;

use crate::error::CatalogError;

/// Library recommendation endpoint.
pub const DEFAULT_BASE_URL: &str = "https://data4library.kr/api/recommandList";

/// Builds a recommendation-list URL.
///
/// No `startDt`/`endDt` is sent, so the provider applies its default
/// publication window.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if `base` is not a URL.
pub fn recommend_url(base: &str, key: &str, page: u32, page_size: u32) -> Result<String, CatalogError> {
    let mut url = Url::parse(base).map_err(|e| CatalogError::Parse(format!("Invalid library URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("authKey", key)
        .append_pair("format", "json")
        .append_pair("pageNo", &page.max(1).to_string())
        .append_pair("pageSize", &page_size.to_string());
    Ok(url.into())
}
