//! The catalog facade.
//!
//! [`CatalogClient`] turns a search or a discovery source into a filtered
//! list of [`Book`]s. It owns no state beyond its transport and endpoints,
//! so one client can serve every session.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use shelfpick_core::{Book, CredentialKind, DiscoverySource, SearchTarget};
use shelfpick_fetch::JsonTransport;
use tracing::{debug, info, instrument, warn};

use crate::aladin::{self, ListKind};
use crate::error::CatalogError;
use crate::filters;
use crate::library;

/// Results requested per page from every source.
pub const PAGE_SIZE: u32 = 50;

// ============================================================================
// Endpoints
// ============================================================================

/// Provider base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoints {
    /// Aladin TTB API base (the directory holding `ItemSearch.aspx`).
    pub catalog_base: String,
    /// Library recommendation endpoint.
    pub library_base: String,
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self {
            catalog_base: aladin::DEFAULT_BASE_URL.to_string(),
            library_base: library::DEFAULT_BASE_URL.to_string(),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Searches and lists books across the catalog and library providers.
#[derive(Clone)]
pub struct CatalogClient {
    transport: Arc<dyn JsonTransport>,
    endpoints: CatalogEndpoints,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Creates a client over `transport`.
    pub fn new(transport: Arc<dyn JsonTransport>, endpoints: CatalogEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Returns the configured endpoints.
    pub fn endpoints(&self) -> &CatalogEndpoints {
        &self.endpoints
    }

    // ========================================================================
    // Credential validation
    // ========================================================================

    /// Checks whether `key` is accepted by the provider for `kind`.
    ///
    /// Issues the smallest listing each provider supports. Any failure,
    /// including a blank key, yields `false`.
    #[instrument(skip(self, key))]
    pub async fn validate_credential(&self, kind: CredentialKind, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }

        let url = match kind {
            CredentialKind::Catalog => {
                aladin::api::list_url(&self.endpoints.catalog_base, key, ListKind::Bestseller, 1, 1)
            }
            CredentialKind::Library => {
                library::api::recommend_url(&self.endpoints.library_base, key, 1, 1)
            }
        };
        let Ok(url) = url else {
            return false;
        };

        let body = match self.transport.fetch_json(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Credential check could not reach provider");
                return false;
            }
        };

        let valid = match kind {
            CredentialKind::Catalog => {
                aladin::AladinResponse::from_value(body).is_ok_and(|r| r.is_valid())
            }
            CredentialKind::Library => {
                library::LibraryResponse::from_value(body).is_ok_and(|r| r.is_valid())
            }
        };
        info!(valid, "Credential checked");
        valid
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Searches the catalog, keeping recent non-comics results.
    ///
    /// Returns an empty list without calling out when `query` or `key` is
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] when every relay failed and
    /// [`CatalogError::Provider`] when the catalog reported an error.
    pub async fn search(
        &self,
        query: &str,
        key: &str,
        target: SearchTarget,
        page: u32,
    ) -> Result<Vec<Book>, CatalogError> {
        self.search_as_of(query, key, target, page, Local::now().date_naive())
            .await
    }

    /// [`search`](Self::search) with an explicit "today" for the recency
    /// cutoff.
    ///
    /// # Errors
    ///
    /// Same as [`search`](Self::search).
    #[instrument(skip(self, key), fields(query = %query, target = ?target))]
    pub async fn search_as_of(
        &self,
        query: &str,
        key: &str,
        target: SearchTarget,
        page: u32,
        today: NaiveDate,
    ) -> Result<Vec<Book>, CatalogError> {
        let (query, key) = (query.trim(), key.trim());
        if query.is_empty() || key.is_empty() {
            debug!("Blank query or key, skipping search");
            return Ok(Vec::new());
        }

        let url = aladin::api::search_url(
            &self.endpoints.catalog_base,
            key,
            query,
            target,
            PAGE_SIZE,
            page,
        )?;
        let body = self.transport.fetch_json(&url).await?;
        let books = aladin::parser::parse_items(body)?;
        let fetched = books.len();

        let books = filters::drop_comics(filters::retain_recent(books, today));
        info!(fetched, kept = books.len(), "Search complete");
        Ok(books)
    }

    // ========================================================================
    // Discovery sources
    // ========================================================================

    /// Loads one page of a discovery source.
    ///
    /// A missing catalog key yields an empty list for catalog-backed
    /// sources.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingCredential`] when
    /// [`DiscoverySource::EditorRecommend`] is requested without a library
    /// key, and network or provider errors from the underlying calls.
    #[instrument(skip(self, catalog_key, library_key), fields(source = %source))]
    pub async fn fetch(
        &self,
        source: DiscoverySource,
        catalog_key: Option<&str>,
        library_key: Option<&str>,
        page: u32,
    ) -> Result<Vec<Book>, CatalogError> {
        let catalog_key = catalog_key.map(str::trim).filter(|k| !k.is_empty());
        let library_key = library_key.map(str::trim).filter(|k| !k.is_empty());

        let books = match source {
            DiscoverySource::EditorRecommend => {
                let key = library_key.ok_or(CatalogError::MissingCredential(CredentialKind::Library))?;
                self.recommendations(key, page).await?
            }
            DiscoverySource::Bestseller | DiscoverySource::ItemNewSpecial => {
                let Some(key) = catalog_key else {
                    debug!("No catalog key, returning no results");
                    return Ok(Vec::new());
                };
                let kind = if source == DiscoverySource::Bestseller {
                    ListKind::Bestseller
                } else {
                    ListKind::ItemNewSpecial
                };
                filters::drop_comics(self.list(key, kind, page).await?)
            }
            DiscoverySource::Combined => {
                let Some(key) = catalog_key else {
                    debug!("No catalog key, returning no results");
                    return Ok(Vec::new());
                };
                self.combined(key, page).await?
            }
        };

        info!(count = books.len(), "Discovery page loaded");
        Ok(books)
    }

    async fn list(&self, key: &str, kind: ListKind, page: u32) -> Result<Vec<Book>, CatalogError> {
        let url = aladin::api::list_url(&self.endpoints.catalog_base, key, kind, PAGE_SIZE, page)?;
        let body = self.transport.fetch_json(&url).await?;
        aladin::parser::parse_items(body)
    }

    async fn recommendations(&self, key: &str, page: u32) -> Result<Vec<Book>, CatalogError> {
        let url = library::api::recommend_url(&self.endpoints.library_base, key, page, PAGE_SIZE)?;
        let body = self.transport.fetch_json(&url).await?;
        let offset = (page.max(1) - 1) as usize * PAGE_SIZE as usize;
        library::parser::parse_docs(body, offset)
    }

    /// Bestseller and new-release lists merged, new releases winning on
    /// shared ids.
    async fn combined(&self, key: &str, page: u32) -> Result<Vec<Book>, CatalogError> {
        let (bestsellers, new_releases) = tokio::join!(
            self.list(key, ListKind::Bestseller, page),
            self.list(key, ListKind::ItemNewSpecial, page),
        );
        let bestsellers = bestsellers?;
        let new_releases = new_releases?;
        debug!(
            bestsellers = bestsellers.len(),
            new_releases = new_releases.len(),
            "Merging listings"
        );

        let merged = filters::dedup_last_wins(bestsellers.into_iter().chain(new_releases));
        Ok(filters::drop_comics(merged))
    }
}

// ============================================================================
// Tests
// ============================================================================
