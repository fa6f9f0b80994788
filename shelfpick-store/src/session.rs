//! The owned application state.
//!
//! A [`Session`] holds everything one librarian works with: the board, the
//! catalog and analysis clients, and the credentials. All board mutation
//! goes through `&mut Session`, so no locking is needed.
//!
//! Discovery loads are split in two so that a caller may keep several in
//! flight: [`Session::begin_load`] hands out a [`PendingLoad`] stamped with
//! the board's fetch epoch, and [`Session::finish_load`] applies the result
//! only if no newer load was started in the meantime.

use chrono::{DateTime, Local, Utc};
use shelfpick_core::{
    AcquisitionBoard, AnalysisReport, ApiKeys, Book, CartItem, CredentialKind, DiscoverySource,
    DiscoveryUpdate, FetchTicket, SearchTarget, Transition,
};
use shelfpick_providers::{AnalysisClient, CatalogClient, CatalogError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::credentials::CredentialStore;
use crate::error::StoreError;
use crate::export;

// ============================================================================
// Load requests
// ============================================================================

/// What discovery currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseMode {
    /// A listing source.
    Source(DiscoverySource),
    /// A catalog search.
    Search {
        /// Query text.
        query: String,
        /// Field searched.
        target: SearchTarget,
    },
}

impl std::fmt::Display for BrowseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(source) => write!(f, "{source}"),
            Self::Search { query, target } => write!(f, "search \"{query}\" ({target})"),
        }
    }
}

/// A discovery load that has been issued but not applied.
#[derive(Debug)]
pub struct PendingLoad {
    ticket: FetchTicket,
    mode: BrowseMode,
    page: u32,
    keys: ApiKeys,
    catalog: CatalogClient,
}

/// A finished load, ready for [`Session::finish_load`].
#[derive(Debug)]
pub struct CompletedLoad {
    ticket: FetchTicket,
    result: Result<Vec<Book>, CatalogError>,
}

impl PendingLoad {
    /// The epoch this load was issued under.
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    /// Performs the provider calls.
    pub async fn run(self) -> CompletedLoad {
        let catalog_key = self.keys.configured(CredentialKind::Catalog);
        let library_key = self.keys.configured(CredentialKind::Library);

        let result = match &self.mode {
            BrowseMode::Source(source) => {
                self.catalog
                    .fetch(*source, catalog_key, library_key, self.page)
                    .await
            }
            BrowseMode::Search { query, target } => {
                self.catalog
                    .search(query, catalog_key.unwrap_or_default(), *target, self.page)
                    .await
            }
        };

        CompletedLoad {
            ticket: self.ticket,
            result,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// One librarian's working state.
#[derive(Debug)]
pub struct Session {
    board: AcquisitionBoard,
    catalog: CatalogClient,
    analysis: AnalysisClient,
    credentials: CredentialStore,
    keys: ApiKeys,
    mode: BrowseMode,
    page: u32,
    added_at: HashMap<String, DateTime<Utc>>,
}

impl Session {
    /// Creates a session showing `source`. Nothing is loaded yet.
    pub async fn new(
        catalog: CatalogClient,
        analysis: AnalysisClient,
        credentials: CredentialStore,
        source: DiscoverySource,
    ) -> Self {
        let keys = credentials.keys().await;
        Self {
            board: AcquisitionBoard::new(),
            catalog,
            analysis,
            credentials,
            keys,
            mode: BrowseMode::Source(source),
            page: 1,
            added_at: HashMap::new(),
        }
    }

    /// The board.
    pub fn board(&self) -> &AcquisitionBoard {
        &self.board
    }

    /// What discovery shows.
    pub fn mode(&self) -> &BrowseMode {
        &self.mode
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current credentials.
    pub fn keys(&self) -> &ApiKeys {
        &self.keys
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Issues a load for the current mode and page, superseding any load
    /// still in flight.
    pub fn begin_load(&mut self) -> PendingLoad {
        let ticket = self.board.begin_discovery();
        debug!(epoch = ticket.epoch(), mode = %self.mode, page = self.page, "Discovery load issued");
        PendingLoad {
            ticket,
            mode: self.mode.clone(),
            page: self.page,
            keys: self.keys.clone(),
            catalog: self.catalog.clone(),
        }
    }

    /// Applies a finished load.
    ///
    /// Results from a superseded load are dropped, failures included.
    ///
    /// # Errors
    ///
    /// Returns the catalog error of a current load, after blanking
    /// discovery.
    pub fn finish_load(&mut self, done: CompletedLoad) -> Result<DiscoveryUpdate, StoreError> {
        match done.result {
            Ok(books) => {
                let update = self.board.apply_discovery(done.ticket, books);
                match update {
                    DiscoveryUpdate::Applied { shown, excluded } => {
                        info!(shown, excluded, "Discovery updated");
                    }
                    DiscoveryUpdate::Stale => {
                        debug!(epoch = done.ticket.epoch(), "Dropped stale discovery results");
                    }
                }
                Ok(update)
            }
            Err(e) => {
                if self.board.fail_discovery(done.ticket) {
                    warn!(error = %e, "Discovery load failed");
                    Err(e.into())
                } else {
                    debug!(epoch = done.ticket.epoch(), "Dropped stale discovery failure");
                    Ok(DiscoveryUpdate::Stale)
                }
            }
        }
    }

    /// Loads the current mode and page.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_load`].
    pub async fn reload(&mut self) -> Result<DiscoveryUpdate, StoreError> {
        let done = self.begin_load().run().await;
        self.finish_load(done)
    }

    /// Switches to a listing source at page 1.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_load`].
    pub async fn select_source(&mut self, source: DiscoverySource) -> Result<DiscoveryUpdate, StoreError> {
        self.mode = BrowseMode::Source(source);
        self.page = 1;
        self.reload().await
    }

    /// Searches the catalog, showing page 1 of the results.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_load`].
    pub async fn search(&mut self, query: &str, target: SearchTarget) -> Result<DiscoveryUpdate, StoreError> {
        self.mode = BrowseMode::Search {
            query: query.trim().to_string(),
            target,
        };
        self.page = 1;
        self.reload().await
    }

    /// Moves to `page` of the current mode.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_load`].
    pub async fn go_to_page(&mut self, page: u32) -> Result<DiscoveryUpdate, StoreError> {
        self.page = page.max(1);
        self.reload().await
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    /// Stores a key (debounced) and reloads discovery with it.
    ///
    /// # Errors
    ///
    /// See [`Session::finish_load`].
    pub async fn set_key(&mut self, kind: CredentialKind, key: &str) -> Result<DiscoveryUpdate, StoreError> {
        self.keys.set(kind, key.trim());
        self.credentials.set(kind, key.trim()).await;
        self.reload().await
    }

    /// Checks the configured key for `kind` against its provider.
    pub async fn validate_key(&self, kind: CredentialKind) -> bool {
        self.catalog
            .validate_credential(kind, self.keys.get(kind))
            .await
    }

    // ========================================================================
    // Board moves
    // ========================================================================

    /// discovery → review.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Board`] for unknown ids and illegal moves.
    pub fn add(&mut self, id: &str) -> Result<Transition, StoreError> {
        let transition = self.board.add(id)?;
        self.added_at.insert(id.to_string(), Utc::now());
        Ok(transition)
    }

    /// review → confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Board`] for unknown ids and illegal moves.
    pub fn approve(&mut self, id: &str) -> Result<Transition, StoreError> {
        Ok(self.board.approve(id)?)
    }

    /// review → discarded, or confirmed → review.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Board`] for unknown ids and illegal moves.
    pub fn return_book(&mut self, id: &str) -> Result<Transition, StoreError> {
        let transition = self.board.return_book(id)?;
        if transition == Transition::Discard {
            self.added_at.remove(id);
        }
        Ok(transition)
    }

    /// Confirmed books with the time each was first shortlisted.
    pub fn cart(&self) -> Vec<CartItem> {
        self.board
            .confirmed()
            .iter()
            .map(|book| {
                let added_at = self.added_at.get(&book.id).copied().unwrap_or_else(Utc::now);
                CartItem::new(book.clone(), added_at)
            })
            .collect()
    }

    /// Total sale price of the confirmed list.
    pub fn cart_total(&self) -> u64 {
        self.board.confirmed().iter().map(|b| b.price_sales).sum()
    }

    // ========================================================================
    // Analysis and export
    // ========================================================================

    /// Returns the report for the confirmed list, requesting one if none is
    /// cached.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Analysis`]; the board is left as it was.
    #[instrument(skip(self), fields(confirmed = self.board.confirmed().len()))]
    pub async fn analyze(&mut self) -> Result<AnalysisReport, StoreError> {
        if let Some(report) = self.board.report() {
            debug!("Using cached report");
            return Ok(report.clone());
        }

        let report = self.analysis.analyze(self.board.confirmed()).await?;
        self.board.set_report(report.clone());
        Ok(report)
    }

    /// Writes the confirmed list to `dir` as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn export(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        export::write_csv(dir, self.board.confirmed(), Local::now().date_naive()).await
    }

    /// Flushes any pending credential write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn close(self) -> Result<(), StoreError> {
        self.credentials.flush().await
    }
}
