//! The acquisition board.
//!
//! Three disjoint collections (discovery, review, confirmed) and the moves
//! between them. Every move goes through [`Transition::resolve`], which is
//! the whole transition table:
//!
//! | Current   | Action  | Next      |
//! |-----------|---------|-----------|
//! | discovery | add     | review    |
//! | review    | approve | confirmed |
//! | review    | return  | discarded |
//! | confirmed | return  | review    |
//!
//! Moved books are prepended to their destination; untouched books keep
//! their order. Discovery loads are guarded by a [`FetchTicket`] so a slow
//! response can never overwrite a newer one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::BoardError;
use crate::models::{AnalysisReport, Book, BookStatus};

// ============================================================================
// Actions & Transitions
// ============================================================================

/// User actions on a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardAction {
    /// Shortlist a discovery book.
    Add,
    /// Approve a reviewed book for purchase.
    Approve,
    /// Send a book back one stage (discards from review).
    Return,
}

impl fmt::Display for BoardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Approve => "approve",
            Self::Return => "return",
        })
    }
}

/// A legal move between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// discovery → review
    Shortlist,
    /// review → confirmed
    Approve,
    /// review → gone
    Discard,
    /// confirmed → review
    Reopen,
}

impl Transition {
    /// Looks up the transition for `action` on a book in `from`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::IllegalTransition`] for pairs outside the table,
    /// e.g. approving a discovery book.
    pub fn resolve(from: BookStatus, action: BoardAction) -> Result<Self, BoardError> {
        match (from, action) {
            (BookStatus::Discovery, BoardAction::Add) => Ok(Self::Shortlist),
            (BookStatus::Review, BoardAction::Approve) => Ok(Self::Approve),
            (BookStatus::Review, BoardAction::Return) => Ok(Self::Discard),
            (BookStatus::Confirmed, BoardAction::Return) => Ok(Self::Reopen),
            (from, action) => Err(BoardError::IllegalTransition { from, action }),
        }
    }

    /// Stage the book leaves.
    pub fn from(&self) -> BookStatus {
        match self {
            Self::Shortlist => BookStatus::Discovery,
            Self::Approve | Self::Discard => BookStatus::Review,
            Self::Reopen => BookStatus::Confirmed,
        }
    }

    /// Stage the book lands in, or `None` when it is discarded.
    pub fn target(&self) -> Option<BookStatus> {
        match self {
            Self::Shortlist | Self::Reopen => Some(BookStatus::Review),
            Self::Approve => Some(BookStatus::Confirmed),
            Self::Discard => None,
        }
    }

    /// Returns true if the confirmed set changes.
    pub fn touches_confirmed(&self) -> bool {
        matches!(self, Self::Approve | Self::Reopen)
    }
}

// ============================================================================
// Exclusion
// ============================================================================

/// Ids that must never show up in discovery.
pub fn excluded_ids(review: &[Book], confirmed: &[Book]) -> HashSet<String> {
    review
        .iter()
        .chain(confirmed)
        .map(|b| b.id.clone())
        .collect()
}

// ============================================================================
// Fetch Tickets
// ============================================================================

/// Token handed out when a discovery load starts.
///
/// Only the most recently issued ticket may write results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
}

impl FetchTicket {
    /// The epoch this ticket was issued for.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Result of handing a discovery load to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryUpdate {
    /// Results were shown.
    Applied {
        /// Books now in discovery.
        shown: usize,
        /// Fetched books dropped because they are already in a later stage.
        excluded: usize,
    },
    /// A newer load was started; results dropped.
    Stale,
}

// ============================================================================
// Board
// ============================================================================

/// The three triage collections plus the cached analysis report.
#[derive(Debug, Clone, Default)]
pub struct AcquisitionBoard {
    discovery: Vec<Book>,
    review: Vec<Book>,
    confirmed: Vec<Book>,
    report: Option<AnalysisReport>,
    epoch: u64,
}

impl AcquisitionBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Books in discovery.
    pub fn discovery(&self) -> &[Book] {
        &self.discovery
    }

    /// Books under review, most recent first.
    pub fn review(&self) -> &[Book] {
        &self.review
    }

    /// Confirmed books, most recent first.
    pub fn confirmed(&self) -> &[Book] {
        &self.confirmed
    }

    /// Books in `status`.
    pub fn collection(&self, status: BookStatus) -> &[Book] {
        match status {
            BookStatus::Discovery => &self.discovery,
            BookStatus::Review => &self.review,
            BookStatus::Confirmed => &self.confirmed,
        }
    }

    /// Current exclusion set, derived from review and confirmed.
    pub fn excluded_ids(&self) -> HashSet<String> {
        excluded_ids(&self.review, &self.confirmed)
    }

    /// Finds a book anywhere on the board.
    pub fn find(&self, id: &str) -> Option<&Book> {
        BookStatus::all()
            .iter()
            .find_map(|s| self.collection(*s).iter().find(|b| b.id == id))
    }

    /// Cached analysis report, if still valid.
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Caches a report for the current confirmed set.
    pub fn set_report(&mut self, report: AnalysisReport) {
        self.report = Some(report);
    }

    // ========================================================================
    // Discovery loads
    // ========================================================================

    /// Starts a discovery load and invalidates every earlier ticket.
    pub fn begin_discovery(&mut self) -> FetchTicket {
        self.epoch += 1;
        FetchTicket { epoch: self.epoch }
    }

    /// Returns true if `ticket` is the latest issued.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Replaces discovery with `books`, minus anything in review/confirmed.
    pub fn apply_discovery(&mut self, ticket: FetchTicket, books: Vec<Book>) -> DiscoveryUpdate {
        if !self.is_current(ticket) {
            return DiscoveryUpdate::Stale;
        }

        let excluded = self.excluded_ids();
        let fetched = books.len();
        self.discovery = books
            .into_iter()
            .filter(|b| !excluded.contains(&b.id))
            .map(|b| b.with_status(BookStatus::Discovery))
            .collect();

        DiscoveryUpdate::Applied {
            shown: self.discovery.len(),
            excluded: fetched - self.discovery.len(),
        }
    }

    /// Blanks discovery after a failed load. Stale failures are ignored.
    pub fn fail_discovery(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.discovery.clear();
        true
    }

    // ========================================================================
    // Moves
    // ========================================================================

    /// Applies `action` to the book with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if no collection holds the book and
    /// [`BoardError::IllegalTransition`] if its stage has no row for `action`.
    pub fn apply(&mut self, id: &str, action: BoardAction) -> Result<Transition, BoardError> {
        let from = self
            .locate(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let transition = Transition::resolve(from, action)?;

        let source = self.collection_mut(from);
        let index = source
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let book = source.remove(index);

        if let Some(target) = transition.target() {
            self.collection_mut(target)
                .insert(0, book.with_status(target));
        }
        if transition.touches_confirmed() {
            self.report = None;
        }

        Ok(transition)
    }

    /// discovery → review.
    ///
    /// # Errors
    ///
    /// See [`AcquisitionBoard::apply`].
    pub fn add(&mut self, id: &str) -> Result<Transition, BoardError> {
        self.apply(id, BoardAction::Add)
    }

    /// review → confirmed.
    ///
    /// # Errors
    ///
    /// See [`AcquisitionBoard::apply`].
    pub fn approve(&mut self, id: &str) -> Result<Transition, BoardError> {
        self.apply(id, BoardAction::Approve)
    }

    /// review → discarded, or confirmed → review.
    ///
    /// # Errors
    ///
    /// See [`AcquisitionBoard::apply`].
    pub fn return_book(&mut self, id: &str) -> Result<Transition, BoardError> {
        self.apply(id, BoardAction::Return)
    }

    fn locate(&self, id: &str) -> Option<BookStatus> {
        BookStatus::all()
            .iter()
            .copied()
            .find(|s| self.collection(*s).iter().any(|b| b.id == id))
    }

    fn collection_mut(&mut self, status: BookStatus) -> &mut Vec<Book> {
        match status {
            BookStatus::Discovery => &mut self.discovery,
            BookStatus::Review => &mut self.review,
            BookStatus::Confirmed => &mut self.confirmed,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
