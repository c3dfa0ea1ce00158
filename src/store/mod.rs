//! Persistence and index ports.
//!
//! The engine reaches the document store and the search index exclusively
//! through these traits; implementations are constructor-injected, never
//! ambient globals. In-memory backends for tests live in [`memory`].

pub mod memory;

pub use memory::{MemoryCatalog, MemoryHistory, MemoryIndex, MemoryVotes};

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::{ComponentId, ComponentRecord, HistoricSnapshot, OfferBook};
use crate::error::{Effect, Transience};
use crate::index::IndexDocument;

/// Canonical component documents.
pub trait CatalogStore: Send + Sync {
    /// Fetch a component by id. `Ok(None)` when absent.
    fn get(&self, id: &ComponentId) -> Result<Option<ComponentRecord>, StoreError>;

    /// Replace a component's offer book and activation flag in one commit.
    ///
    /// The book is written wholesale - the single commit point for an
    /// update. Durable once this returns `Ok`.
    fn commit_offers(
        &self,
        id: &ComponentId,
        book: &OfferBook,
        activated: bool,
    ) -> Result<(), StoreError>;
}

/// Append-only snapshot ledger.
pub trait HistoryStore: Send + Sync {
    /// Append a snapshot. Pure insert, never a read-modify-write, so
    /// concurrent appends for different components commute.
    fn append(&self, snapshot: &HistoricSnapshot) -> Result<(), StoreError>;
}

/// Votes collection (read-only dependency).
pub trait VoteStore: Send + Sync {
    /// Count non-removed votes for `(related, related_id)`, grouped by vote
    /// type. Grouping is pushed down so backends can aggregate in place.
    fn tally(
        &self,
        related: &str,
        related_id: &ComponentId,
    ) -> Result<BTreeMap<String, u64>, StoreError>;
}

/// External search index (push-only upserts keyed by `objectID`).
pub trait SearchIndex: Send + Sync {
    fn upsert(&self, doc: &IndexDocument) -> Result<(), IndexError>;
}

/// Persistence failure from a store backend.
///
/// Fatal to the canonical write path: the engine aborts and propagates,
/// it never commits state whose audit trail could not be written.
#[derive(Debug, Error, Clone)]
#[error("{op} failed: {reason}")]
pub struct StoreError {
    pub op: &'static str,
    pub reason: String,
    pub transience: Transience,
}

impl StoreError {
    pub fn retryable(op: &'static str, reason: impl Into<String>) -> Self {
        Self {
            op,
            reason: reason.into(),
            transience: Transience::Retryable,
        }
    }

    pub fn permanent(op: &'static str, reason: impl Into<String>) -> Self {
        Self {
            op,
            reason: reason.into(),
            transience: Transience::Permanent,
        }
    }

    pub fn effect(&self) -> Effect {
        // A failed write may have partially landed on the backend.
        Effect::Unknown
    }
}

/// Upsert failure from the search index.
///
/// Confined to the sync worker: reported via log and metric, never
/// propagated into the triggering call.
#[derive(Debug, Error, Clone)]
#[error("index upsert for `{object_id}` failed: {reason}")]
pub struct IndexError {
    pub object_id: String,
    pub reason: String,
    pub transience: Transience,
}

impl IndexError {
    pub fn retryable(object_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            reason: reason.into(),
            transience: Transience::Retryable,
        }
    }

    pub fn permanent(object_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            reason: reason.into(),
            transience: Transience::Permanent,
        }
    }
}
