//! In-memory port implementations with fault injection.
//!
//! Test and wiring backends: everything lives behind a mutex, failures are
//! injected explicitly. Not intended for production durability.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use crate::core::{ComponentId, ComponentRecord, HistoricSnapshot, OfferBook, VoteRecord};
use crate::index::IndexDocument;

use super::{CatalogStore, HistoryStore, IndexError, SearchIndex, StoreError, VoteStore};

/// In-memory canonical component store.
#[derive(Default)]
pub struct MemoryCatalog {
    records: Mutex<BTreeMap<ComponentId, ComponentRecord>>,
    fail_next_commit: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, as catalog ingestion would.
    pub fn insert(&self, record: ComponentRecord) {
        self.records
            .lock()
            .expect("catalog lock poisoned")
            .insert(record.id.clone(), record);
    }

    /// Make the next `commit_offers` fail with a retryable error.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn record(&self, id: &ComponentId) -> Option<ComponentRecord> {
        self.records
            .lock()
            .expect("catalog lock poisoned")
            .get(id)
            .cloned()
    }
}

impl CatalogStore for MemoryCatalog {
    fn get(&self, id: &ComponentId) -> Result<Option<ComponentRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("catalog lock poisoned")
            .get(id)
            .cloned())
    }

    fn commit_offers(
        &self,
        id: &ComponentId,
        book: &OfferBook,
        activated: bool,
    ) -> Result<(), StoreError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::retryable("catalog commit", "injected failure"));
        }
        let mut records = self.records.lock().expect("catalog lock poisoned");
        let Some(record) = records.get_mut(id) else {
            return Err(StoreError::permanent("catalog commit", "unknown component"));
        };
        record.offers = book.clone();
        record.activated = activated;
        Ok(())
    }
}

/// In-memory append-only snapshot ledger.
#[derive(Default)]
pub struct MemoryHistory {
    snapshots: Mutex<Vec<HistoricSnapshot>>,
    fail_next_append: AtomicBool,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `append` fail with a retryable error.
    pub fn fail_next_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }

    pub fn snapshots(&self) -> Vec<HistoricSnapshot> {
        self.snapshots.lock().expect("history lock poisoned").clone()
    }

    pub fn snapshots_for(&self, id: &ComponentId) -> Vec<HistoricSnapshot> {
        self.snapshots()
            .into_iter()
            .filter(|snapshot| &snapshot.component_id == id)
            .collect()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&self, snapshot: &HistoricSnapshot) -> Result<(), StoreError> {
        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err(StoreError::retryable("history append", "injected failure"));
        }
        self.snapshots
            .lock()
            .expect("history lock poisoned")
            .push(snapshot.clone());
        Ok(())
    }
}

/// In-memory votes collection.
#[derive(Default)]
pub struct MemoryVotes {
    votes: Mutex<Vec<VoteRecord>>,
}

impl MemoryVotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, vote: VoteRecord) {
        self.votes.lock().expect("votes lock poisoned").push(vote);
    }
}

impl VoteStore for MemoryVotes {
    fn tally(
        &self,
        related: &str,
        related_id: &ComponentId,
    ) -> Result<BTreeMap<String, u64>, StoreError> {
        let votes = self.votes.lock().expect("votes lock poisoned");
        let mut tally = BTreeMap::new();
        for vote in votes.iter() {
            if vote.removed || vote.related != related || &vote.related_id != related_id {
                continue;
            }
            *tally.entry(vote.kind.clone()).or_insert(0) += 1;
        }
        Ok(tally)
    }
}

/// In-memory search index.
pub struct MemoryIndex {
    docs: Mutex<BTreeMap<String, IndexDocument>>,
    fail_remaining: AtomicU32,
    fail_permanently: AtomicBool,
    attempts: AtomicU64,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
            fail_remaining: AtomicU32::new(0),
            fail_permanently: AtomicBool::new(false),
            attempts: AtomicU64::new(0),
        }
    }
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` upserts with retryable errors.
    pub fn fail_next_upserts(&self, n: u32) {
        self.fail_permanently.store(false, Ordering::SeqCst);
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` upserts with permanent errors.
    pub fn fail_next_upserts_permanent(&self, n: u32) {
        self.fail_permanently.store(true, Ordering::SeqCst);
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    pub fn doc(&self, object_id: &str) -> Option<IndexDocument> {
        self.docs
            .lock()
            .expect("index lock poisoned")
            .get(object_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().expect("index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total upsert attempts, including failed ones.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl SearchIndex for MemoryIndex {
    fn upsert(&self, doc: &IndexDocument) -> Result<(), IndexError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            if self.fail_permanently.load(Ordering::SeqCst) {
                return Err(IndexError::permanent(&doc.object_id, "injected failure"));
            }
            return Err(IndexError::retryable(&doc.object_id, "injected failure"));
        }
        self.docs
            .lock()
            .expect("index lock poisoned")
            .insert(doc.object_id.clone(), doc.clone());
        Ok(())
    }
}
