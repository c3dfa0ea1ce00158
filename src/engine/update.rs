//! Price update engine.
//!
//! Validates incoming vendor deltas, archives prior state, commits staged
//! offer books, and kicks the background index sync.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::core::{ComponentId, ComponentRecord, OfferBook, VendorKey, WallClock};
use crate::index::IndexSyncHandle;
use crate::metrics;
use crate::store::{CatalogStore, HistoryStore};

use super::archiver::HistoricArchiver;
use super::ops::{DeleteReceipt, OpError, UpdateReceipt, VendorDelta};

/// Mutation surface for a component's commercial state.
///
/// One call is the unit of atomicity: the staged offer book is committed
/// wholesale or not at all. Calls on the same component serialize through a
/// per-component lock, so snapshot order matches commit order; calls on
/// different components never contend.
pub struct PriceUpdateEngine {
    catalog: Arc<dyn CatalogStore>,
    archiver: HistoricArchiver,
    sync: IndexSyncHandle,
    locks: ComponentLocks,
}

impl PriceUpdateEngine {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        history: Arc<dyn HistoryStore>,
        sync: IndexSyncHandle,
    ) -> Self {
        Self {
            catalog,
            archiver: HistoricArchiver::new(history),
            sync,
            locks: ComponentLocks::default(),
        }
    }

    /// Apply per-vendor price/stock/priority deltas.
    ///
    /// Malformed vendor entries are dropped and reported in the receipt;
    /// they never fail the batch. An empty or fully-rejected batch is a
    /// no-op success. On success the new book is durably committed before
    /// this returns; index propagation happens out of band.
    pub fn update_price(
        &self,
        id: &ComponentId,
        deltas: &BTreeMap<VendorKey, VendorDelta>,
    ) -> Result<UpdateReceipt, OpError> {
        if deltas.is_empty() {
            return Ok(UpdateReceipt::default());
        }

        let slot = self.locks.slot(id);
        let _guard = slot.lock().expect("component lock poisoned");

        let start = Instant::now();
        let outcome = self.apply_update(id, deltas);
        match &outcome {
            Ok(receipt) if receipt.committed => metrics::price_update_ok(start.elapsed()),
            Ok(_) => {}
            Err(_) => metrics::price_update_err(start.elapsed()),
        }
        outcome
    }

    fn apply_update(
        &self,
        id: &ComponentId,
        deltas: &BTreeMap<VendorKey, VendorDelta>,
    ) -> Result<UpdateReceipt, OpError> {
        let mut record = self.require(id)?;
        let mut receipt = UpdateReceipt::default();

        // Stage into a fresh map; the prior book stays untouched until the
        // single commit below.
        let mut staged = record.offers.vendors.clone();
        for (key, delta) in deltas {
            match delta.validate() {
                Ok(offer) => {
                    staged.insert(key.clone(), offer);
                    receipt.applied.push(key.clone());
                }
                Err(rejection) => {
                    tracing::debug!(
                        component = %id,
                        vendor = %key,
                        %rejection,
                        "vendor delta dropped"
                    );
                    receipt.skipped.push((key.clone(), rejection));
                }
            }
        }

        if receipt.applied.is_empty() {
            // Nothing staged: leave canonical state untouched.
            return Ok(receipt);
        }

        if !record.offers.is_empty() {
            self.archiver.snapshot(id, &record.offers)?;
            receipt.archived = true;
        }

        let book = OfferBook {
            updated_at: Some(WallClock::now()),
            vendors: staged,
        };
        self.catalog.commit_offers(id, &book, true)?;
        receipt.committed = true;

        record.offers = book;
        record.activated = true;
        tracing::info!(
            component = %id,
            applied = receipt.applied.len(),
            skipped = receipt.skipped.len(),
            archived = receipt.archived,
            "price update committed"
        );
        self.schedule_sync(record);
        Ok(receipt)
    }

    /// Clear a component's offer book and deactivate it.
    ///
    /// Idempotent: deleting an already-empty book archives nothing and
    /// commits nothing, but still queues an index sync so the projection
    /// converges on `activated = false`.
    pub fn delete_price(&self, id: &ComponentId) -> Result<DeleteReceipt, OpError> {
        let slot = self.locks.slot(id);
        let _guard = slot.lock().expect("component lock poisoned");

        let start = Instant::now();
        let outcome = self.apply_delete(id);
        match &outcome {
            Ok(_) => metrics::price_delete_ok(start.elapsed()),
            Err(_) => metrics::price_delete_err(start.elapsed()),
        }
        outcome
    }

    fn apply_delete(&self, id: &ComponentId) -> Result<DeleteReceipt, OpError> {
        let mut record = self.require(id)?;
        let mut receipt = DeleteReceipt {
            archived: false,
            cleared: record.offers.len(),
        };

        if !record.offers.is_empty() {
            self.archiver.snapshot(id, &record.offers)?;
            receipt.archived = true;

            let book = OfferBook {
                updated_at: Some(WallClock::now()),
                vendors: BTreeMap::new(),
            };
            self.catalog.commit_offers(id, &book, false)?;
            record.offers = book;
            tracing::info!(component = %id, cleared = receipt.cleared, "price deleted");
        }

        record.activated = false;
        self.schedule_sync(record);
        Ok(receipt)
    }

    /// The index sync handle, exposed for shutdown and tests.
    pub fn index_sync(&self) -> &IndexSyncHandle {
        &self.sync
    }

    fn require(&self, id: &ComponentId) -> Result<ComponentRecord, OpError> {
        self.catalog
            .get(id)?
            .ok_or_else(|| OpError::NotFound(id.clone()))
    }

    fn schedule_sync(&self, record: ComponentRecord) {
        let id = record.id.clone();
        if self.sync.enqueue(record).is_err() {
            // Worker gone; the projection lags until the next commit.
            tracing::warn!(component = %id, "index sync worker unavailable");
            metrics::index_sync_enqueue_failed();
        }
    }
}

/// Per-component lock table.
///
/// Slots are created on first touch and kept for the engine's lifetime;
/// the table is bounded by the number of distinct components written.
#[derive(Default)]
struct ComponentLocks {
    slots: Mutex<HashMap<ComponentId, Arc<Mutex<()>>>>,
}

impl ComponentLocks {
    fn slot(&self, id: &ComponentId) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().expect("lock table poisoned");
        slots.entry(id.clone()).or_default().clone()
    }
}
