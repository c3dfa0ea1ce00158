//! Append-only historic archiver.

use std::sync::Arc;

use crate::core::{ComponentId, HistoricSnapshot, OfferBook};
use crate::metrics;
use crate::store::HistoryStore;

use super::ops::OpError;

/// Writes the audit trail for offer-book transitions.
///
/// Snapshots are pure appends: no read-modify-write, so concurrent writers
/// on different components never conflict.
#[derive(Clone)]
pub struct HistoricArchiver {
    history: Arc<dyn HistoryStore>,
}

impl HistoricArchiver {
    pub fn new(history: Arc<dyn HistoryStore>) -> Self {
        Self { history }
    }

    /// Archive an offer book as it exists immediately before a change.
    ///
    /// Failure is fatal to the enclosing operation: a state change whose
    /// audit trail cannot be written must not proceed.
    pub fn snapshot(
        &self,
        id: &ComponentId,
        offers: &OfferBook,
    ) -> Result<HistoricSnapshot, OpError> {
        let snapshot = HistoricSnapshot::capture(id.clone(), offers.clone());
        self.history.append(&snapshot)?;
        metrics::snapshot_appended();
        tracing::debug!(component = %id, vendors = offers.len(), "offer book archived");
        Ok(snapshot)
    }
}
