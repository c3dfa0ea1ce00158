//! Engine operation inputs, receipts, and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ComponentId, VendorKey, VendorOffer};
use crate::error::{Effect, Transience};
use crate::store::StoreError;

/// Canonical error enum for engine operations.
///
/// Per-vendor input problems never appear here: a malformed vendor delta is
/// dropped from the batch and reported in the receipt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpError {
    #[error("component `{0}` not found")]
    NotFound(ComponentId),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl OpError {
    pub fn transience(&self) -> Transience {
        match self {
            OpError::NotFound(_) => Transience::Permanent,
            OpError::Persistence(err) => err.transience,
        }
    }

    pub fn effect(&self) -> Effect {
        match self {
            OpError::NotFound(_) => Effect::None,
            OpError::Persistence(err) => err.effect(),
        }
    }
}

/// Raw per-vendor delta as a feed or admin tool submits it.
///
/// All three fields are required for the vendor to be staged; anything less
/// drops that vendor from the batch, not the batch itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorDelta {
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub priority: Option<i32>,
}

impl VendorDelta {
    pub fn new(price: f64, stock: u32, priority: i32) -> Self {
        Self {
            price: Some(price),
            stock: Some(stock),
            priority: Some(priority),
        }
    }

    /// Validate into a staged offer.
    pub(crate) fn validate(&self) -> Result<VendorOffer, DeltaRejection> {
        let Some(price) = self.price else {
            return Err(DeltaRejection::MissingPrice);
        };
        let Some(stock) = self.stock else {
            return Err(DeltaRejection::MissingStock);
        };
        let Some(priority) = self.priority else {
            return Err(DeltaRejection::MissingPriority);
        };
        if !price.is_finite() || price < 0.0 {
            return Err(DeltaRejection::InvalidPrice { price });
        }
        Ok(VendorOffer {
            price,
            stock,
            priority,
        })
    }
}

/// Why a vendor delta was dropped from an update batch.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum DeltaRejection {
    #[error("price missing")]
    MissingPrice,
    #[error("stock missing")]
    MissingStock,
    #[error("priority missing")]
    MissingPriority,
    #[error("price {price} is negative or not finite")]
    InvalidPrice { price: f64 },
}

/// Outcome of `update_price`.
#[derive(Clone, Debug, Default)]
pub struct UpdateReceipt {
    /// Vendors staged and committed.
    pub applied: Vec<VendorKey>,
    /// Vendors dropped from the batch, with the reason.
    pub skipped: Vec<(VendorKey, DeltaRejection)>,
    /// Whether the prior offer book was archived.
    pub archived: bool,
    /// Whether a commit happened at all (false for no-op calls).
    pub committed: bool,
}

/// Outcome of `delete_price`.
#[derive(Clone, Debug, Default)]
pub struct DeleteReceipt {
    /// Whether the prior offer book was archived (false when it was
    /// already empty).
    pub archived: bool,
    /// Vendor offers removed by this call.
    pub cleared: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_delta_validates() {
        let offer = VendorDelta::new(10.5, 3, 1).validate().unwrap();
        assert_eq!(offer.price, 10.5);
        assert_eq!(offer.stock, 3);
        assert_eq!(offer.priority, 1);
    }

    #[test]
    fn missing_fields_reject_individually() {
        let mut delta = VendorDelta::new(10.0, 3, 1);
        delta.price = None;
        assert_eq!(delta.validate().unwrap_err(), DeltaRejection::MissingPrice);

        let mut delta = VendorDelta::new(10.0, 3, 1);
        delta.stock = None;
        assert_eq!(delta.validate().unwrap_err(), DeltaRejection::MissingStock);

        let mut delta = VendorDelta::new(10.0, 3, 1);
        delta.priority = None;
        assert_eq!(
            delta.validate().unwrap_err(),
            DeltaRejection::MissingPriority
        );
    }

    #[test]
    fn negative_and_non_finite_prices_reject() {
        assert!(matches!(
            VendorDelta::new(-0.01, 1, 1).validate(),
            Err(DeltaRejection::InvalidPrice { .. })
        ));
        assert!(matches!(
            VendorDelta::new(f64::NAN, 1, 1).validate(),
            Err(DeltaRejection::InvalidPrice { .. })
        ));
        // Zero is a legitimate price; absence of the vendor is the thing
        // that is distinct from it.
        assert!(VendorDelta::new(0.0, 0, 0).validate().is_ok());
    }

    #[test]
    fn partial_delta_deserializes_with_missing_fields() {
        let delta: VendorDelta = serde_json::from_str(r#"{"price": 9.99}"#).unwrap();
        assert_eq!(delta.price, Some(9.99));
        assert_eq!(delta.stock, None);
        assert_eq!(delta.validate().unwrap_err(), DeltaRejection::MissingStock);
    }
}
