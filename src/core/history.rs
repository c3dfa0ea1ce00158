//! Historic snapshots of vendor-offer state.

use serde::{Deserialize, Serialize};

use super::component::OfferBook;
use super::identity::ComponentId;
use super::time::WallClock;

/// Immutable archival copy of a component's offer book as it existed
/// immediately before a change.
///
/// Append-only: the engine owns creation; nothing in this crate mutates or
/// deletes a snapshot once written. `component_id` is a lookup reference,
/// not ownership.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricSnapshot {
    pub component_id: ComponentId,
    #[serde(rename = "store")]
    pub offers: OfferBook,
    pub created_at: WallClock,
}

impl HistoricSnapshot {
    /// Capture the given offer book with `created_at = now`.
    pub fn capture(component_id: ComponentId, offers: OfferBook) -> Self {
        Self {
            component_id,
            offers,
            created_at: WallClock::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{VendorKey, VendorOffer};

    #[test]
    fn wire_shape_uses_store_key() {
        let mut offers = OfferBook::default();
        offers.vendors.insert(
            VendorKey::parse("spartangeek").unwrap(),
            VendorOffer {
                price: 10.0,
                stock: 2,
                priority: 1,
            },
        );
        let snapshot =
            HistoricSnapshot::capture(ComponentId::parse("comp-1").unwrap(), offers.clone());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("store").is_some());
        assert!(json.get("component_id").is_some());
        assert!(json.get("created_at").is_some());
        assert_eq!(snapshot.offers, offers);
    }
}
