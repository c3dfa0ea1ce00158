//! Canonical catalog component and its vendor-offer state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::identity::{ComponentId, VendorKey};
use super::time::WallClock;

/// One vendor's commercial terms for a component.
///
/// Absence of a vendor in the offer map is distinct from `price == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VendorOffer {
    pub price: f64,
    pub stock: u32,
    /// Display ranking for picking a preferred vendor; the ordering
    /// convention (lower-wins vs higher-wins) is fixed by the caller.
    pub priority: i32,
}

/// A component's live commercial state: vendor offers plus the timestamp of
/// the last commit. Serialized as the `store` sub-document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferBook {
    pub updated_at: Option<WallClock>,
    pub vendors: BTreeMap<VendorKey, VendorOffer>,
}

impl OfferBook {
    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }
}

/// Canonical catalog item.
///
/// Created by catalog ingestion with an empty offer book; mutated only
/// through the price update engine. Never hard-deleted (deactivation only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: ComponentId,
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Ordered image references; the first is the canonical thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    /// True iff at least one vendor offer currently exists.
    #[serde(default)]
    pub activated: bool,
    #[serde(rename = "store", default)]
    pub offers: OfferBook,
}

impl ComponentRecord {
    /// Fresh record as ingestion hands it over: no offers, deactivated.
    pub fn new(id: ComponentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            full_name: String::new(),
            part_number: String::new(),
            slug: String::new(),
            kind: String::new(),
            images: Vec::new(),
            activated: false,
            offers: OfferBook::default(),
        }
    }

    pub fn vendor(&self, key: &VendorKey) -> Option<&VendorOffer> {
        self.offers.vendors.get(key)
    }

    pub fn vendor_price(&self, key: &VendorKey) -> Option<f64> {
        self.vendor(key).map(|offer| offer.price)
    }

    /// Full name, falling back to the short name when empty.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }

    /// Canonical thumbnail, or empty when the component has no images.
    pub fn primary_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or("")
    }

    pub fn activation_consistent(&self) -> bool {
        self.activated == !self.offers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ComponentRecord {
        ComponentRecord::new(ComponentId::parse("comp-1").unwrap(), "RTX 4090")
    }

    #[test]
    fn display_name_falls_back_to_name() {
        let mut rec = record();
        assert_eq!(rec.display_name(), "RTX 4090");
        rec.full_name = "NVIDIA GeForce RTX 4090".to_string();
        assert_eq!(rec.display_name(), "NVIDIA GeForce RTX 4090");
    }

    #[test]
    fn primary_image_is_first_or_empty() {
        let mut rec = record();
        assert_eq!(rec.primary_image(), "");
        rec.images = vec!["a.jpg".into(), "b.jpg".into()];
        assert_eq!(rec.primary_image(), "a.jpg");
    }

    #[test]
    fn fresh_record_is_consistent_and_deactivated() {
        let rec = record();
        assert!(!rec.activated);
        assert!(rec.activation_consistent());
    }

    #[test]
    fn wire_shape_uses_type_and_store_keys() {
        let mut rec = record();
        rec.offers.vendors.insert(
            VendorKey::parse("spartangeek").unwrap(),
            VendorOffer {
                price: 10.0,
                stock: 2,
                priority: 1,
            },
        );
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("store").unwrap().get("vendors").is_some());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn offer_book_roundtrips() {
        let mut book = OfferBook::default();
        book.updated_at = Some(WallClock(1_700_000_000_000));
        book.vendors.insert(
            VendorKey::parse("newegg").unwrap(),
            VendorOffer {
                price: 1599.99,
                stock: 4,
                priority: 2,
            },
        );
        let json = serde_json::to_string(&book).unwrap();
        let parsed: OfferBook = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, book);
    }
}
