//! Denormalized search index projection.

mod worker;

pub use worker::IndexSyncHandle;

use serde::{Deserialize, Serialize};

use crate::core::{ComponentRecord, VendorKey};

/// Document pushed to the external search index, keyed by `objectID`.
///
/// The price/priority/stock trio is present only when the preferred vendor
/// currently carries an offer; absent fields are omitted, not zeroed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub name: String,
    pub full_name: String,
    pub part_number: String,
    pub slug: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub activated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl IndexDocument {
    /// Project a committed record into its index shape.
    pub fn derive(record: &ComponentRecord, preferred: &VendorKey) -> Self {
        let offer = record.vendor(preferred);
        Self {
            object_id: record.id.to_string(),
            name: record.name.clone(),
            full_name: record.display_name().to_string(),
            part_number: record.part_number.clone(),
            slug: record.slug.clone(),
            image: record.primary_image().to_string(),
            kind: record.kind.clone(),
            activated: record.activated,
            price: offer.map(|o| o.price),
            priority: offer.map(|o| o.priority),
            stock: offer.map(|o| o.stock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ComponentId, VendorOffer};

    fn preferred() -> VendorKey {
        VendorKey::parse("spartangeek").unwrap()
    }

    fn record() -> ComponentRecord {
        let mut rec =
            ComponentRecord::new(ComponentId::parse("comp-1").unwrap(), "RTX 4090");
        rec.part_number = "NV-4090-FE".to_string();
        rec.slug = "rtx-4090".to_string();
        rec.kind = "gpu".to_string();
        rec
    }

    #[test]
    fn full_name_falls_back_to_name() {
        let rec = record();
        let doc = IndexDocument::derive(&rec, &preferred());
        assert_eq!(doc.full_name, "RTX 4090");
    }

    #[test]
    fn preferred_vendor_populates_the_trio() {
        let mut rec = record();
        rec.offers.vendors.insert(
            preferred(),
            VendorOffer {
                price: 1599.99,
                stock: 4,
                priority: 1,
            },
        );
        rec.activated = true;

        let doc = IndexDocument::derive(&rec, &preferred());
        assert_eq!(doc.price, Some(1599.99));
        assert_eq!(doc.priority, Some(1));
        assert_eq!(doc.stock, Some(4));
    }

    #[test]
    fn missing_preferred_vendor_omits_fields_on_the_wire() {
        let mut rec = record();
        rec.offers.vendors.insert(
            VendorKey::parse("newegg").unwrap(),
            VendorOffer {
                price: 1650.0,
                stock: 9,
                priority: 2,
            },
        );
        rec.activated = true;

        let doc = IndexDocument::derive(&rec, &preferred());
        assert_eq!(doc.price, None);

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("price").is_none());
        assert!(json.get("priority").is_none());
        assert!(json.get("stock").is_none());
        assert_eq!(json["objectID"], "comp-1");
        assert_eq!(json["type"], "gpu");
    }

    #[test]
    fn first_image_becomes_the_thumbnail() {
        let mut rec = record();
        rec.images = vec!["front.jpg".into(), "back.jpg".into()];
        let doc = IndexDocument::derive(&rec, &preferred());
        assert_eq!(doc.image, "front.jpg");
    }
}
