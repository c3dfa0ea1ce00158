//! User vote records and their aggregation shape.
//!
//! The votes collection is a read-only dependency: this crate counts it,
//! never writes it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::identity::ComponentId;

/// Ownership votes against a component ("do you have this part?").
pub const OWNERSHIP_CATEGORY: &str = "component";

/// Purchase-intent votes against a component ("would you buy it?").
pub const PURCHASE_CATEGORY: &str = "component-buy";

/// Key under which the grand total is reported in the wire map.
pub const TOTAL_KEY: &str = "total";

const OWNERSHIP_BASELINE: [&str; 3] = ["have-it", "had-it", "want-it"];
const PURCHASE_BASELINE: [&str; 4] = ["no", "yes", "maybe", "wow"];

/// Vote-type keys that must always be present (zero-filled) in aggregation
/// output for the given category. Unknown categories have no baseline.
pub fn baseline_for(category: &str) -> &'static [&'static str] {
    match category {
        OWNERSHIP_CATEGORY => &OWNERSHIP_BASELINE,
        PURCHASE_CATEGORY => &PURCHASE_BASELINE,
        _ => &[],
    }
}

/// A single user vote as persisted by the community surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Vote category, e.g. `component` or `component-buy`.
    pub related: String,
    pub related_id: ComponentId,
    #[serde(rename = "type")]
    pub kind: String,
    /// Presence flag: a removed vote stays in the collection but is
    /// excluded from every tally.
    #[serde(default, skip_serializing_if = "is_false")]
    pub removed: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Summary counts of a component's votes, by vote type.
///
/// Derived fresh on every query; never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoteAggregate {
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
}

impl VoteAggregate {
    /// Build from grouped counts, applying the category's baseline fill.
    ///
    /// Baseline zeros never contribute to `total`.
    pub fn from_tally(category: &str, tally: BTreeMap<String, u64>) -> Self {
        let total = tally.values().sum();
        let mut counts = tally;
        for key in baseline_for(category) {
            counts.entry((*key).to_string()).or_insert(0);
        }
        Self { counts, total }
    }

    pub fn count(&self, kind: &str) -> u64 {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    /// Wire shape: the count map plus a `total` key.
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        let mut map = self.counts.clone();
        map.insert(TOTAL_KEY.to_string(), self.total);
        map
    }
}
