//! Read-side vote aggregation.

use std::sync::Arc;

use crate::core::{ComponentId, VoteAggregate};
use crate::store::VoteStore;

use super::ops::OpError;

/// Summarizes a component's user votes by category.
///
/// Read-only and side-effect free; invoked independently of the write path.
#[derive(Clone)]
pub struct VoteAggregator {
    votes: Arc<dyn VoteStore>,
}

impl VoteAggregator {
    pub fn new(votes: Arc<dyn VoteStore>) -> Self {
        Self { votes }
    }

    /// Count non-removed votes for `(component, category)` by vote type.
    ///
    /// Known UI categories always carry their baseline keys, zero-filled,
    /// so consumers can index the result without presence checks.
    pub fn aggregate(
        &self,
        id: &ComponentId,
        category: &str,
    ) -> Result<VoteAggregate, OpError> {
        let tally = self.votes.tally(category, id)?;
        Ok(VoteAggregate::from_tally(category, tally))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OWNERSHIP_CATEGORY, PURCHASE_CATEGORY, VoteRecord};
    use crate::store::MemoryVotes;

    fn vote(id: &ComponentId, related: &str, kind: &str, removed: bool) -> VoteRecord {
        VoteRecord {
            related: related.to_string(),
            related_id: id.clone(),
            kind: kind.to_string(),
            removed,
        }
    }

    #[test]
    fn zero_votes_still_fill_ownership_baseline() {
        let votes = Arc::new(MemoryVotes::new());
        let aggregator = VoteAggregator::new(votes);
        let id = ComponentId::parse("comp-1").unwrap();

        let agg = aggregator.aggregate(&id, OWNERSHIP_CATEGORY).unwrap();
        let map = agg.to_map();
        assert_eq!(map["have-it"], 0);
        assert_eq!(map["had-it"], 0);
        assert_eq!(map["want-it"], 0);
        assert_eq!(map["total"], 0);
    }

    #[test]
    fn counts_group_by_type_and_skip_removed() {
        let votes = Arc::new(MemoryVotes::new());
        let id = ComponentId::parse("comp-1").unwrap();
        let other = ComponentId::parse("comp-2").unwrap();

        votes.add(vote(&id, OWNERSHIP_CATEGORY, "have-it", false));
        votes.add(vote(&id, OWNERSHIP_CATEGORY, "have-it", false));
        votes.add(vote(&id, OWNERSHIP_CATEGORY, "want-it", false));
        votes.add(vote(&id, OWNERSHIP_CATEGORY, "have-it", true));
        votes.add(vote(&id, PURCHASE_CATEGORY, "yes", false));
        votes.add(vote(&other, OWNERSHIP_CATEGORY, "have-it", false));

        let aggregator = VoteAggregator::new(votes);
        let agg = aggregator.aggregate(&id, OWNERSHIP_CATEGORY).unwrap();
        assert_eq!(agg.count("have-it"), 2);
        assert_eq!(agg.count("want-it"), 1);
        assert_eq!(agg.count("had-it"), 0);
        assert_eq!(agg.total, 3);
    }

    #[test]
    fn purchase_category_fills_its_own_baseline() {
        let votes = Arc::new(MemoryVotes::new());
        let id = ComponentId::parse("comp-1").unwrap();
        votes.add(vote(&id, PURCHASE_CATEGORY, "wow", false));

        let aggregator = VoteAggregator::new(votes);
        let agg = aggregator.aggregate(&id, PURCHASE_CATEGORY).unwrap();
        for key in ["no", "yes", "maybe", "wow"] {
            assert!(agg.counts.contains_key(key), "missing baseline key {key}");
        }
        assert_eq!(agg.total, 1);
    }
}
