//! Domain layer: identity atoms, time, offer state, history, votes.

mod component;
mod error;
mod history;
mod identity;
mod time;
mod votes;

pub use component::{ComponentRecord, OfferBook, VendorOffer};
pub use error::{CoreError, InvalidId};
pub use history::HistoricSnapshot;
pub use identity::{ComponentId, VendorKey};
pub use time::WallClock;
pub use votes::{
    OWNERSHIP_CATEGORY, PURCHASE_CATEGORY, TOTAL_KEY, VoteAggregate, VoteRecord, baseline_for,
};
