//! Catalog mutation engine and read-side vote aggregation.

mod archiver;
mod ops;
mod update;
mod votes;

pub use archiver::HistoricArchiver;
pub use ops::{DeleteReceipt, DeltaRejection, OpError, UpdateReceipt, VendorDelta};
pub use update::PriceUpdateEngine;
pub use votes::VoteAggregator;
