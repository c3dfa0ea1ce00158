#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod index;
pub mod metrics;
mod paths;
pub mod store;
pub mod telemetry;

pub use error::{Effect, Error, Transience};
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::core::{
    ComponentId, ComponentRecord, CoreError, HistoricSnapshot, OfferBook, VendorKey, VendorOffer,
    VoteAggregate, VoteRecord, WallClock,
};
pub use crate::engine::{
    DeleteReceipt, DeltaRejection, HistoricArchiver, OpError, PriceUpdateEngine, UpdateReceipt,
    VendorDelta, VoteAggregator,
};
pub use crate::index::{IndexDocument, IndexSyncHandle};
