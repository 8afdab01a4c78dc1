//! `pirs-engine` — the single serialization domain over the product store and
//! the order pipeline.
//!
//! All state sits behind one readers-writer lock. Reads copy plain view DTOs
//! out of the lock (see [`views`]) so callers never hold it; writes run as one
//! atomic unit against both the store and the pipeline.

pub mod engine;
pub mod seed;
pub mod views;

pub use engine::InventoryEngine;
pub use views::{
    AuditEntry, InventoryRow, LotRecall, LotStatus, ShippingDashboard, Summary, TopPriority,
};
