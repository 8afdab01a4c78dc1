//! Inventory domain module.
//!
//! [`ProductStore`] is the single owner of product data and the only mutation
//! gateway. It keeps three derived, non-owning views in lock-step with itself:
//!
//! - [`StabilityIndex`]: AVL tree ordered by `(days_remaining, sku)`
//! - [`PriorityHeap`]: indexed min-heap for the single most urgent product
//! - [`AuditRing`]: circular list with a persistent cursor for audit rotation
//!
//! Everything here is deterministic in-memory logic (no IO, no locking). The
//! engine crate adds the concurrency discipline on top.

pub mod audit;
pub mod forecast;
pub mod priority;
pub mod product;
pub mod stability;
pub mod store;

pub use audit::AuditRing;
pub use forecast::{BurnRate, DaysRemaining, SaleRecord, SalesHistory};
pub use priority::PriorityHeap;
pub use product::{NewProduct, Product, ProductChange, ProductSnapshot, UrgencyKey};
pub use stability::{Ascending, StabilityIndex};
pub use store::ProductStore;
