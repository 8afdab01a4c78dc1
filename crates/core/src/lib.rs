//! `pirs-core` — shared building blocks for the inventory engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model and engine tunables.

pub mod config;
pub mod entity;
pub mod error;
pub mod id;

pub use config::EngineConfig;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{LotId, OrderId, Sku};
