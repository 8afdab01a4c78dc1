//! HTTP API application wiring (Axum router + engine wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per dashboard area)
//! - `dto.rs`: request DTOs and path/query parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use pirs_engine::InventoryEngine;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(engine: Arc<InventoryEngine>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_requests))
                .layer(Extension(engine)),
        )
}
