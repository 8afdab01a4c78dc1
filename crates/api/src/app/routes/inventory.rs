use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    routing::{get, post},
    Json, Router,
};
use axum::response::IntoResponse;

use pirs_engine::InventoryEngine;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/stability", get(stability))
        .route("/critical", get(critical))
}

pub fn audit_router() -> Router {
    Router::new()
        .route("/next", get(audit_next))
        .route("/advance", post(audit_advance))
}

/// Every product, ascending by days remaining.
pub async fn stability(Extension(engine): Extension<Arc<InventoryEngine>>) -> axum::response::Response {
    errors::respond(engine.inventory())
}

pub async fn critical(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Query(q): Query<dto::CriticalQuery>,
) -> axum::response::Response {
    errors::respond(engine.critical(q.below))
}

pub async fn audit_next(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Query(q): Query<dto::AuditQuery>,
) -> axum::response::Response {
    errors::respond(engine.audit_sequence(q.count))
}

pub async fn audit_advance(
    Extension(engine): Extension<Arc<InventoryEngine>>,
) -> axum::response::Response {
    match engine.audit_advance() {
        Ok(pending) => Json(serde_json::json!({ "pending": pending })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
