use std::sync::Arc;

use axum::extract::Extension;

use pirs_engine::InventoryEngine;

use crate::app::errors;

/// Triage lanes, blocked orders and the pick list in one read.
pub async fn dashboard(Extension(engine): Extension<Arc<InventoryEngine>>) -> axum::response::Response {
    errors::respond(engine.shipping_dashboard())
}
