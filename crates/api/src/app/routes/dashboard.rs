use std::sync::Arc;

use axum::extract::Extension;

use pirs_engine::InventoryEngine;

use crate::app::errors;

pub async fn summary(Extension(engine): Extension<Arc<InventoryEngine>>) -> axum::response::Response {
    errors::respond(engine.summary())
}

/// Most urgent product, or JSON `null` when the catalog is empty.
pub async fn top_priority(
    Extension(engine): Extension<Arc<InventoryEngine>>,
) -> axum::response::Response {
    errors::respond(engine.top_priority())
}
