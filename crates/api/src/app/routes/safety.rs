use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::get,
    Json, Router,
};

use pirs_engine::InventoryEngine;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/lots", get(list_blocked_lots).post(block_lot))
        .route("/lots/:lot_id", get(lot_status))
}

pub async fn list_blocked_lots(
    Extension(engine): Extension<Arc<InventoryEngine>>,
) -> axum::response::Response {
    errors::respond(engine.blocked_lots())
}

/// Block a lot; queued orders drawn from it are blocked in the same write.
pub async fn block_lot(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Json(body): Json<dto::BlockLotRequest>,
) -> axum::response::Response {
    errors::respond(engine.block_lot(body.lot_id))
}

pub async fn lot_status(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(lot_id): Path<String>,
) -> axum::response::Response {
    let lot_id = match dto::parse_lot_id(&lot_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.lot_status(&lot_id))
}
