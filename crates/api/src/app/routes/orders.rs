use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use pirs_engine::InventoryEngine;
use pirs_fulfillment::NewOrder;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/enqueue", post(enqueue))
        .route("/history", get(history))
        .route("/:id", get(get_order))
        .route("/:id/dispatch", post(dispatch))
        .route("/:id/ship-available", post(ship_available))
        .route("/:id/block", post(block))
}

pub async fn enqueue(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Json(body): Json<NewOrder>,
) -> axum::response::Response {
    errors::respond_with(StatusCode::CREATED, engine.enqueue(body))
}

/// Every order with its current status, newest first.
pub async fn history(Extension(engine): Extension<Arc<InventoryEngine>>) -> axum::response::Response {
    errors::respond(engine.order_history())
}

pub async fn get_order(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.order(&id))
}

pub async fn dispatch(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.dispatch(&id))
}

pub async fn ship_available(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.ship_available(&id))
}

pub async fn block(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(id): Path<String>,
    Json(body): Json<dto::BlockOrderRequest>,
) -> axum::response::Response {
    let id = match dto::parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.block(&id, body.reason))
}
