use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};

use pirs_engine::InventoryEngine;
use pirs_inventory::NewProduct;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product))
        .route("/:sku", axum::routing::get(get_product).delete(delete_product))
        .route("/:sku/stock", put(update_stock))
        .route("/:sku/consumption", put(set_consumption))
        .route("/:sku/sales", post(record_sales))
}

pub async fn create_product(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Json(body): Json<NewProduct>,
) -> axum::response::Response {
    errors::respond_with(StatusCode::CREATED, engine.add_product(body))
}

pub async fn get_product(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(sku): Path<String>,
) -> axum::response::Response {
    let sku = match dto::parse_sku(&sku) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.product(&sku))
}

pub async fn update_stock(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(sku): Path<String>,
    Json(body): Json<dto::UpdateStockRequest>,
) -> axum::response::Response {
    let sku = match dto::parse_sku(&sku) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.update_stock(&sku, body.quantity))
}

pub async fn set_consumption(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(sku): Path<String>,
    Json(body): Json<dto::SetConsumptionRequest>,
) -> axum::response::Response {
    let sku = match dto::parse_sku(&sku) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.set_consumption_rate(&sku, body.daily_consumption))
}

pub async fn record_sales(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(sku): Path<String>,
    Json(body): Json<dto::RecordSalesRequest>,
) -> axum::response::Response {
    let sku = match dto::parse_sku(&sku) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.record_sales(&sku, &body.sales, body.as_of))
}

pub async fn delete_product(
    Extension(engine): Extension<Arc<InventoryEngine>>,
    Path(sku): Path<String>,
) -> axum::response::Response {
    let sku = match dto::parse_sku(&sku) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    errors::respond(engine.delete_product(&sku))
}
