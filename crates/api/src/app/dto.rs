use chrono::NaiveDate;
use serde::Deserialize;

use pirs_core::{LotId, OrderId, Sku};
use pirs_inventory::SaleRecord;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetConsumptionRequest {
    pub daily_consumption: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecordSalesRequest {
    pub sales: Vec<SaleRecord>,
    /// End of the trailing window; today (UTC) when absent.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct BlockOrderRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockLotRequest {
    pub lot_id: LotId,
}

#[derive(Debug, Default, Deserialize)]
pub struct CriticalQuery {
    pub below: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub count: Option<usize>,
}

// -------------------------
// Path parsing
// -------------------------

pub fn parse_sku(raw: &str) -> Result<Sku, axum::response::Response> {
    Sku::parse(raw).map_err(errors::domain_error_to_response)
}

pub fn parse_order_id(raw: &str) -> Result<OrderId, axum::response::Response> {
    OrderId::parse(raw).map_err(errors::domain_error_to_response)
}

pub fn parse_lot_id(raw: &str) -> Result<LotId, axum::response::Response> {
    LotId::parse(raw).map_err(errors::domain_error_to_response)
}
