//! Point-in-time read views handed to callers.
//!
//! Each view is an owned copy, built while the read lock is held and returned
//! after it is released.

use serde::Serialize;

use pirs_core::{LotId, OrderId, Sku};
use pirs_fulfillment::{Order, PickListLine, Triage, TriagedOrder};
use pirs_inventory::Product;

/// Dashboard header counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_sku_count: usize,
    /// Products below the critical threshold.
    pub critical_count: usize,
    pub queue_depth: usize,
    pub blocked_count: usize,
}

/// The most urgent product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPriority {
    pub sku: Sku,
    pub name: String,
    pub stock: i64,
    pub days_remaining: f64,
}

impl From<&Product> for TopPriority {
    fn from(p: &Product) -> Self {
        Self {
            sku: p.sku().clone(),
            name: p.name().to_string(),
            stock: p.stock(),
            days_remaining: p.days_remaining().value(),
        }
    }
}

/// One row of the stability-ordered inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub sku: Sku,
    pub name: String,
    /// Smallest currency unit.
    pub unit_price: u64,
    pub stock: i64,
    pub days_remaining: f64,
    pub stability_score: f64,
    pub needs_reorder: bool,
}

impl From<&Product> for InventoryRow {
    fn from(p: &Product) -> Self {
        Self {
            sku: p.sku().clone(),
            name: p.name().to_string(),
            unit_price: p.unit_price(),
            stock: p.stock(),
            days_remaining: p.days_remaining().value(),
            stability_score: p.stability_score(),
            needs_reorder: p.needs_reorder(),
        }
    }
}

/// One stop on the audit route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub sku: Sku,
    pub name: String,
    pub stock: i64,
    /// True only for the entry under the cursor.
    pub pending: bool,
}

/// Triage lanes, blocked orders and the aggregated pick list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingDashboard {
    pub express: Vec<TriagedOrder>,
    pub shortage: Vec<TriagedOrder>,
    pub standard: Vec<TriagedOrder>,
    pub blocked: Vec<Order>,
    pub pick_list: Vec<PickListLine>,
}

impl ShippingDashboard {
    pub(crate) fn new(lanes: Triage, blocked: Vec<Order>, pick_list: Vec<PickListLine>) -> Self {
        Self {
            express: lanes.express,
            shortage: lanes.shortage,
            standard: lanes.standard,
            blocked,
            pick_list,
        }
    }
}

/// Result of stopping a lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotRecall {
    pub lot_id: LotId,
    /// Queued orders moved to `BLOCKED`, in queue order.
    pub blocked_orders: Vec<OrderId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotStatus {
    pub lot_id: LotId,
    pub safe: bool,
}
