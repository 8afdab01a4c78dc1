use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pirs_core::{DomainError, DomainResult, Entity, LotId, OrderId, Sku};

/// Customer tier. Displayed on the dashboard; it does not change triage lanes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    #[default]
    Standard,
    Vip,
    Premium,
}

/// Order status lifecycle.
///
/// `Pending → PartiallyShipped → Shipped`, with `Blocked` reachable from either
/// non-terminal state. `Shipped` and `Blocked` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    PartiallyShipped,
    Shipped,
    Blocked,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Blocked)
    }
}

/// Input for enqueuing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Caller-supplied id; generated when absent.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub customer: String,
    pub sku: Sku,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub tier: CustomerTier,
    /// Lot the units are picked from, checked against the safety gate.
    #[serde(default)]
    pub lot_id: Option<LotId>,
}

fn default_quantity() -> i64 {
    1
}

/// A customer order against a single SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    order_id: OrderId,
    customer: String,
    sku: Sku,
    quantity: i64,
    shipped_quantity: i64,
    tier: CustomerTier,
    status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    lot_id: Option<LotId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocked_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl Order {
    pub(crate) fn open(input: NewOrder, created_at: DateTime<Utc>) -> DomainResult<Self> {
        let customer = input.customer.trim();
        if customer.is_empty() {
            return Err(DomainError::invalid("customer cannot be empty"));
        }
        if input.quantity <= 0 {
            return Err(DomainError::invalid(format!(
                "quantity must be positive (got {})",
                input.quantity
            )));
        }
        Ok(Self {
            order_id: input.order_id.unwrap_or_else(OrderId::generate),
            customer: customer.to_string(),
            sku: input.sku,
            quantity: input.quantity,
            shipped_quantity: 0,
            tier: input.tier,
            status: OrderStatus::Pending,
            lot_id: input.lot_id,
            blocked_reason: None,
            created_at,
        })
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn shipped_quantity(&self) -> i64 {
        self.shipped_quantity
    }

    /// Units still owed to the customer.
    pub fn outstanding(&self) -> i64 {
        self.quantity - self.shipped_quantity
    }

    pub fn tier(&self) -> CustomerTier {
        self.tier
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lot_id(&self) -> Option<&LotId> {
        self.lot_id.as_ref()
    }

    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Decide the status a shipment of `units` would produce, without mutating.
    pub(crate) fn plan_shipment(&self, units: i64) -> DomainResult<OrderStatus> {
        if self.is_terminal() {
            return Err(DomainError::not_found(format!(
                "order {} is already {:?}",
                self.order_id, self.status
            )));
        }
        if units <= 0 || units > self.outstanding() {
            return Err(DomainError::invalid(format!(
                "cannot ship {units} units against {} outstanding",
                self.outstanding()
            )));
        }
        if units == self.outstanding() {
            Ok(OrderStatus::Shipped)
        } else {
            Ok(OrderStatus::PartiallyShipped)
        }
    }

    /// Record a shipment previously validated by `plan_shipment`.
    pub(crate) fn apply_shipment(&mut self, units: i64, status: OrderStatus) {
        self.shipped_quantity += units;
        self.status = status;
    }

    pub(crate) fn block(&mut self, reason: String) -> DomainResult<()> {
        if self.is_terminal() {
            return Err(DomainError::not_found(format!(
                "order {} is already {:?}",
                self.order_id, self.status
            )));
        }
        self.status = OrderStatus::Blocked;
        self.blocked_reason = Some(reason);
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.order_id
    }
}
