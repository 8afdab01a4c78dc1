//! Order pipeline: FIFO queue, triage and dispatch.
//!
//! Triage lanes are computed views over the queue and live stock; they are
//! never stored, so they cannot drift from the product store.

use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::Utc;
use serde::Serialize;

use pirs_core::{DomainError, DomainResult, EngineConfig, Entity, LotId, OrderId, Sku};
use pirs_inventory::{ProductChange, ProductStore};

use crate::order::{NewOrder, Order, OrderStatus};
use crate::safety::SafetyGate;

/// Triage lane of a non-terminal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    /// Urgent product and enough stock to ship now.
    Express,
    /// Not enough stock for the outstanding quantity.
    Shortage,
    Standard,
}

/// A queued order annotated with live stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriagedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub lane: Lane,
    /// `"Unknown Product"` when the product has been deleted.
    pub item_name: String,
    /// Order value at the current unit price, in minor units.
    pub total_amount: u64,
    pub current_stock: i64,
    /// `None` when the product has been deleted since the order was queued.
    pub days_remaining: Option<f64>,
    pub stock_available: bool,
}

/// The three disjoint lanes, each in FIFO order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Triage {
    pub express: Vec<TriagedOrder>,
    pub shortage: Vec<TriagedOrder>,
    pub standard: Vec<TriagedOrder>,
}

impl Triage {
    pub fn len(&self) -> usize {
        self.express.len() + self.shortage.len() + self.standard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a dispatch or partial ship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
    pub order_id: OrderId,
    pub sku: Sku,
    pub shipped_quantity: i64,
    pub remaining_quantity: i64,
    pub status: OrderStatus,
    pub product: ProductChange,
}

/// One line of the aggregated pick list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickListLine {
    pub sku: Sku,
    pub name: String,
    pub quantity: i64,
    pub order_count: usize,
}

#[derive(Debug)]
pub struct OrderPipeline {
    orders: HashMap<OrderId, Order>,
    /// Non-terminal orders, oldest first.
    queue: VecDeque<OrderId>,
    /// Every order ever enqueued, oldest first.
    history: Vec<OrderId>,
    safety: SafetyGate,
    express_threshold_days: f64,
}

impl Default for OrderPipeline {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl OrderPipeline {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            orders: HashMap::new(),
            queue: VecDeque::new(),
            history: Vec::new(),
            safety: SafetyGate::new(),
            express_threshold_days: config.express_threshold_days,
        }
    }

    /// Number of orders awaiting dispatch.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn blocked_count(&self) -> usize {
        self.orders
            .values()
            .filter(|o| o.status() == OrderStatus::Blocked)
            .count()
    }

    pub fn get(&self, order_id: &OrderId) -> DomainResult<&Order> {
        self.orders
            .get(order_id)
            .ok_or_else(|| DomainError::not_found(format!("order {order_id}")))
    }

    /// Validate and append an order to the back of the queue.
    ///
    /// An order naming a blocked lot is recorded but goes straight to
    /// `Blocked` instead of the queue.
    pub fn enqueue(&mut self, store: &ProductStore, input: NewOrder) -> DomainResult<Order> {
        if !store.contains(&input.sku) {
            tracing::warn!(sku = %input.sku, "rejecting order for unknown sku");
            return Err(DomainError::not_found(format!("sku {}", input.sku)));
        }
        if let Some(id) = &input.order_id {
            if self.orders.contains_key(id) {
                return Err(DomainError::duplicate(format!("order {id}")));
            }
        }

        let mut order = Order::open(input, Utc::now())?;
        let id = order.id().clone();
        if self.orders.contains_key(&id) {
            return Err(DomainError::duplicate(format!("order {id}")));
        }

        if let Some(lot) = order.lot_id().filter(|l| !self.safety.is_lot_safe(l)).cloned() {
            order.block(lot_reason(&lot))?;
            tracing::warn!(order_id = %id, lot_id = %lot, "order names a blocked lot");
            self.history.push(id.clone());
            self.orders.insert(id, order.clone());
            return Ok(order);
        }

        tracing::info!(
            order_id = %id,
            sku = %order.sku(),
            quantity = order.quantity(),
            tier = ?order.tier(),
            "order enqueued"
        );
        self.queue.push_back(id.clone());
        self.history.push(id.clone());
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    /// Queued orders, oldest first.
    pub fn queued(&self) -> impl Iterator<Item = &Order> {
        self.queue.iter().filter_map(|id| self.orders.get(id))
    }

    /// Every order with its current status, newest first.
    pub fn history(&self) -> impl Iterator<Item = &Order> {
        self.history.iter().rev().filter_map(|id| self.orders.get(id))
    }

    pub fn blocked(&self) -> impl Iterator<Item = &Order> {
        self.history
            .iter()
            .filter_map(|id| self.orders.get(id))
            .filter(|o| o.status() == OrderStatus::Blocked)
    }

    /// Lane an order with `outstanding` units would fall in.
    pub fn classify(&self, outstanding: i64, stock: i64, days_remaining: f64) -> Lane {
        if stock < outstanding {
            Lane::Shortage
        } else if days_remaining < self.express_threshold_days {
            Lane::Express
        } else {
            Lane::Standard
        }
    }

    /// Classify every queued order against live stock. Pure: nothing is stored.
    pub fn triage(&self, store: &ProductStore) -> Triage {
        let mut lanes = Triage::default();
        for order in self.queued() {
            let triaged = self.annotate(store, order);
            match triaged.lane {
                Lane::Express => lanes.express.push(triaged),
                Lane::Shortage => lanes.shortage.push(triaged),
                Lane::Standard => lanes.standard.push(triaged),
            }
        }
        lanes
    }

    fn annotate(&self, store: &ProductStore, order: &Order) -> TriagedOrder {
        let (name, unit_price, stock, days) = match store.get(order.sku()) {
            Ok(p) => (
                p.name().to_string(),
                p.unit_price(),
                p.stock(),
                Some(p.days_remaining().value()),
            ),
            Err(_) => ("Unknown Product".to_string(), 0, 0, None),
        };
        let units = u64::try_from(order.quantity()).unwrap_or(0);
        let lane = match days {
            Some(d) => self.classify(order.outstanding(), stock, d),
            None => Lane::Shortage,
        };
        TriagedOrder {
            order: order.clone(),
            lane,
            item_name: name,
            total_amount: unit_price.saturating_mul(units),
            current_stock: stock,
            days_remaining: days,
            stock_available: lane != Lane::Shortage,
        }
    }

    /// Ship the full outstanding quantity.
    ///
    /// Fails with `NotFound` for unknown or terminal orders and with
    /// `InsufficientStock` when stock does not cover the order (it belongs in
    /// the Shortage lane; see [`OrderPipeline::ship_available`]).
    pub fn dispatch(&mut self, store: &mut ProductStore, order_id: &OrderId) -> DomainResult<Shipment> {
        let order = self.open_order(order_id)?;
        let units = order.outstanding();
        let available = store.get(order.sku())?.stock();
        if available < units {
            tracing::warn!(order_id = %order_id, units, available, "dispatch refused");
            return Err(DomainError::insufficient(order.sku().as_str(), units, available));
        }
        self.ship(store, order_id, units)
    }

    /// Ship whatever stock is on hand, up to the outstanding quantity.
    ///
    /// A partial shipment leaves the order `PartiallyShipped` and queued so the
    /// remainder can be dispatched later.
    pub fn ship_available(
        &mut self,
        store: &mut ProductStore,
        order_id: &OrderId,
    ) -> DomainResult<Shipment> {
        let order = self.open_order(order_id)?;
        let outstanding = order.outstanding();
        let available = store.get(order.sku())?.stock();
        let units = available.min(outstanding);
        if units <= 0 {
            return Err(DomainError::insufficient(order.sku().as_str(), outstanding, available));
        }
        self.ship(store, order_id, units)
    }

    fn ship(&mut self, store: &mut ProductStore, order_id: &OrderId, units: i64) -> DomainResult<Shipment> {
        let order = self.open_order(order_id)?;
        let status = order.plan_shipment(units)?;
        let sku = order.sku().clone();
        let stock = store.get(&sku)?.stock();

        // The store write is the only fallible step left; the order transition
        // was validated above and is applied only once stock has moved.
        let product = store.update_stock(&sku, stock - units)?;

        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::inconsistency(format!("order {order_id} vanished mid-dispatch")))?;
        order.apply_shipment(units, status);
        let remaining = order.outstanding();
        if status.is_terminal() {
            self.queue.retain(|id| id != order_id);
        }

        tracing::info!(
            order_id = %order_id,
            sku = %sku,
            shipped = units,
            remaining,
            stock_after = product.current.stock,
            status = ?status,
            "order shipped"
        );
        Ok(Shipment {
            order_id: order_id.clone(),
            sku,
            shipped_quantity: units,
            remaining_quantity: remaining,
            status,
            product,
        })
    }

    /// Stop an order from shipping (recall, expired lot, manual hold).
    pub fn block(&mut self, order_id: &OrderId, reason: impl Into<String>) -> DomainResult<Order> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::not_found(format!("order {order_id}")))?;
        let reason = reason.into();
        order.block(reason.clone())?;
        let blocked = order.clone();
        self.queue.retain(|id| id != order_id);
        tracing::info!(order_id = %order_id, reason = %reason, "order blocked");
        Ok(blocked)
    }

    /// Stop a lot from shipping. Every queued order drawing from it is blocked
    /// with the lot as the reason; their ids are returned in queue order.
    pub fn block_lot(&mut self, lot: LotId) -> Vec<OrderId> {
        let newly_listed = self.safety.block_lot(lot.clone());

        let affected: Vec<OrderId> = self
            .queued()
            .filter(|o| o.lot_id() == Some(&lot))
            .map(|o| o.order_id().clone())
            .collect();
        for id in &affected {
            if let Some(order) = self.orders.get_mut(id) {
                // Queued orders are never terminal, so this cannot fail.
                let _ = order.block(lot_reason(&lot));
            }
        }
        self.queue.retain(|id| !affected.contains(id));

        tracing::info!(
            lot_id = %lot,
            newly_listed,
            blocked_orders = affected.len(),
            "lot blocked"
        );
        affected
    }

    pub fn is_lot_safe(&self, lot: &LotId) -> bool {
        self.safety.is_lot_safe(lot)
    }

    pub fn blocked_lots(&self) -> Vec<LotId> {
        self.safety.blocked_lots()
    }

    /// Outstanding units per SKU across the queue, largest first.
    pub fn pick_list(&self, store: &ProductStore) -> Vec<PickListLine> {
        let mut by_sku: BTreeMap<&Sku, (i64, usize)> = BTreeMap::new();
        for order in self.queued() {
            let entry = by_sku.entry(order.sku()).or_insert((0, 0));
            entry.0 = entry.0.saturating_add(order.outstanding());
            entry.1 += 1;
        }

        let mut lines: Vec<PickListLine> = by_sku
            .into_iter()
            .map(|(sku, (quantity, order_count))| PickListLine {
                sku: sku.clone(),
                name: store
                    .get(sku)
                    .map(|p| p.name().to_string())
                    .unwrap_or_else(|_| "Unknown Product".to_string()),
                quantity,
                order_count,
            })
            .collect();
        lines.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.sku.cmp(&b.sku)));
        lines
    }

    fn open_order(&self, order_id: &OrderId) -> DomainResult<&Order> {
        match self.orders.get(order_id) {
            Some(o) if !o.is_terminal() => Ok(o),
            Some(o) => Err(DomainError::not_found(format!(
                "order {order_id} is already {:?}",
                o.status()
            ))),
            None => Err(DomainError::not_found(format!("order {order_id}"))),
        }
    }
}

fn lot_reason(lot: &LotId) -> String {
    format!("lot {lot} is blocked (recalled or expired)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::CustomerTier;
    use pirs_inventory::NewProduct;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn oid(s: &str) -> OrderId {
        OrderId::parse(s).unwrap()
    }

    fn add(store: &mut ProductStore, s: &str, stock: i64, days: f64) {
        store
            .add(NewProduct {
                sku: sku(s),
                name: format!("Item {s}"),
                unit_price: 500,
                stock,
                lead_time_days: 1,
                daily_consumption: stock as f64 / days,
            })
            .unwrap();
    }

    fn order(id: &str, s: &str, qty: i64) -> NewOrder {
        NewOrder {
            order_id: Some(oid(id)),
            customer: "Acme".to_string(),
            sku: sku(s),
            quantity: qty,
            tier: CustomerTier::Standard,
            lot_id: None,
        }
    }

    #[test]
    fn enqueue_requires_known_sku() {
        let store = ProductStore::default();
        let mut pipeline = OrderPipeline::default();
        let err = pipeline.enqueue(&store, order("O1", "A1", 1)).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(pipeline.queue_len(), 0);
    }

    #[test]
    fn enqueue_rejects_duplicate_ids() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 3.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 1)).unwrap();
        let err = pipeline.enqueue(&store, order("O1", "A1", 1)).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(_)));
    }

    #[test]
    fn express_order_dispatches_and_decrements_stock() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 3.0);
        add(&mut store, "Z9", 10, 1.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 5)).unwrap();

        let lanes = pipeline.triage(&store);
        assert_eq!(lanes.express.len(), 1);
        assert_eq!(lanes.express[0].order.order_id(), &oid("O1"));
        assert!(lanes.express[0].stock_available);

        let shipment = pipeline.dispatch(&mut store, &oid("O1")).unwrap();
        assert_eq!(shipment.status, OrderStatus::Shipped);
        assert_eq!(store.get(&sku("A1")).unwrap().stock(), 5);
        assert_eq!(pipeline.get(&oid("O1")).unwrap().status(), OrderStatus::Shipped);
        assert_eq!(pipeline.queue_len(), 0);
        // Z9 is still the most urgent product.
        assert_eq!(store.peek_min().unwrap().unwrap().sku(), &sku("Z9"));
    }

    #[test]
    fn dispatching_exact_stock_leaves_zero_and_is_terminal() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 4, 10.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 4)).unwrap();

        pipeline.dispatch(&mut store, &oid("O1")).unwrap();
        assert_eq!(store.get(&sku("A1")).unwrap().stock(), 0);

        let err = pipeline.dispatch(&mut store, &oid("O1")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn shortage_then_partial_ship() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 3, 30.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 5)).unwrap();

        let lanes = pipeline.triage(&store);
        assert_eq!(lanes.shortage.len(), 1);
        assert!(!lanes.shortage[0].stock_available);

        let err = pipeline.dispatch(&mut store, &oid("O1")).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientStock { requested: 5, available: 3, .. }
        ));

        let shipment = pipeline.ship_available(&mut store, &oid("O1")).unwrap();
        assert_eq!(shipment.shipped_quantity, 3);
        assert_eq!(shipment.remaining_quantity, 2);
        assert_eq!(shipment.status, OrderStatus::PartiallyShipped);
        assert_eq!(store.get(&sku("A1")).unwrap().stock(), 0);
        assert_eq!(pipeline.queue_len(), 1);

        // Nothing left to ship until restock.
        assert!(matches!(
            pipeline.ship_available(&mut store, &oid("O1")),
            Err(DomainError::InsufficientStock { .. })
        ));

        store.update_stock(&sku("A1"), 10).unwrap();
        let shipment = pipeline.dispatch(&mut store, &oid("O1")).unwrap();
        assert_eq!(shipment.shipped_quantity, 2);
        assert_eq!(shipment.status, OrderStatus::Shipped);
        assert_eq!(store.get(&sku("A1")).unwrap().stock(), 8);
    }

    #[test]
    fn standard_lane_for_healthy_stock() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 100, 50.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 1)).unwrap();
        let lanes = pipeline.triage(&store);
        assert_eq!(lanes.standard.len(), 1);
        assert_eq!(lanes.len(), 1);
    }

    #[test]
    fn blocked_orders_leave_the_queue() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 30.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 1)).unwrap();
        pipeline.enqueue(&store, order("O2", "A1", 1)).unwrap();

        pipeline.block(&oid("O1"), "LOT-EXP-202X recalled").unwrap();
        assert_eq!(pipeline.queue_len(), 1);
        assert_eq!(pipeline.blocked_count(), 1);
        assert!(pipeline.triage(&store).len() == 1);
        assert!(matches!(
            pipeline.dispatch(&mut store, &oid("O1")),
            Err(DomainError::NotFound(_))
        ));
        assert!(pipeline.block(&oid("O1"), "again").is_err());
    }

    #[test]
    fn history_is_newest_first_and_keeps_terminal_orders() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 30.0);
        let mut pipeline = OrderPipeline::default();
        for id in ["O1", "O2", "O3"] {
            pipeline.enqueue(&store, order(id, "A1", 1)).unwrap();
        }
        pipeline.dispatch(&mut store, &oid("O2")).unwrap();

        let ids: Vec<_> = pipeline.history().map(|o| o.order_id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["O3", "O2", "O1"]);
        let queued: Vec<_> = pipeline.queued().map(|o| o.order_id().as_str().to_string()).collect();
        assert_eq!(queued, vec!["O1", "O3"]);
    }

    #[test]
    fn pick_list_aggregates_outstanding_units() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 100, 30.0);
        add(&mut store, "B2", 100, 30.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 2)).unwrap();
        pipeline.enqueue(&store, order("O2", "B2", 5)).unwrap();
        pipeline.enqueue(&store, order("O3", "A1", 1)).unwrap();

        let list = pipeline.pick_list(&store);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].sku, sku("B2"));
        assert_eq!(list[0].quantity, 5);
        assert_eq!(list[1].quantity, 3);
        assert_eq!(list[1].order_count, 2);
        assert_eq!(list[1].name, "Item A1");
    }

    #[test]
    fn pick_list_saturates_instead_of_overflowing() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 30.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", i64::MAX)).unwrap();
        pipeline.enqueue(&store, order("O2", "A1", i64::MAX)).unwrap();

        let list = pipeline.pick_list(&store);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].quantity, i64::MAX);
        assert_eq!(list[0].order_count, 2);

        let lanes = pipeline.triage(&store);
        assert_eq!(lanes.shortage.len(), 2);
        assert_eq!(lanes.shortage[0].total_amount, u64::MAX);
    }

    #[test]
    fn triaged_orders_carry_name_and_value() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 100, 30.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 3)).unwrap();

        let lanes = pipeline.triage(&store);
        let row = &lanes.standard[0];
        assert_eq!(row.item_name, "Item A1");
        assert_eq!(row.total_amount, 1_500);

        store.remove(&sku("A1")).unwrap();
        let lanes = pipeline.triage(&store);
        assert_eq!(lanes.shortage[0].item_name, "Unknown Product");
        assert_eq!(lanes.shortage[0].total_amount, 0);
    }

    fn lot(s: &str) -> LotId {
        LotId::parse(s).unwrap()
    }

    fn order_from_lot(id: &str, s: &str, l: &str) -> NewOrder {
        NewOrder {
            lot_id: Some(lot(l)),
            ..order(id, s, 1)
        }
    }

    #[test]
    fn orders_from_a_blocked_lot_are_blocked_on_enqueue() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 30.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.block_lot(lot("LOT-EXP-202X"));

        let blocked = pipeline
            .enqueue(&store, order_from_lot("O1", "A1", "LOT-EXP-202X"))
            .unwrap();
        assert_eq!(blocked.status(), OrderStatus::Blocked);
        assert!(blocked.blocked_reason().unwrap().contains("LOT-EXP-202X"));
        assert_eq!(pipeline.queue_len(), 0);
        assert_eq!(pipeline.blocked_count(), 1);
        assert!(matches!(
            pipeline.dispatch(&mut store, &oid("O1")),
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(store.get(&sku("A1")).unwrap().stock(), 10);

        let safe = pipeline
            .enqueue(&store, order_from_lot("O2", "A1", "LOT-OK"))
            .unwrap();
        assert_eq!(safe.status(), OrderStatus::Pending);
        assert_eq!(pipeline.queue_len(), 1);
    }

    #[test]
    fn blocking_a_lot_sweeps_queued_orders() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 30.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order_from_lot("O1", "A1", "LOT-7")).unwrap();
        pipeline.enqueue(&store, order("O2", "A1", 1)).unwrap();
        pipeline.enqueue(&store, order_from_lot("O3", "A1", "LOT-7")).unwrap();
        pipeline.dispatch(&mut store, &oid("O3")).unwrap();

        let swept = pipeline.block_lot(lot("LOT-7"));
        assert_eq!(swept, vec![oid("O1")]);
        assert!(!pipeline.is_lot_safe(&lot("LOT-7")));
        assert_eq!(pipeline.blocked_lots(), vec![lot("LOT-7")]);

        // Already shipped orders keep their status.
        assert_eq!(pipeline.get(&oid("O3")).unwrap().status(), OrderStatus::Shipped);
        let queued: Vec<_> = pipeline.queued().map(|o| o.order_id().clone()).collect();
        assert_eq!(queued, vec![oid("O2")]);
        assert_eq!(pipeline.blocked().count(), 1);

        // Blocking again is idempotent.
        assert!(pipeline.block_lot(lot("LOT-7")).is_empty());
    }

    #[test]
    fn deleted_product_orders_fall_into_shortage() {
        let mut store = ProductStore::default();
        add(&mut store, "A1", 10, 3.0);
        let mut pipeline = OrderPipeline::default();
        pipeline.enqueue(&store, order("O1", "A1", 1)).unwrap();
        store.remove(&sku("A1")).unwrap();

        let lanes = pipeline.triage(&store);
        assert_eq!(lanes.shortage.len(), 1);
        assert_eq!(lanes.shortage[0].days_remaining, None);
        assert!(matches!(
            pipeline.dispatch(&mut store, &oid("O1")),
            Err(DomainError::NotFound(_))
        ));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: lanes are disjoint, cover the queue, and follow the stock/urgency rules.
            #[test]
            fn triage_partitions_the_queue(
                stocks in prop::collection::vec((0i64..40, 1u16..60), 1..6),
                orders in prop::collection::vec((0usize..6, 1i64..20), 0..30),
            ) {
                let mut store = ProductStore::default();
                for (i, (stock, rate)) in stocks.iter().enumerate() {
                    store.add(NewProduct {
                        sku: sku(&format!("S{i}")),
                        name: "p".to_string(),
                        unit_price: 1,
                        stock: *stock,
                        lead_time_days: 0,
                        daily_consumption: f64::from(*rate) / 10.0,
                    }).unwrap();
                }
                let mut pipeline = OrderPipeline::default();
                for (n, (idx, qty)) in orders.iter().enumerate() {
                    let target = format!("S{}", idx % stocks.len());
                    pipeline.enqueue(&store, order(&format!("O{n}"), &target, *qty)).unwrap();
                }

                let lanes = pipeline.triage(&store);
                prop_assert_eq!(lanes.len(), pipeline.queue_len());

                for t in &lanes.express {
                    prop_assert!(t.current_stock >= t.order.outstanding());
                    prop_assert!(t.days_remaining.unwrap() < 7.0);
                }
                for t in &lanes.shortage {
                    prop_assert!(t.current_stock < t.order.outstanding());
                }
                for t in &lanes.standard {
                    prop_assert!(t.current_stock >= t.order.outstanding());
                    prop_assert!(t.days_remaining.unwrap() >= 7.0);
                }
            }
        }
    }
}
