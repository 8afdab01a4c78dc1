use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};

use pirs_core::{DomainError, DomainResult, EngineConfig, LotId, OrderId, Sku};
use pirs_fulfillment::{NewOrder, Order, OrderPipeline, Shipment};
use pirs_inventory::{NewProduct, ProductChange, ProductSnapshot, ProductStore, SaleRecord};

use crate::views::{
    AuditEntry, InventoryRow, LotRecall, LotStatus, ShippingDashboard, Summary, TopPriority,
};

#[derive(Debug)]
struct EngineState {
    store: ProductStore,
    pipeline: OrderPipeline,
}

/// Process-wide engine. Starts with an empty catalog, an empty audit ring and
/// an empty order queue; state lives until the engine is dropped.
#[derive(Debug)]
pub struct InventoryEngine {
    config: EngineConfig,
    state: RwLock<EngineState>,
}

impl Default for InventoryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl InventoryEngine {
    pub fn new(config: EngineConfig) -> Self {
        let state = EngineState {
            store: ProductStore::new(&config),
            pipeline: OrderPipeline::new(&config),
        };
        Self {
            config,
            state: RwLock::new(state),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, EngineState>> {
        self.state.read().map_err(|_| poisoned())
    }

    /// Run `op` under the write lock. In debug builds every write is followed
    /// by a full consistency check of the store's indices.
    fn write<T, F>(&self, op: F) -> DomainResult<T>
    where
        F: FnOnce(&mut EngineState) -> DomainResult<T>,
    {
        let mut guard: RwLockWriteGuard<'_, EngineState> =
            self.state.write().map_err(|_| poisoned())?;
        let out = op(&mut *guard);
        if cfg!(debug_assertions) {
            guard.store.verify_consistency()?;
        }
        out
    }

    // -------------------------
    // Reads
    // -------------------------

    pub fn summary(&self) -> DomainResult<Summary> {
        let state = self.read()?;
        Ok(Summary {
            total_sku_count: state.store.len(),
            critical_count: state.store.count_below(self.config.critical_threshold_days),
            queue_depth: state.pipeline.queue_len(),
            blocked_count: state.pipeline.blocked_count(),
        })
    }

    /// `None` when the catalog is empty.
    pub fn top_priority(&self) -> DomainResult<Option<TopPriority>> {
        let state = self.read()?;
        Ok(state.store.peek_min()?.map(TopPriority::from))
    }

    pub fn product(&self, sku: &Sku) -> DomainResult<ProductSnapshot> {
        let state = self.read()?;
        Ok(state.store.get(sku)?.snapshot())
    }

    /// Every product, most urgent first.
    pub fn inventory(&self) -> DomainResult<Vec<InventoryRow>> {
        let state = self.read()?;
        state
            .store
            .ascending()
            .map(|p| p.map(InventoryRow::from))
            .collect()
    }

    /// Products below `below` days remaining (critical threshold if absent).
    pub fn critical(&self, below: Option<f64>) -> DomainResult<Vec<InventoryRow>> {
        let threshold = below.unwrap_or(self.config.critical_threshold_days);
        if threshold.is_nan() {
            return Err(DomainError::invalid("threshold must be a number"));
        }
        let state = self.read()?;
        state
            .store
            .range_below(threshold)
            .map(|p| p.map(InventoryRow::from))
            .collect()
    }

    /// Next `count` stops on the audit route (configured window if absent),
    /// the first one pending. Empty when there are no products.
    pub fn audit_sequence(&self, count: Option<usize>) -> DomainResult<Vec<AuditEntry>> {
        let k = count.unwrap_or(self.config.audit_window);
        let state = self.read()?;
        state
            .store
            .audit_window(k)
            .into_iter()
            .enumerate()
            .map(|(i, sku)| {
                let product = state.store.get(&sku).map_err(|_| {
                    DomainError::inconsistency(format!("audit ring holds unknown sku {sku}"))
                })?;
                Ok(AuditEntry {
                    name: product.name().to_string(),
                    stock: product.stock(),
                    sku,
                    pending: i == 0,
                })
            })
            .collect()
    }

    /// Every order with its current status, newest first.
    pub fn order_history(&self) -> DomainResult<Vec<Order>> {
        let state = self.read()?;
        Ok(state.pipeline.history().cloned().collect())
    }

    pub fn order(&self, order_id: &OrderId) -> DomainResult<Order> {
        let state = self.read()?;
        state.pipeline.get(order_id).cloned()
    }

    pub fn lot_status(&self, lot_id: &LotId) -> DomainResult<LotStatus> {
        let state = self.read()?;
        Ok(LotStatus {
            lot_id: lot_id.clone(),
            safe: state.pipeline.is_lot_safe(lot_id),
        })
    }

    pub fn blocked_lots(&self) -> DomainResult<Vec<LotId>> {
        Ok(self.read()?.pipeline.blocked_lots())
    }

    pub fn shipping_dashboard(&self) -> DomainResult<ShippingDashboard> {
        let state = self.read()?;
        let lanes = state.pipeline.triage(&state.store);
        let blocked = state.pipeline.blocked().cloned().collect();
        let pick_list = state.pipeline.pick_list(&state.store);
        Ok(ShippingDashboard::new(lanes, blocked, pick_list))
    }

    // -------------------------
    // Writes
    // -------------------------

    pub fn add_product(&self, input: NewProduct) -> DomainResult<ProductSnapshot> {
        self.write(|s| s.store.add(input))
    }

    pub fn update_stock(&self, sku: &Sku, quantity: i64) -> DomainResult<ProductChange> {
        self.write(|s| s.store.update_stock(sku, quantity))
    }

    pub fn set_consumption_rate(&self, sku: &Sku, units_per_day: f64) -> DomainResult<ProductChange> {
        self.write(|s| s.store.set_consumption_rate(sku, units_per_day))
    }

    /// Append sales and re-derive the burn rate; `as_of` defaults to today (UTC).
    pub fn record_sales(
        &self,
        sku: &Sku,
        sales: &[SaleRecord],
        as_of: Option<NaiveDate>,
    ) -> DomainResult<ProductChange> {
        let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
        self.write(|s| s.store.record_sales(sku, sales, as_of))
    }

    /// Delete a product. Queued orders for it stay queued and triage as Shortage.
    pub fn delete_product(&self, sku: &Sku) -> DomainResult<ProductSnapshot> {
        self.write(|s| s.store.remove(sku).map(|p| p.snapshot()))
    }

    /// Move the audit cursor one stop; returns the new pending SKU.
    pub fn audit_advance(&self) -> DomainResult<Option<Sku>> {
        self.write(|s| Ok(s.store.audit_advance()))
    }

    pub fn enqueue(&self, input: NewOrder) -> DomainResult<Order> {
        self.write(|s| s.pipeline.enqueue(&s.store, input))
    }

    pub fn dispatch(&self, order_id: &OrderId) -> DomainResult<Shipment> {
        self.write(|s| s.pipeline.dispatch(&mut s.store, order_id))
    }

    pub fn ship_available(&self, order_id: &OrderId) -> DomainResult<Shipment> {
        self.write(|s| s.pipeline.ship_available(&mut s.store, order_id))
    }

    pub fn block(&self, order_id: &OrderId, reason: impl Into<String>) -> DomainResult<Order> {
        self.write(|s| s.pipeline.block(order_id, reason))
    }

    /// Stop a lot from shipping and block every queued order drawn from it.
    pub fn block_lot(&self, lot_id: LotId) -> DomainResult<LotRecall> {
        self.write(|s| {
            let blocked_orders = s.pipeline.block_lot(lot_id.clone());
            Ok(LotRecall {
                lot_id,
                blocked_orders,
            })
        })
    }

    /// Load a catalog in one write. Stops at the first failure; products added
    /// before it stay.
    pub fn load_catalog<I>(&self, products: I) -> DomainResult<usize>
    where
        I: IntoIterator<Item = NewProduct>,
    {
        self.write(|s| {
            let mut added = 0;
            for input in products {
                s.store.add(input)?;
                added += 1;
            }
            tracing::info!(added, "catalog loaded");
            Ok(added)
        })
    }

    /// Full cross-check of the store's indices, independent of build profile.
    pub fn verify_consistency(&self) -> DomainResult<()> {
        self.read()?.store.verify_consistency()
    }
}

fn poisoned() -> DomainError {
    tracing::error!("engine lock poisoned");
    DomainError::inconsistency("engine lock poisoned by a panicked writer")
}
