//! Product store: sole owner of product data and the only mutation gateway.
//!
//! Every successful mutation re-keys the stability index, the priority heap and
//! the audit ring before returning, so no caller can observe the store updated
//! while an index is stale.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use pirs_core::{DomainError, DomainResult, EngineConfig, Entity, Sku};

use crate::audit::AuditRing;
use crate::forecast::{BurnRate, SaleRecord};
use crate::priority::PriorityHeap;
use crate::product::{NewProduct, Product, ProductChange, ProductSnapshot, UrgencyKey};
use crate::stability::StabilityIndex;

#[derive(Debug)]
pub struct ProductStore {
    products: HashMap<Sku, Product>,
    stability: StabilityIndex,
    priority: PriorityHeap,
    audit: AuditRing,
    horizon_days: f64,
    sales_window_days: u32,
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ProductStore {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            products: HashMap::new(),
            stability: StabilityIndex::new(),
            priority: PriorityHeap::new(),
            audit: AuditRing::new(),
            horizon_days: config.no_demand_horizon_days,
            sales_window_days: config.sales_window_days,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.products.contains_key(sku)
    }

    pub fn get(&self, sku: &Sku) -> DomainResult<&Product> {
        self.products
            .get(sku)
            .ok_or_else(|| DomainError::not_found(format!("sku {sku}")))
    }

    // -------------------------
    // Mutations
    // -------------------------

    /// Create a product and index it everywhere.
    pub fn add(&mut self, input: NewProduct) -> DomainResult<ProductSnapshot> {
        if self.products.contains_key(&input.sku) {
            tracing::warn!(sku = %input.sku, "rejecting duplicate sku");
            return Err(DomainError::duplicate(format!("sku {}", input.sku)));
        }
        let product = Product::create(input, self.horizon_days)?;
        let key = product.urgency_key();
        let sku = product.sku().clone();

        if !self.stability.insert(key.clone()) {
            return Err(self.desync(&sku, "already present in stability index"));
        }
        if !self.priority.insert(key) {
            self.stability.remove(&product.urgency_key());
            return Err(self.desync(&sku, "already present in priority heap"));
        }
        if !self.audit.insert_after_cursor(sku.clone()) {
            self.stability.remove(&product.urgency_key());
            self.priority.remove(&sku);
            return Err(self.desync(&sku, "already present in audit ring"));
        }

        let snapshot = product.snapshot();
        tracing::info!(
            sku = %sku,
            stock = snapshot.stock,
            days_remaining = snapshot.days_remaining,
            "product added"
        );
        self.products.insert(sku, product);
        Ok(snapshot)
    }

    /// Set the stock on hand. Fails with `InvalidValue` if `new_qty < 0`.
    pub fn update_stock(&mut self, sku: &Sku, new_qty: i64) -> DomainResult<ProductChange> {
        let horizon = self.horizon_days;
        self.mutate(sku, |p| p.set_stock(new_qty, horizon))
    }

    /// Override the daily consumption rate.
    pub fn set_consumption_rate(&mut self, sku: &Sku, units_per_day: f64) -> DomainResult<ProductChange> {
        let rate = BurnRate::new(units_per_day)?;
        let horizon = self.horizon_days;
        self.mutate(sku, |p| {
            p.set_burn_rate(rate, horizon);
            Ok(())
        })
    }

    /// Append sales history and re-derive the burn rate over the trailing window
    /// ending at `as_of`.
    pub fn record_sales(
        &mut self,
        sku: &Sku,
        sales: &[SaleRecord],
        as_of: NaiveDate,
    ) -> DomainResult<ProductChange> {
        let horizon = self.horizon_days;
        let window = self.sales_window_days;
        self.mutate(sku, |p| {
            p.record_sales(sales, as_of, window, horizon);
            Ok(())
        })
    }

    /// Delete a product, evicting it from every index.
    pub fn remove(&mut self, sku: &Sku) -> DomainResult<Product> {
        let product = self
            .products
            .remove(sku)
            .ok_or_else(|| DomainError::not_found(format!("sku {sku}")))?;

        let in_stability = self.stability.remove(&product.urgency_key());
        let in_heap = self.priority.remove(sku).is_some();
        let in_ring = self.audit.remove(sku);
        if !(in_stability && in_heap && in_ring) {
            return Err(self.desync(
                sku,
                &format!("missing on delete (stability={in_stability}, heap={in_heap}, ring={in_ring})"),
            ));
        }

        tracing::info!(sku = %sku, "product removed");
        Ok(product)
    }

    /// Apply `change` to a working copy, then commit it to the record and every
    /// index. Nothing is touched if `change` fails.
    fn mutate<F>(&mut self, sku: &Sku, change: F) -> DomainResult<ProductChange>
    where
        F: FnOnce(&mut Product) -> DomainResult<()>,
    {
        let Some(current) = self.products.get(sku) else {
            return Err(DomainError::not_found(format!("sku {sku}")));
        };

        let mut next = current.clone();
        change(&mut next)?;

        let previous = current.snapshot();
        let old_key = current.urgency_key();
        let new_key = next.urgency_key();

        if old_key != new_key {
            if !self.stability.update_key(&old_key, new_key.clone()) {
                return Err(self.desync(sku, "missing from stability index on re-key"));
            }
            if self.priority.update_key(sku, new_key.days_remaining).is_none() {
                return Err(self.desync(sku, "missing from priority heap on re-key"));
            }
            tracing::debug!(
                sku = %sku,
                from = %old_key.days_remaining,
                to = %new_key.days_remaining,
                "re-keyed indices"
            );
        }

        let current = next.snapshot();
        self.products.insert(sku.clone(), next);
        Ok(ProductChange { previous, current })
    }

    fn desync(&self, sku: &Sku, detail: &str) -> DomainError {
        tracing::error!(sku = %sku, detail, "index desynchronisation detected");
        DomainError::inconsistency(format!("sku {sku}: {detail}"))
    }

    // -------------------------
    // Index queries
    // -------------------------

    /// All products, most urgent first.
    pub fn ascending(&self) -> impl Iterator<Item = DomainResult<&Product>> + '_ {
        self.stability.iter().map(move |k| self.resolve(k))
    }

    /// Products with `days_remaining < threshold`, ascending. Lazy and restartable.
    pub fn range_below(&self, threshold: f64) -> impl Iterator<Item = DomainResult<&Product>> + '_ {
        self.stability.range_below(threshold).map(move |k| self.resolve(k))
    }

    /// Number of products with `days_remaining < threshold`.
    pub fn count_below(&self, threshold: f64) -> usize {
        self.stability.range_below(threshold).count()
    }

    /// The single most urgent product, or `None` when the store is empty.
    pub fn peek_min(&self) -> DomainResult<Option<&Product>> {
        self.priority
            .peek_min()
            .map(|k| self.resolve(k))
            .transpose()
    }

    /// Next `k` SKUs in audit order; the first one is pending inspection.
    pub fn audit_window(&self, k: usize) -> Vec<Sku> {
        self.audit.next_n(k)
    }

    pub fn audit_pending(&self) -> Option<&Sku> {
        self.audit.cursor()
    }

    /// Move the audit cursor by one; returns the new pending SKU.
    pub fn audit_advance(&mut self) -> Option<Sku> {
        let next = self.audit.advance().cloned();
        tracing::debug!(pending = ?next, "audit cursor advanced");
        next
    }

    pub fn audit_len(&self) -> usize {
        self.audit.len()
    }

    fn resolve(&self, key: &UrgencyKey) -> DomainResult<&Product> {
        match self.products.get(&key.sku) {
            Some(p) if p.days_remaining() == key.days_remaining => Ok(p),
            Some(_) => Err(self.desync(&key.sku, "index key disagrees with stored forecast")),
            None => Err(self.desync(&key.sku, "indexed but absent from store")),
        }
    }

    /// Full cross-check of the four views.
    ///
    /// Membership must match exactly and each structure must satisfy its own
    /// invariants (AVL balance/order, heap order/position map, ring cycle).
    pub fn verify_consistency(&self) -> DomainResult<()> {
        let fail = |detail: String| {
            tracing::error!(detail = %detail, "consistency check failed");
            DomainError::inconsistency(detail)
        };

        self.stability.check_invariants().map_err(fail)?;
        self.priority.check_invariants().map_err(fail)?;
        self.audit.check_invariants().map_err(fail)?;

        let n = self.products.len();
        if self.stability.len() != n || self.priority.len() != n || self.audit.len() != n {
            return Err(fail(format!(
                "sizes differ: store={n} stability={} heap={} ring={}",
                self.stability.len(),
                self.priority.len(),
                self.audit.len()
            )));
        }

        for (sku, product) in &self.products {
            if product.id() != sku {
                return Err(fail(format!("{} stored under key {sku}", product.id())));
            }
            let key = product.urgency_key();
            if !self.stability.contains(&key) {
                return Err(fail(format!("{} missing from stability index", key.sku)));
            }
            if self.priority.get(&key.sku) != Some(key.days_remaining) {
                return Err(fail(format!("{} stale or missing in priority heap", key.sku)));
            }
            if !self.audit.contains(&key.sku) {
                return Err(fail(format!("{} missing from audit ring", key.sku)));
            }
        }

        let heap_skus: HashSet<&Sku> = self.priority.skus().collect();
        if heap_skus.len() != n {
            return Err(fail("priority heap holds duplicate skus".to_string()));
        }
        Ok(())
    }
}
