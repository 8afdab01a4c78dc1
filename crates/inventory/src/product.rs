use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use pirs_core::{DomainError, DomainResult, Entity, Sku};

use crate::forecast::{BurnRate, DaysRemaining, SaleRecord, SalesHistory};

/// Ordering key shared by the stability index and the priority heap.
///
/// SKU breaks ties so the key is total-ordered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UrgencyKey {
    pub days_remaining: DaysRemaining,
    pub sku: Sku,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: Sku,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    pub stock: i64,
    /// Supplier lead time in days.
    #[serde(default)]
    pub lead_time_days: u32,
    /// Units consumed per day.
    #[serde(default)]
    pub daily_consumption: f64,
}

/// The authoritative product record. Owned exclusively by `ProductStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    sku: Sku,
    name: String,
    unit_price: u64,
    stock: i64,
    lead_time_days: u32,
    burn_rate: BurnRate,
    sales: SalesHistory,
    days_remaining: DaysRemaining,
    stability_score: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Validate input and build a record with its forecast already computed.
    pub(crate) fn create(input: NewProduct, horizon: f64) -> DomainResult<Self> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid("name cannot be empty"));
        }
        if input.stock < 0 {
            return Err(DomainError::invalid(format!(
                "stock cannot be negative (got {})",
                input.stock
            )));
        }
        let burn_rate = BurnRate::new(input.daily_consumption)?;

        let now = Utc::now();
        let mut product = Self {
            sku: input.sku,
            name: name.to_string(),
            unit_price: input.unit_price,
            stock: input.stock,
            lead_time_days: input.lead_time_days,
            burn_rate,
            sales: SalesHistory::new(),
            days_remaining: DaysRemaining::ZERO,
            stability_score: 0.0,
            created_at: now,
            updated_at: now,
        };
        product.refresh_forecast(horizon);
        Ok(product)
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn lead_time_days(&self) -> u32 {
        self.lead_time_days
    }

    pub fn burn_rate(&self) -> BurnRate {
        self.burn_rate
    }

    pub fn days_remaining(&self) -> DaysRemaining {
        self.days_remaining
    }

    /// Days of cover left beyond the supplier lead time.
    pub fn stability_score(&self) -> f64 {
        self.stability_score
    }

    /// The reorder point has been reached (cover no longer exceeds lead time).
    pub fn needs_reorder(&self) -> bool {
        self.stability_score <= 0.0
    }

    pub fn urgency_key(&self) -> UrgencyKey {
        UrgencyKey {
            days_remaining: self.days_remaining,
            sku: self.sku.clone(),
        }
    }

    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            sku: self.sku.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            stock: self.stock,
            lead_time_days: self.lead_time_days,
            daily_consumption: self.burn_rate.units_per_day(),
            days_remaining: self.days_remaining.value(),
            stability_score: self.stability_score,
            needs_reorder: self.needs_reorder(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // Mutators are crate-private: only the store may change a product, and it
    // re-keys every index in the same step.

    pub(crate) fn set_stock(&mut self, stock: i64, horizon: f64) -> DomainResult<()> {
        if stock < 0 {
            return Err(DomainError::invalid(format!(
                "stock cannot be negative (got {stock})"
            )));
        }
        self.stock = stock;
        self.refresh_forecast(horizon);
        Ok(())
    }

    pub(crate) fn set_burn_rate(&mut self, rate: BurnRate, horizon: f64) {
        self.burn_rate = rate;
        self.refresh_forecast(horizon);
    }

    pub(crate) fn record_sales(
        &mut self,
        sales: &[SaleRecord],
        as_of: NaiveDate,
        window_days: u32,
        horizon: f64,
    ) {
        for sale in sales {
            self.sales.record(*sale);
        }
        self.burn_rate = self.sales.burn_rate(as_of, window_days);
        self.refresh_forecast(horizon);
    }

    fn refresh_forecast(&mut self, horizon: f64) {
        self.days_remaining = self.burn_rate.days_remaining(self.stock, horizon);
        self.stability_score = self.days_remaining.value() - f64::from(self.lead_time_days);
        self.updated_at = Utc::now();
    }
}

impl Entity for Product {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}

/// Point-in-time copy of a product, safe to hand out of the lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub sku: Sku,
    pub name: String,
    pub unit_price: u64,
    pub stock: i64,
    pub lead_time_days: u32,
    pub daily_consumption: f64,
    pub days_remaining: f64,
    pub stability_score: f64,
    pub needs_reorder: bool,
    pub created_at: DateTime<Utc>,
    /// Last stock, rate or sales change.
    pub updated_at: DateTime<Utc>,
}

/// Result of a product mutation: the record before and after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductChange {
    pub previous: ProductSnapshot,
    pub current: ProductSnapshot,
}
