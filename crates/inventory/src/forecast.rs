//! Stock-out forecasting.
//!
//! `days_remaining` is a pure function of stock on hand and the product's burn
//! rate (units consumed per day). The burn rate is either set directly or
//! derived from recorded sales over a trailing window.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use pirs_core::{DomainError, DomainResult};

/// Forecast days until stock reaches zero. Always finite and `>= 0`.
///
/// Totally ordered (via `f64::total_cmp`) so it can key ordered indices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysRemaining(f64);

impl DaysRemaining {
    pub const ZERO: DaysRemaining = DaysRemaining(0.0);

    pub fn new(days: f64) -> DomainResult<Self> {
        if !days.is_finite() || days < 0.0 {
            return Err(DomainError::invalid(format!(
                "days_remaining must be a finite non-negative number, got {days}"
            )));
        }
        // Normalise -0.0 so total ordering agrees with numeric equality.
        Ok(Self(days + 0.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `true` when strictly below `threshold` (a NaN threshold matches nothing).
    pub fn is_below(self, threshold: f64) -> bool {
        self.0 < threshold
    }
}

impl PartialEq for DaysRemaining {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DaysRemaining {}

impl PartialOrd for DaysRemaining {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DaysRemaining {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl core::fmt::Display for DaysRemaining {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Units consumed per day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BurnRate(f64);

impl BurnRate {
    pub fn new(units_per_day: f64) -> DomainResult<Self> {
        if !units_per_day.is_finite() || units_per_day < 0.0 {
            return Err(DomainError::invalid(format!(
                "consumption rate must be a finite non-negative number, got {units_per_day}"
            )));
        }
        Ok(Self(units_per_day + 0.0))
    }

    pub fn units_per_day(self) -> f64 {
        self.0
    }

    pub fn is_idle(self) -> bool {
        self.0 == 0.0
    }

    /// Forecast days of cover for `stock` units, rounded to two decimals.
    ///
    /// An idle product (rate 0) is parked at `horizon` days.
    pub fn days_remaining(self, stock: i64, horizon: f64) -> DaysRemaining {
        let mut days = if self.is_idle() {
            horizon
        } else {
            round2(stock.max(0) as f64 / self.0)
        };
        if !days.is_finite() {
            days = horizon;
        }
        DaysRemaining::new(days).unwrap_or(DaysRemaining::ZERO)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// One day's sales of a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub quantity: u32,
}

/// Per-day sales totals for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesHistory {
    by_day: BTreeMap<NaiveDate, u64>,
}

impl SalesHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sale: SaleRecord) {
        *self.by_day.entry(sale.date).or_insert(0) += u64::from(sale.quantity);
    }

    /// Average units sold per *active* day in `[as_of - window_days, as_of]`.
    ///
    /// Days without sales are not counted, so a product that sells in bursts
    /// is not diluted by quiet days.
    pub fn burn_rate(&self, as_of: NaiveDate, window_days: u32) -> BurnRate {
        let start = as_of
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);

        let (total, days) = self
            .by_day
            .range(start..=as_of)
            .filter(|(_, qty)| **qty > 0)
            .fold((0u64, 0u64), |(total, days), (_, qty)| (total + qty, days + 1));

        if days == 0 {
            return BurnRate::default();
        }
        BurnRate(total as f64 / days as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn days_remaining_is_stock_over_rate_rounded() {
        let rate = BurnRate::new(10.0 / 3.0).unwrap();
        assert_eq!(rate.days_remaining(10, 9999.0).value(), 3.0);
        assert_eq!(rate.days_remaining(5, 9999.0).value(), 1.5);
        assert_eq!(rate.days_remaining(0, 9999.0).value(), 0.0);
    }

    #[test]
    fn idle_products_use_the_horizon() {
        let rate = BurnRate::default();
        assert_eq!(rate.days_remaining(40, 9999.0).value(), 9999.0);
    }

    #[test]
    fn invalid_rates_and_days_are_rejected() {
        assert!(BurnRate::new(-1.0).is_err());
        assert!(BurnRate::new(f64::NAN).is_err());
        assert!(DaysRemaining::new(f64::INFINITY).is_err());
        assert!(DaysRemaining::new(-0.5).is_err());
    }

    #[test]
    fn negative_zero_equals_zero() {
        let a = DaysRemaining::new(-0.0).unwrap();
        assert_eq!(a, DaysRemaining::ZERO);
    }

    #[test]
    fn burn_rate_averages_over_active_days_in_window() {
        let mut history = SalesHistory::new();
        history.record(SaleRecord { date: day(1), quantity: 10 });
        history.record(SaleRecord { date: day(2), quantity: 4 });
        history.record(SaleRecord { date: day(2), quantity: 6 });
        history.record(SaleRecord { date: day(20), quantity: 30 });

        // Window of 5 days ending on the 3rd sees days 1 and 2 only.
        let rate = history.burn_rate(day(3), 5);
        assert_eq!(rate.units_per_day(), 10.0);

        // Wider window includes the 20th as well.
        let rate = history.burn_rate(day(25), 30);
        assert!((rate.units_per_day() - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_window_means_idle() {
        let mut history = SalesHistory::new();
        history.record(SaleRecord { date: day(1), quantity: 10 });
        assert!(history.burn_rate(day(28), 3).is_idle());
    }
}
