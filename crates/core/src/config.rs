//! Engine tunables.
//!
//! Defaults reproduce the warehouse rules the dashboard is built around (a
//! product is critical below seven days of cover, products without demand are
//! parked at a 9999-day horizon). Every field can be overridden through a
//! `PIRS_*` environment variable.

use serde::Deserialize;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Products below this many days remaining count as critical in the summary.
    pub critical_threshold_days: f64,
    /// Pending orders whose product is below this many days go to the Express lane.
    pub express_threshold_days: f64,
    /// `days_remaining` reported for products with no consumption.
    pub no_demand_horizon_days: f64,
    /// Trailing window (days) used to derive a burn rate from sales history.
    pub sales_window_days: u32,
    /// Default length of the audit sequence.
    pub audit_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            critical_threshold_days: 7.0,
            express_threshold_days: 7.0,
            no_demand_horizon_days: 9999.0,
            sales_window_days: 90,
            audit_window: 5,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with any `PIRS_*` environment variables.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] but with an injectable lookup (tests).
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("PIRS_CRITICAL_DAYS") {
            cfg.critical_threshold_days = parse_days("PIRS_CRITICAL_DAYS", &v)?;
        }
        if let Some(v) = lookup("PIRS_EXPRESS_DAYS") {
            cfg.express_threshold_days = parse_days("PIRS_EXPRESS_DAYS", &v)?;
        }
        if let Some(v) = lookup("PIRS_NO_DEMAND_HORIZON") {
            cfg.no_demand_horizon_days = parse_days("PIRS_NO_DEMAND_HORIZON", &v)?;
        }
        if let Some(v) = lookup("PIRS_SALES_WINDOW_DAYS") {
            cfg.sales_window_days = parse_positive("PIRS_SALES_WINDOW_DAYS", &v)?;
        }
        if let Some(v) = lookup("PIRS_AUDIT_WINDOW") {
            cfg.audit_window = parse_positive::<usize>("PIRS_AUDIT_WINDOW", &v)?;
        }

        tracing::debug!(?cfg, "engine configuration loaded");
        Ok(cfg)
    }
}

fn parse_days(key: &str, raw: &str) -> DomainResult<f64> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::invalid(format!("{key}: expected a number, got {raw:?}")))?;
    if !v.is_finite() || v < 0.0 {
        return Err(DomainError::invalid(format!("{key}: must be a non-negative number")));
    }
    Ok(v)
}

fn parse_positive<T>(key: &str, raw: &str) -> DomainResult<T>
where
    T: core::str::FromStr + PartialOrd + Default,
{
    let v: T = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::invalid(format!("{key}: expected an integer, got {raw:?}")))?;
    if v <= T::default() {
        return Err(DomainError::invalid(format!("{key}: must be positive")));
    }
    Ok(v)
}
