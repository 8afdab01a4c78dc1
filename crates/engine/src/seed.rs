//! Demo catalog for local runs (`PIRS_SEED_DEMO=1`).
//!
//! Stock, lead time and burn rate are derived from the SKU number so a fresh
//! process always starts from the same dashboard.

use pirs_core::{DomainResult, LotId, Sku};
use pirs_inventory::NewProduct;

/// `(name, unit price in cents)` per SKU, `SKU001` upward.
const CATALOG: &[(&str, u64)] = &[
    ("Mouse (Electronics)", 34_900),
    ("Keyboard (Electronics)", 59_900),
    ("Monitor (Electronics)", 749_900),
    ("Cable (Electronics)", 19_900),
    ("Charger (Electronics)", 44_900),
    ("Headset (Electronics)", 89_900),
    ("Webcam (Electronics)", 149_900),
    ("Router (Electronics)", 129_900),
    ("Paper (Office)", 26_000),
    ("Pen (Office)", 5_000),
    ("Stapler (Office)", 14_900),
    ("Desk Lamp (Office)", 79_900),
    ("Chair (Office)", 349_900),
    ("Mug (Kitchen)", 14_900),
    ("Kettle (Kitchen)", 79_900),
    ("Blender (Kitchen)", 149_900),
    ("Wiper Blade (Automotive)", 34_900),
    ("First Aid Kit (Automotive)", 49_900),
    ("Shovel (Gardening)", 49_900),
    ("Seeds (Gardening)", 9_900),
];

/// Lots already known to be recalled or expired.
const BLOCKED_LOTS: &[&str] = &["LOT-EXP-202X"];

pub fn demo_blocked_lots() -> DomainResult<Vec<LotId>> {
    BLOCKED_LOTS.iter().map(LotId::parse).collect()
}

pub fn demo_catalog() -> DomainResult<Vec<NewProduct>> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, (name, price))| {
            let n = i as i64 + 1;
            Ok(NewProduct {
                sku: Sku::parse(format!("SKU{n:03}"))?,
                name: (*name).to_string(),
                unit_price: *price,
                stock: 5 + (n * 37) % 496,
                lead_time_days: 2 + (n as u32 * 7) % 20,
                // Every fifth item has no demand and parks at the horizon.
                daily_consumption: ((n * 3) % 11) as f64 * if n % 5 == 0 { 0.0 } else { 1.0 },
            })
        })
        .collect()
}
