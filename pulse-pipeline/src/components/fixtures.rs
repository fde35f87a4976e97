//! Shared row builders for the rule tests.

use chrono::{NaiveDate, NaiveDateTime};

use pulse_metrics::records::{CustomerType, InventoryRecord, SalesRecord};
use pulse_metrics::thresholds::{Heuristics, ThresholdConfig};

use crate::alert::AlertInput;

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn sale(ts: NaiveDateTime, boutique: &str, txn: &str, revenue: f64) -> SalesRecord {
    SalesRecord {
        date: ts,
        boutique_id: format!("ID-{}", boutique),
        boutique_name: boutique.into(),
        region: "Europe".into(),
        sku_code: "SKU5000".into(),
        product_category: "Watches".into(),
        brand: "Patek Philippe".into(),
        units_sold: 1,
        revenue_local_currency: None,
        revenue_usd: revenue,
        transaction_id: txn.into(),
        sales_associate_id: None,
        customer_type: CustomerType::New,
        payment_method: None,
    }
}

pub fn stock(name: &str, boutique: &str, units: u32, min: u32, cost: f64) -> InventoryRecord {
    InventoryRecord {
        date: at(1, 0),
        boutique_id: boutique.into(),
        sku_code: format!("SKU-{}", name),
        product_name: name.into(),
        category: "Jewelry".into(),
        brand: "Cartier".into(),
        current_stock_units: units,
        min_stock_threshold: min,
        max_stock_threshold: Some(20),
        unit_cost: Some(cost),
        retail_price: cost * 2.5,
        last_restock_date: None,
        supplier_lead_time_days: Some(10),
    }
}

/// Owned tables plus settings, lending out an `AlertInput`.
pub struct Tables {
    pub sales: Vec<SalesRecord>,
    pub inventory: Vec<InventoryRecord>,
    pub thresholds: ThresholdConfig,
    pub heuristics: Heuristics,
}

impl Tables {
    pub fn new(sales: Vec<SalesRecord>, inventory: Vec<InventoryRecord>) -> Self {
        Self {
            sales,
            inventory,
            thresholds: ThresholdConfig::default(),
            heuristics: Heuristics::default(),
        }
    }

    pub fn input(&self, now: NaiveDateTime) -> AlertInput<'_> {
        AlertInput {
            sales: &self.sales,
            inventory: &self.inventory,
            thresholds: &self.thresholds,
            heuristics: &self.heuristics,
            now,
        }
    }
}
