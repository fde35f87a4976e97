//! Per-boutique and per-category aggregate tables, plus the two chart series
//! (daily revenue, stock against minimum by category).

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::math::safe_ratio;
use crate::period::{in_window, latest_timestamp, window_start};
use crate::records::{InventoryRecord, SalesRecord};
use crate::thresholds::Heuristics;

/// One row of the trailing-week boutique table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoutiqueMetrics {
    #[serde(rename = "Boutique_Name")]
    pub boutique_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Units_Sold")]
    pub units_sold: u64,
    #[serde(rename = "Transactions")]
    pub transactions: usize,
    #[serde(rename = "Estimated_Visitors")]
    pub estimated_visitors: u32,
    #[serde(rename = "Conversion_Rate")]
    pub conversion_rate: f64,
    #[serde(rename = "ATV")]
    pub atv: f64,
}

/// One row of the all-time category table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryMetrics {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Units_Sold")]
    pub units_sold: u64,
    #[serde(rename = "Transactions")]
    pub transactions: usize,
    #[serde(rename = "Revenue_Share")]
    pub revenue_share: f64,
}

/// Revenue summed over one calendar day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyRevenue {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
}

/// Stock on hand against the summed minimum thresholds of one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryStock {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Current_Stock_Units")]
    pub current_stock_units: u64,
    #[serde(rename = "Min_Stock_Threshold")]
    pub min_stock_threshold: u64,
}

#[derive(Default)]
struct GroupTotals<'a> {
    revenue: f64,
    units: u64,
    transactions: HashSet<&'a str>,
}

impl<'a> GroupTotals<'a> {
    fn add(&mut self, row: &'a SalesRecord) {
        self.revenue += row.revenue_usd;
        self.units += row.units_sold as u64;
        self.transactions.insert(row.transaction_id.as_str());
    }
}

/// Boutique table over `Date >= max(Date) - window`, best revenue first.
pub fn boutique_metrics(sales: &[SalesRecord]) -> Vec<BoutiqueMetrics> {
    boutique_metrics_with(sales, &Heuristics::default())
}

pub fn boutique_metrics_with(
    sales: &[SalesRecord],
    heuristics: &Heuristics,
) -> Vec<BoutiqueMetrics> {
    let Some(latest) = latest_timestamp(sales) else {
        return Vec::new();
    };
    let start = window_start(latest, heuristics.boutique_window_days);
    let visitors = heuristics.window_visitors();

    let mut groups: BTreeMap<(&str, &str), GroupTotals> = BTreeMap::new();
    for row in sales.iter().filter(|r| in_window(r.date, start)) {
        groups
            .entry((row.boutique_name.as_str(), row.region.as_str()))
            .or_default()
            .add(row);
    }

    let mut table: Vec<BoutiqueMetrics> = groups
        .into_iter()
        .map(|((name, region), totals)| {
            let transactions = totals.transactions.len();
            BoutiqueMetrics {
                boutique_name: name.to_string(),
                region: region.to_string(),
                revenue: totals.revenue,
                units_sold: totals.units,
                transactions,
                estimated_visitors: visitors,
                conversion_rate: safe_ratio(transactions as f64, visitors as f64) * 100.0,
                atv: safe_ratio(totals.revenue, transactions as f64),
            }
        })
        .collect();

    sort_by_revenue_desc(&mut table, |m| m.revenue);
    table
}

/// Category table over the whole sales table, best revenue first.
pub fn category_metrics(sales: &[SalesRecord]) -> Vec<CategoryMetrics> {
    let mut groups: BTreeMap<&str, GroupTotals> = BTreeMap::new();
    for row in sales {
        groups.entry(row.product_category.as_str()).or_default().add(row);
    }

    let total_revenue: f64 = groups.values().map(|g| g.revenue).sum();

    let mut table: Vec<CategoryMetrics> = groups
        .into_iter()
        .map(|(category, totals)| CategoryMetrics {
            category: category.to_string(),
            revenue: totals.revenue,
            units_sold: totals.units,
            transactions: totals.transactions.len(),
            revenue_share: safe_ratio(totals.revenue, total_revenue) * 100.0,
        })
        .collect();

    sort_by_revenue_desc(&mut table, |m| m.revenue);
    table
}

/// Revenue per calendar day, oldest first.
pub fn daily_revenue(sales: &[SalesRecord]) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in sales {
        *days.entry(row.date.date()).or_insert(0.0) += row.revenue_usd;
    }
    days.into_iter()
        .map(|(date, revenue)| DailyRevenue { date, revenue })
        .collect()
}

/// Stock and minimum thresholds summed per inventory category, by name.
pub fn category_stock(inventory: &[InventoryRecord]) -> Vec<CategoryStock> {
    let mut groups: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for row in inventory {
        let totals = groups.entry(row.category.as_str()).or_default();
        totals.0 += row.current_stock_units as u64;
        totals.1 += row.min_stock_threshold as u64;
    }
    groups
        .into_iter()
        .map(|(category, (stock, min))| CategoryStock {
            category: category.to_string(),
            current_stock_units: stock,
            min_stock_threshold: min,
        })
        .collect()
}

/// Stable descending sort; NaN revenue sinks to the bottom.
fn sort_by_revenue_desc<T>(rows: &mut [T], revenue: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| {
        let (ra, rb) = (revenue(a), revenue(b));
        match (ra.is_nan(), rb.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal),
        }
    });
}
