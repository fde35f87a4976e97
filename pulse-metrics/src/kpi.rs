//! Day-over-day KPI computation.
//!
//! "Today" is the wall-clock date when the sales table has rows for it,
//! otherwise the table's latest date (extracts usually lag by a day).
//! "Yesterday" is always the day before whichever "today" was chosen.
//!
//! Inventory turnover is approximated as
//! `(units sold in the last 30 days × mean unit cost × 12) / Σ(stock × cost)`,
//! mixing a sales window with a point-in-time snapshot and a network-wide
//! mean cost. The approximation is kept as-is for comparability with
//! historical dashboards.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::math::{mean, pct_change, safe_ratio};
use crate::period::{in_window, latest_timestamp, rows_on, window_start, DaySummary};
use crate::records::{InventoryRecord, SalesRecord};
use crate::thresholds::{Heuristics, ThresholdConfig, ANNUALISATION_FACTOR};

/// Scalar indicators for the resolved "today".
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub daily_revenue: f64,
    /// Percent change vs. yesterday; 0 when yesterday had no revenue.
    pub revenue_growth: f64,
    pub atv: f64,
    pub atv_change: f64,
    pub conversion_rate: f64,
    /// Percentage-point difference, not a relative change.
    pub conversion_change: f64,
    pub inventory_turnover: f64,
    pub low_stock_items: usize,
    pub stockout_risk: usize,
}

/// Turnover label shown next to the turnover figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TurnoverStatus {
    Healthy,
    Low,
}

impl fmt::Display for TurnoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnoverStatus::Healthy => write!(f, "Healthy"),
            TurnoverStatus::Low => write!(f, "Low"),
        }
    }
}

impl KpiSnapshot {
    pub fn turnover_status(&self, thresholds: &ThresholdConfig) -> TurnoverStatus {
        if self.inventory_turnover > thresholds.inventory_turnover_min {
            TurnoverStatus::Healthy
        } else {
            TurnoverStatus::Low
        }
    }
}

/// Computes `KpiSnapshot`s. Holds no state besides its heuristics.
#[derive(Clone, Debug, Default)]
pub struct KpiEngine {
    heuristics: Heuristics,
}

impl KpiEngine {
    pub fn new(heuristics: Heuristics) -> Self {
        Self { heuristics }
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Compute every KPI from scratch for the given tables.
    pub fn compute(
        &self,
        sales: &[SalesRecord],
        inventory: &[InventoryRecord],
        now: NaiveDateTime,
    ) -> KpiSnapshot {
        let visitors = self.heuristics.visitors_per_boutique_per_day;

        let (today, yesterday) = match resolve_today(sales, now) {
            Some(day) => {
                let prev = day - Duration::days(1);
                (
                    DaySummary::from_rows(&rows_on(sales, day)),
                    DaySummary::from_rows(&rows_on(sales, prev)),
                )
            }
            None => (DaySummary::default(), DaySummary::default()),
        };

        let conversion_rate = today.conversion_rate(visitors);
        let prev_conversion = yesterday.conversion_rate(visitors);

        KpiSnapshot {
            daily_revenue: today.revenue,
            revenue_growth: pct_change(today.revenue, yesterday.revenue),
            atv: today.atv,
            atv_change: pct_change(today.atv, yesterday.atv),
            conversion_rate,
            conversion_change: conversion_rate - prev_conversion,
            inventory_turnover: self.inventory_turnover(sales, inventory, now),
            low_stock_items: inventory.iter().filter(|r| r.is_low_stock()).count(),
            stockout_risk: inventory.iter().filter(|r| r.is_stockout()).count(),
        }
    }

    fn inventory_turnover(
        &self,
        sales: &[SalesRecord],
        inventory: &[InventoryRecord],
        now: NaiveDateTime,
    ) -> f64 {
        let inventory_value: f64 = inventory.iter().map(InventoryRecord::stock_value).sum();

        let start = window_start(now, self.heuristics.turnover_window_days);
        let units: f64 = sales
            .iter()
            .filter(|r| in_window(r.date, start))
            .map(|r| r.units_sold as f64)
            .sum();
        let mean_cost = mean(inventory.iter().filter_map(|r| r.unit_cost));
        let annual_cogs = units * mean_cost * ANNUALISATION_FACTOR;

        safe_ratio(annual_cogs, inventory_value)
    }
}

/// KPIs with default heuristics.
pub fn compute_kpis(
    sales: &[SalesRecord],
    inventory: &[InventoryRecord],
    now: NaiveDateTime,
) -> KpiSnapshot {
    KpiEngine::default().compute(sales, inventory, now)
}

/// The calendar day treated as "today"; `None` only for an empty table.
pub fn resolve_today(sales: &[SalesRecord], now: NaiveDateTime) -> Option<NaiveDate> {
    let wall_clock = now.date();
    if sales.iter().any(|r| r.date.date() == wall_clock) {
        return Some(wall_clock);
    }
    latest_timestamp(sales).map(|ts| ts.date())
}
