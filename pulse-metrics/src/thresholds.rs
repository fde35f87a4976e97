//! Alert thresholds and the fixed heuristics behind the derived metrics.
//!
//! Defaults are calibrated for a small network of luxury boutiques. Changing
//! a heuristic here affects the KPI engine, the boutique aggregator AND the
//! alert rules in `pulse-pipeline`, since they all read the same values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Assumed walk-ins per boutique per day. There is no traffic counter, so
/// conversion rates are transactions over this constant.
pub const VISITORS_PER_BOUTIQUE_PER_DAY: u32 = 100;

/// Trailing window, in days, for the per-boutique table.
pub const BOUTIQUE_WINDOW_DAYS: i64 = 7;

/// Trailing window, in days, of unit sales used to approximate COGS.
pub const TURNOVER_WINDOW_DAYS: i64 = 30;

/// Months per year used to annualise the 30-day COGS.
pub const ANNUALISATION_FACTOR: f64 = 12.0;

/// Days since last restock after which stock on hand counts as dead.
pub const DEAD_STOCK_DAYS: i64 = 180;

/// Share of inventory value (percent) tied up in dead stock before warning.
pub const DEAD_STOCK_ALERT_PCT: f64 = 10.0;

/// Maximum number of individual stockout alerts raised per evaluation.
pub const STOCKOUT_ALERT_LIMIT: usize = 5;

/// Wall-clock hour from which a boutique with no sales today is flagged.
pub const ZERO_TRANSACTION_CUTOFF_HOUR: u32 = 14;

/// A boutique below this fraction of the network mean revenue is flagged.
pub const UNDERPERFORMANCE_RATIO: f64 = 0.5;

/// Named alert thresholds.
///
/// Only `revenue_drop_pct` drives a rule today; the rest are carried so that
/// configuration files written for the full dashboard keep loading, and
/// `inventory_turnover_min` labels turnover as healthy or low.
///
/// Deserializes from a key/value map merged over the defaults, so unknown
/// keys are reported the same way as in `with_overrides`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>")]
pub struct ThresholdConfig {
    pub revenue_drop_pct: f64,
    pub sales_target_miss_pct: f64,
    pub low_stock_threshold: f64,
    pub conversion_drop_pct: f64,
    pub inventory_turnover_min: f64,
    pub shrinkage_rate_max: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            revenue_drop_pct: 15.0,
            sales_target_miss_pct: 20.0,
            low_stock_threshold: 5.0,
            conversion_drop_pct: 25.0,
            inventory_turnover_min: 2.0,
            shrinkage_rate_max: 1.5,
        }
    }
}

impl ThresholdConfig {
    /// Merge supplied values over the defaults, key by key.
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Self {
        let mut config = Self::default();
        for (key, value) in overrides {
            let slot = match key.as_str() {
                "revenue_drop_pct" => &mut config.revenue_drop_pct,
                "sales_target_miss_pct" => &mut config.sales_target_miss_pct,
                "low_stock_threshold" => &mut config.low_stock_threshold,
                "conversion_drop_pct" => &mut config.conversion_drop_pct,
                "inventory_turnover_min" => &mut config.inventory_turnover_min,
                "shrinkage_rate_max" => &mut config.shrinkage_rate_max,
                other => {
                    log::warn!("ignoring unknown threshold '{}'", other);
                    continue;
                }
            };
            *slot = *value;
        }
        config
    }
}

impl From<BTreeMap<String, f64>> for ThresholdConfig {
    fn from(overrides: BTreeMap<String, f64>) -> Self {
        Self::with_overrides(&overrides)
    }
}

/// Tunable stand-ins for signals the extracts do not carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    pub visitors_per_boutique_per_day: u32,
    pub boutique_window_days: i64,
    pub turnover_window_days: i64,
    pub dead_stock_days: i64,
    pub dead_stock_alert_pct: f64,
    pub stockout_alert_limit: usize,
    pub zero_transaction_cutoff_hour: u32,
    pub underperformance_ratio: f64,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            visitors_per_boutique_per_day: VISITORS_PER_BOUTIQUE_PER_DAY,
            boutique_window_days: BOUTIQUE_WINDOW_DAYS,
            turnover_window_days: TURNOVER_WINDOW_DAYS,
            dead_stock_days: DEAD_STOCK_DAYS,
            dead_stock_alert_pct: DEAD_STOCK_ALERT_PCT,
            stockout_alert_limit: STOCKOUT_ALERT_LIMIT,
            zero_transaction_cutoff_hour: ZERO_TRANSACTION_CUTOFF_HOUR,
            underperformance_ratio: UNDERPERFORMANCE_RATIO,
        }
    }
}

impl Heuristics {
    /// Visitors assumed over the whole boutique window (700 by default).
    pub fn window_visitors(&self) -> u32 {
        let days = u32::try_from(self.boutique_window_days.max(0)).unwrap_or(u32::MAX);
        self.visitors_per_boutique_per_day.saturating_mul(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_key_by_key() {
        let mut overrides = BTreeMap::new();
        overrides.insert("revenue_drop_pct".to_string(), 30.0);
        overrides.insert("not_a_threshold".to_string(), 1.0);

        let merged = ThresholdConfig::with_overrides(&overrides);
        assert_eq!(merged.revenue_drop_pct, 30.0);
        assert_eq!(merged.conversion_drop_pct, 25.0);
        assert_eq!(merged.shrinkage_rate_max, 1.5);
    }

    #[test]
    fn default_window_is_seven_hundred_visitors() {
        assert_eq!(Heuristics::default().window_visitors(), 700);
    }
}
