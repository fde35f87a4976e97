use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use pulse_metrics::records::{InventoryRecord, SalesRecord};
use pulse_metrics::thresholds::{Heuristics, ThresholdConfig};

use crate::alert::{AlertInput, AlertReport};
use crate::alert_rule::AlertRule;
use crate::components::dead_stock_rule::DeadStockRule;
use crate::components::low_stock_rule::LowStockRule;
use crate::components::revenue_drop_rule::RevenueDropRule;
use crate::components::stockout_rule::StockoutRule;
use crate::components::underperforming_boutique_rule::UnderperformingBoutiqueRule;
use crate::components::zero_transaction_rule::ZeroTransactionRule;
use crate::util::plural;

/// Runs a fixed list of alert rules and collects every alert they raise.
///
/// Rule order:
/// 1. RevenueDropRule: latest day vs. same day last week (critical)
/// 2. UnderperformingBoutiqueRule: below half the network mean (warning)
/// 3. ZeroTransactionRule: no sales on the latest day, from 14:00 (critical)
/// 4. LowStockRule: aggregate count at or below minimum (warning)
/// 5. StockoutRule: first five zero-stock rows (critical)
/// 6. DeadStockRule: stale stock share of value (warning)
///
/// Within each severity list, alerts keep this order.
pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::with_rules(vec![
            Box::new(RevenueDropRule),
            Box::new(UnderperformingBoutiqueRule),
            Box::new(ZeroTransactionRule),
            Box::new(LowStockRule),
            Box::new(StockoutRule),
            Box::new(DeadStockRule),
        ])
    }
}

impl AlertEngine {
    pub fn with_rules(rules: Vec<Box<dyn AlertRule>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Box<dyn AlertRule>] {
        &self.rules
    }

    pub fn check(&self, input: &AlertInput<'_>) -> AlertReport {
        let mut report = AlertReport::default();
        for rule in &self.rules {
            if !rule.enable(input) {
                log::debug!("alert rule {} skipped", rule.name());
                continue;
            }
            let alerts = rule.evaluate(input);
            if !alerts.is_empty() {
                log::debug!(
                    "alert rule {} raised {} alert{}",
                    rule.name(),
                    alerts.len(),
                    plural(alerts.len())
                );
            }
            report.extend(alerts);
        }
        report
    }
}

/// Evaluate the default rules with `overrides` merged over default thresholds.
pub fn check_alerts(
    sales: &[SalesRecord],
    inventory: &[InventoryRecord],
    overrides: &BTreeMap<String, f64>,
    now: NaiveDateTime,
) -> AlertReport {
    let thresholds = ThresholdConfig::with_overrides(overrides);
    let heuristics = Heuristics::default();
    AlertEngine::default().check(&AlertInput {
        sales,
        inventory,
        thresholds: &thresholds,
        heuristics: &heuristics,
        now,
    })
}
