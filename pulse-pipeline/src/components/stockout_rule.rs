use crate::alert::{Alert, AlertInput};
use crate::alert_rule::AlertRule;

/// Critical per zero-stock row, in table order, capped at
/// `stockout_alert_limit` (5 by default).
pub struct StockoutRule;

impl AlertRule for StockoutRule {
    fn enable(&self, input: &AlertInput<'_>) -> bool {
        !input.inventory.is_empty()
    }

    fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert> {
        input
            .inventory
            .iter()
            .filter(|r| r.is_stockout())
            .take(input.heuristics.stockout_alert_limit)
            .map(|r| Alert::critical(format!("STOCKOUT: {} at {}", r.product_name, r.boutique_id)))
            .collect()
    }
}
