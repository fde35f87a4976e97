use pulse_metrics::math::safe_ratio;
use pulse_metrics::records::InventoryRecord;

use crate::alert::{Alert, AlertInput};
use crate::alert_rule::AlertRule;

/// Warns when stock not restocked for more than `dead_stock_days` (180)
/// holds over `dead_stock_alert_pct` (10%) of total inventory value at cost.
///
/// Rows without a restock date never count as dead.
pub struct DeadStockRule;

impl DeadStockRule {
    fn is_dead(row: &InventoryRecord, input: &AlertInput<'_>) -> bool {
        match row.last_restock_date {
            Some(restocked) => {
                (input.now - restocked).num_days() > input.heuristics.dead_stock_days
                    && row.current_stock_units > 0
            }
            None => false,
        }
    }
}

impl AlertRule for DeadStockRule {
    fn enable(&self, input: &AlertInput<'_>) -> bool {
        !input.inventory.is_empty()
    }

    fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert> {
        let total_value: f64 = input.inventory.iter().map(InventoryRecord::stock_value).sum();
        let dead_value: f64 = input
            .inventory
            .iter()
            .filter(|r| Self::is_dead(r, input))
            .map(InventoryRecord::stock_value)
            .sum();

        let dead_pct = safe_ratio(dead_value, total_value) * 100.0;
        if dead_pct > input.heuristics.dead_stock_alert_pct {
            vec![Alert::warning(format!(
                "Dead stock (>{} days) represents {:.1}% of inventory value",
                input.heuristics.dead_stock_days, dead_pct
            ))]
        } else {
            Vec::new()
        }
    }
}
