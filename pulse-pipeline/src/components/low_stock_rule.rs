use crate::alert::{Alert, AlertInput};
use crate::alert_rule::AlertRule;

/// One aggregate warning counting rows at or below their minimum stock.
pub struct LowStockRule;

impl AlertRule for LowStockRule {
    fn enable(&self, input: &AlertInput<'_>) -> bool {
        !input.inventory.is_empty()
    }

    fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert> {
        let low = input.inventory.iter().filter(|r| r.is_low_stock()).count();
        if low == 0 {
            return Vec::new();
        }
        vec![Alert::warning(format!(
            "{} SKUs below minimum stock threshold",
            low
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::fixtures::{at, stock, Tables};

    #[test]
    fn counts_rows_at_or_below_minimum() {
        let tables = Tables::new(
            vec![],
            vec![
                stock("Love Bracelet", "BTQ001", 5, 5, 3_000.0),
                stock("Juste un Clou", "BTQ001", 2, 5, 3_000.0),
                stock("Tank Must", "BTQ002", 6, 5, 3_000.0),
            ],
        );
        let alerts = LowStockRule.evaluate(&tables.input(at(10, 9)));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "2 SKUs below minimum stock threshold");
    }

    #[test]
    fn healthy_stock_is_quiet() {
        let tables = Tables::new(vec![], vec![stock("Tank Must", "BTQ002", 9, 5, 1.0)]);
        assert!(LowStockRule.evaluate(&tables.input(at(10, 9))).is_empty());
    }
}
