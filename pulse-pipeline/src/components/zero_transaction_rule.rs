use std::collections::BTreeSet;

use chrono::Timelike;

use pulse_metrics::period::{latest_timestamp, rows_on};

use crate::alert::{Alert, AlertInput};
use crate::alert_rule::AlertRule;

/// Critical for each boutique with sales history but nothing on the latest
/// day. Only runs from the cutoff hour (14:00 by default) onwards; the wall
/// clock gates the rule, the table's latest date is the reference day.
pub struct ZeroTransactionRule;

impl AlertRule for ZeroTransactionRule {
    fn enable(&self, input: &AlertInput<'_>) -> bool {
        !input.sales.is_empty()
            && input.now.hour() >= input.heuristics.zero_transaction_cutoff_hour
    }

    fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert> {
        let Some(latest) = latest_timestamp(input.sales) else {
            return Vec::new();
        };

        let trading: BTreeSet<&str> = rows_on(input.sales, latest.date())
            .into_iter()
            .map(|r| r.boutique_name.as_str())
            .collect();
        let known: BTreeSet<&str> = input
            .sales
            .iter()
            .map(|r| r.boutique_name.as_str())
            .collect();

        known
            .difference(&trading)
            .map(|boutique| Alert::critical(format!("{} has ZERO transactions today", boutique)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::fixtures::{at, sale, Tables};

    fn history() -> Tables {
        Tables::new(
            vec![
                sale(at(9, 10), "Tokyo Ginza", "T1", 1_000.0),
                sale(at(9, 11), "Dubai Mall", "T2", 1_000.0),
                sale(at(9, 12), "Paris", "T3", 1_000.0),
                sale(at(10, 10), "Dubai Mall", "T4", 1_000.0),
            ],
            vec![],
        )
    }

    #[test]
    fn gated_before_cutoff_hour() {
        let tables = history();
        let before = tables.input(at(10, 13) + chrono::Duration::minutes(59));
        assert!(!ZeroTransactionRule.enable(&before));
        assert!(ZeroTransactionRule.enable(&tables.input(at(10, 14))));
    }

    #[test]
    fn names_boutiques_missing_from_latest_day() {
        let tables = history();
        let alerts = ZeroTransactionRule.evaluate(&tables.input(at(10, 16)));
        assert_eq!(
            alerts,
            vec![
                Alert::critical("Paris has ZERO transactions today"),
                Alert::critical("Tokyo Ginza has ZERO transactions today"),
            ]
        );
    }

    #[test]
    fn everyone_trading_means_no_alert() {
        let tables = Tables::new(vec![sale(at(10, 10), "Dubai Mall", "T1", 1.0)], vec![]);
        assert!(ZeroTransactionRule.evaluate(&tables.input(at(10, 16))).is_empty());
    }
}
