use std::collections::BTreeMap;

use pulse_metrics::math::mean;
use pulse_metrics::period::{latest_timestamp, rows_on};

use crate::alert::{Alert, AlertInput};
use crate::alert_rule::AlertRule;

/// Warns for each boutique whose latest-day revenue is below half the mean
/// across boutiques that traded that day.
pub struct UnderperformingBoutiqueRule;

impl AlertRule for UnderperformingBoutiqueRule {
    fn enable(&self, input: &AlertInput<'_>) -> bool {
        !input.sales.is_empty()
    }

    fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert> {
        let Some(latest) = latest_timestamp(input.sales) else {
            return Vec::new();
        };

        let mut revenue_by_boutique: BTreeMap<&str, f64> = BTreeMap::new();
        for row in rows_on(input.sales, latest.date()) {
            *revenue_by_boutique
                .entry(row.boutique_name.as_str())
                .or_insert(0.0) += row.revenue_usd;
        }

        let floor = mean(revenue_by_boutique.values().copied())
            * input.heuristics.underperformance_ratio;

        revenue_by_boutique
            .into_iter()
            .filter(|(_, revenue)| *revenue < floor)
            .map(|(boutique, _)| {
                Alert::warning(format!(
                    "{} revenue significantly below network average",
                    boutique
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::fixtures::{at, sale, Tables};

    #[test]
    fn flags_each_boutique_below_half_the_mean() {
        let tables = Tables::new(
            vec![
                sale(at(10, 10), "Dubai Mall", "T1", 30_000.0),
                sale(at(10, 11), "Tokyo Ginza", "T2", 27_000.0),
                sale(at(10, 12), "London Bond Street", "T3", 2_000.0),
                sale(at(10, 13), "NYC Fifth Avenue", "T4", 1_000.0),
                // Earlier day is ignored.
                sale(at(9, 13), "Hong Kong Central", "T5", 1.0),
            ],
            vec![],
        );
        // mean = 15_000, floor = 7_500
        let alerts = UnderperformingBoutiqueRule.evaluate(&tables.input(at(10, 20)));
        assert_eq!(
            alerts,
            vec![
                Alert::warning("London Bond Street revenue significantly below network average"),
                Alert::warning("NYC Fifth Avenue revenue significantly below network average"),
            ]
        );
    }

    #[test]
    fn single_boutique_never_underperforms_itself() {
        let tables = Tables::new(vec![sale(at(10, 10), "Dubai Mall", "T1", 5.0)], vec![]);
        assert!(UnderperformingBoutiqueRule
            .evaluate(&tables.input(at(10, 20)))
            .is_empty());
    }

    #[test]
    fn line_items_are_summed_per_boutique() {
        let tables = Tables::new(
            vec![
                sale(at(10, 10), "Paris", "T1", 1_000.0),
                sale(at(10, 10), "Paris", "T1", 1_000.0),
                sale(at(10, 11), "Tokyo", "T2", 2_000.0),
            ],
            vec![],
        );
        assert!(UnderperformingBoutiqueRule
            .evaluate(&tables.input(at(10, 20)))
            .is_empty());
    }
}
