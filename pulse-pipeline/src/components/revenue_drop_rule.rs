use chrono::Duration;

use pulse_metrics::math::pct_change;
use pulse_metrics::period::{latest_timestamp, rows_on, DaySummary};

use crate::alert::{Alert, AlertInput};
use crate::alert_rule::AlertRule;

/// Critical when the latest day's revenue fell more than `revenue_drop_pct`
/// against the same weekday one week earlier.
///
/// Compares against the table's latest date, not the wall clock.
pub struct RevenueDropRule;

impl AlertRule for RevenueDropRule {
    fn enable(&self, input: &AlertInput<'_>) -> bool {
        !input.sales.is_empty()
    }

    fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert> {
        let Some(latest) = latest_timestamp(input.sales) else {
            return Vec::new();
        };
        let latest_day = latest.date();
        let week_ago = latest_day - Duration::days(7);

        let today = DaySummary::from_rows(&rows_on(input.sales, latest_day));
        let last_week = DaySummary::from_rows(&rows_on(input.sales, week_ago));

        if last_week.revenue <= 0.0 {
            return Vec::new();
        }

        let change = pct_change(today.revenue, last_week.revenue);
        if change < -input.thresholds.revenue_drop_pct {
            vec![Alert::critical(format!(
                "Revenue dropped {:.1}% vs. same day last week",
                change.abs()
            ))]
        } else {
            Vec::new()
        }
    }
}
