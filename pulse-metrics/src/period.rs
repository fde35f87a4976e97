//! Calendar-day slicing of the sales table.
//!
//! Every "today", "yesterday" and "same day last week" reference is a
//! calendar-date equality filter over `SalesRecord::date`.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::math::{mean, safe_ratio};
use crate::records::SalesRecord;

/// Latest timestamp in the table, if any.
pub fn latest_timestamp(sales: &[SalesRecord]) -> Option<NaiveDateTime> {
    sales.iter().map(|r| r.date).max()
}

/// Start of a trailing window of `days` ending at `end`.
///
/// `None` when the span does not fit in a timestamp; callers treat that as
/// an unbounded window.
pub fn window_start(end: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    Duration::try_days(days).and_then(|span| end.checked_sub_signed(span))
}

/// Whether `ts` falls inside a window starting at `start` (`None` = unbounded).
pub fn in_window(ts: NaiveDateTime, start: Option<NaiveDateTime>) -> bool {
    start.map_or(true, |s| ts >= s)
}

/// Rows whose calendar date equals `day`, in table order.
pub fn rows_on(sales: &[SalesRecord], day: NaiveDate) -> Vec<&SalesRecord> {
    sales.iter().filter(|r| r.date.date() == day).collect()
}

/// Totals for one slice of sales rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DaySummary {
    pub revenue: f64,
    /// Mean per-transaction revenue, summing line items within a transaction.
    pub atv: f64,
    pub transactions: usize,
    pub boutiques: usize,
}

impl DaySummary {
    pub fn from_rows(rows: &[&SalesRecord]) -> Self {
        let mut per_transaction: HashMap<&str, f64> = HashMap::new();
        let mut boutiques: HashSet<&str> = HashSet::new();
        let mut revenue = 0.0;

        for row in rows {
            revenue += row.revenue_usd;
            *per_transaction.entry(row.transaction_id.as_str()).or_insert(0.0) +=
                row.revenue_usd;
            boutiques.insert(row.boutique_id.as_str());
        }

        Self {
            revenue,
            atv: mean(per_transaction.values().copied()),
            transactions: per_transaction.len(),
            boutiques: boutiques.len(),
        }
    }

    /// Transactions over assumed visitors, in percent.
    pub fn conversion_rate(&self, visitors_per_boutique: u32) -> f64 {
        let visitors = self.boutiques as f64 * visitors_per_boutique as f64;
        safe_ratio(self.transactions as f64, visitors) * 100.0
    }
}
