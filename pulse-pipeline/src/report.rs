use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use pulse_metrics::aggregates::{
    boutique_metrics_with, category_metrics, category_stock, daily_revenue,
};
use pulse_metrics::{
    BoutiqueMetrics, CategoryMetrics, CategoryStock, DailyRevenue, Dataset, KpiEngine,
    KpiSnapshot,
};

use crate::alert::{AlertInput, AlertReport};
use crate::alert_engine::AlertEngine;
use crate::config::DashboardConfig;
use crate::loader::LoadOutcome;
use crate::util::plural;

/// Everything one dashboard refresh shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardReport {
    #[serde(serialize_with = "pulse_metrics::timestamp::serialize_timestamp")]
    pub generated_at: NaiveDateTime,
    pub kpis: KpiSnapshot,
    pub alerts: AlertReport,
    pub boutiques: Vec<BoutiqueMetrics>,
    pub categories: Vec<CategoryMetrics>,
    pub revenue_trend: Vec<DailyRevenue>,
    pub category_stock: Vec<CategoryStock>,
}

/// One refresh over a loaded dataset.
///
/// Flow:
/// 1. KpiEngine computes the day-over-day snapshot
/// 2. AlertEngine runs the six alert rules
/// 3. boutique and category tables are aggregated
/// 4. the daily revenue trend and per-category stock series are built
///
/// Nothing is cached between refreshes; each `run` recomputes from the tables.
pub struct ReportContext<'a> {
    pub dataset: &'a Dataset,
    pub config: &'a DashboardConfig,
    pub now: NaiveDateTime,
}

impl<'a> ReportContext<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a DashboardConfig, now: NaiveDateTime) -> Self {
        Self {
            dataset,
            config,
            now,
        }
    }

    pub fn run(&self) -> DashboardReport {
        let Dataset { sales, inventory } = self.dataset;
        let heuristics = &self.config.heuristics;

        let kpis = KpiEngine::new(heuristics.clone()).compute(sales, inventory, self.now);
        let alerts = AlertEngine::default().check(&AlertInput {
            sales,
            inventory,
            thresholds: &self.config.thresholds,
            heuristics,
            now: self.now,
        });

        log::info!(
            "dashboard refreshed: {} sales rows, {} inventory rows, {} critical / {} warning alerts",
            sales.len(),
            inventory.len(),
            alerts.critical.len(),
            alerts.warning.len()
        );

        DashboardReport {
            generated_at: self.now,
            kpis,
            alerts,
            boutiques: boutique_metrics_with(sales, heuristics),
            categories: category_metrics(sales),
            revenue_trend: daily_revenue(sales),
            category_stock: category_stock(inventory),
        }
    }
}

/// Holds the dataset currently on display.
///
/// A new upload replaces the dataset only if it loaded without errors;
/// otherwise the previous dataset stays visible.
#[derive(Clone, Debug, Default)]
pub struct Session {
    dataset: Option<Arc<Dataset>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.clone()
    }

    pub fn replace(&mut self, dataset: Dataset) {
        log::info!(
            "session dataset replaced: {} sales rows, {} inventory rows",
            dataset.sales.len(),
            dataset.inventory.len()
        );
        self.dataset = Some(Arc::new(dataset));
    }

    /// Adopt a load result. On error the current dataset is kept and the
    /// errors are handed back for display.
    pub fn ingest(&mut self, outcome: LoadOutcome) -> Result<(), Vec<String>> {
        match outcome.into_dataset() {
            Ok(dataset) => {
                self.replace(dataset);
                Ok(())
            }
            Err(errors) => {
                log::warn!(
                    "upload rejected with {} error{}, keeping previous dataset",
                    errors.len(),
                    plural(errors.len())
                );
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::fixtures::{at, sale, stock};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                sale(at(9, 11), "Paris", "T1", 10_000.0),
                sale(at(10, 11), "Paris", "T2", 8_000.0),
            ],
            vec![stock("Santos", "BTQ001", 0, 5, 1_000.0)],
        )
    }

    #[test]
    fn run_combines_every_section() {
        let data = dataset();
        let config = DashboardConfig::default();
        let report = ReportContext::new(&data, &config, at(10, 9)).run();

        assert_eq!(report.kpis.daily_revenue, 8_000.0);
        assert!((report.kpis.revenue_growth + 20.0).abs() < 1e-9);
        assert_eq!(report.kpis.stockout_risk, 1);
        assert_eq!(report.alerts.critical, vec!["STOCKOUT: Santos at BTQ001".to_string()]);
        assert_eq!(report.boutiques.len(), 1);
        assert_eq!(report.categories[0].revenue_share, 100.0);
        assert_eq!(report.generated_at, at(10, 9));

        let days: Vec<f64> = report.revenue_trend.iter().map(|d| d.revenue).collect();
        assert_eq!(days, vec![10_000.0, 8_000.0]);
        assert_eq!(report.category_stock.len(), 1);
        assert_eq!(report.category_stock[0].min_stock_threshold, 5);
    }

    #[test]
    fn report_serializes_with_table_column_names() {
        let data = dataset();
        let config = DashboardConfig::default();
        let report = ReportContext::new(&data, &config, at(10, 9)).run();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["generated_at"], "2024-06-10 09:00:00");
        assert_eq!(json["kpis"]["stockout_risk"], 1);
        assert_eq!(json["alerts"]["critical"][0], "STOCKOUT: Santos at BTQ001");
        assert_eq!(json["boutiques"][0]["Boutique_Name"], "Paris");
        assert_eq!(json["categories"][0]["Category"], "Watches");
        assert_eq!(json["revenue_trend"][0]["Date"], "2024-06-09");
        assert_eq!(json["category_stock"][0]["Current_Stock_Units"], 0);
    }

    #[test]
    fn failed_upload_keeps_previous_dataset() {
        let mut session = Session::new();
        assert!(session.dataset().is_none());

        session.replace(dataset());
        let outcome = LoadOutcome {
            sales: None,
            inventory: None,
            errors: vec!["Sales Report is missing columns: Date".to_string()],
        };
        let errors = session.ingest(outcome).unwrap_err();

        assert_eq!(errors, vec!["Sales Report is missing columns: Date".to_string()]);
        assert_eq!(session.dataset().unwrap().sales.len(), 2);
    }

    #[test]
    fn clean_upload_swaps_dataset() {
        let mut session = Session::new();
        session.replace(dataset());
        let outcome = LoadOutcome {
            sales: Some(vec![]),
            inventory: Some(vec![]),
            errors: vec![],
        };
        session.ingest(outcome).unwrap();
        assert!(session.dataset().unwrap().sales.is_empty());
    }
}
