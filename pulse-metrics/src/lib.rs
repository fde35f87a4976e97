pub mod aggregates;
pub mod kpi;
pub mod math;
pub mod period;
pub mod records;
pub mod thresholds;
pub mod timestamp;

pub use aggregates::{
    boutique_metrics, category_metrics, category_stock, daily_revenue, BoutiqueMetrics,
    CategoryMetrics, CategoryStock, DailyRevenue,
};
pub use kpi::{compute_kpis, KpiEngine, KpiSnapshot, TurnoverStatus};
pub use records::{CustomerType, Dataset, InventoryRecord, SalesRecord};
pub use thresholds::{Heuristics, ThresholdConfig};
