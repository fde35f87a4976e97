//! CSV export of a dashboard refresh and of the tables behind it.
//!
//! Column names are the serde names of the row types, so an exported sales
//! or inventory table loads back through the same loader.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use pulse_metrics::{
    BoutiqueMetrics, CategoryMetrics, CategoryStock, DailyRevenue, Dataset, InventoryRecord,
    KpiSnapshot, SalesRecord,
};

use crate::error::ExportError;
use crate::report::DashboardReport;
use crate::util::plural;

pub const BOUTIQUE_FILE: &str = "Boutique_Performance.csv";
pub const KPI_FILE: &str = "KPIs.csv";
pub const CATEGORY_FILE: &str = "Category_Performance.csv";
pub const REVENUE_TREND_FILE: &str = "Daily_Revenue.csv";
pub const CATEGORY_STOCK_FILE: &str = "Category_Stock.csv";
pub const SALES_FILE: &str = "Sales_Data.csv";
pub const INVENTORY_FILE: &str = "Inventory_Data.csv";

/// A row type with a fixed CSV header.
///
/// `COLUMNS` must list the serialized field names in field order; it is
/// written on its own when a table has no rows.
pub trait TableRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

impl TableRow for BoutiqueMetrics {
    const COLUMNS: &'static [&'static str] = &[
        "Boutique_Name",
        "Region",
        "Revenue",
        "Units_Sold",
        "Transactions",
        "Estimated_Visitors",
        "Conversion_Rate",
        "ATV",
    ];
}

impl TableRow for CategoryMetrics {
    const COLUMNS: &'static [&'static str] =
        &["Category", "Revenue", "Units_Sold", "Transactions", "Revenue_Share"];
}

impl TableRow for KpiSnapshot {
    const COLUMNS: &'static [&'static str] = &[
        "daily_revenue",
        "revenue_growth",
        "atv",
        "atv_change",
        "conversion_rate",
        "conversion_change",
        "inventory_turnover",
        "low_stock_items",
        "stockout_risk",
    ];
}

impl TableRow for DailyRevenue {
    const COLUMNS: &'static [&'static str] = &["Date", "Revenue"];
}

impl TableRow for CategoryStock {
    const COLUMNS: &'static [&'static str] =
        &["Category", "Current_Stock_Units", "Min_Stock_Threshold"];
}

impl TableRow for SalesRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "Boutique_ID",
        "Boutique_Name",
        "Region",
        "SKU_Code",
        "Product_Category",
        "Brand",
        "Units_Sold",
        "Revenue_Local_Currency",
        "Revenue_USD",
        "Transaction_ID",
        "Sales_Associate_ID",
        "Customer_Type",
        "Payment_Method",
    ];
}

impl TableRow for InventoryRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "Boutique_ID",
        "SKU_Code",
        "Product_Name",
        "Category",
        "Brand",
        "Current_Stock_Units",
        "Min_Stock_Threshold",
        "Max_Stock_Threshold",
        "Unit_Cost",
        "Retail_Price",
        "Last_Restock_Date",
        "Supplier_Lead_Time_Days",
    ];
}

/// Serialize `rows` as CSV with a header row. An empty slice writes the
/// header alone.
pub fn write_csv<W: Write, T: TableRow>(writer: W, rows: &[T]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        wtr.write_record(T::COLUMNS)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_file<T: TableRow>(dir: &Path, name: &str, rows: &[T]) -> Result<PathBuf, ExportError> {
    let path = dir.join(name);
    write_csv(File::create(&path)?, rows)?;
    log::debug!(
        "wrote {} row{} to {}",
        rows.len(),
        plural(rows.len()),
        path.display()
    );
    Ok(path)
}

/// Write the boutique, KPI, category and chart-series tables into `dir`,
/// creating it if needed. Returns the written paths.
pub fn export_report(dir: &Path, report: &DashboardReport) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    Ok(vec![
        write_file(dir, BOUTIQUE_FILE, &report.boutiques)?,
        write_file(dir, KPI_FILE, std::slice::from_ref(&report.kpis))?,
        write_file(dir, CATEGORY_FILE, &report.categories)?,
        write_file(dir, REVENUE_TREND_FILE, &report.revenue_trend)?,
        write_file(dir, CATEGORY_STOCK_FILE, &report.category_stock)?,
    ])
}

/// Write the raw sales and inventory tables into `dir`.
pub fn export_dataset(dir: &Path, dataset: &Dataset) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    Ok(vec![
        write_file(dir, SALES_FILE, &dataset.sales)?,
        write_file(dir, INVENTORY_FILE, &dataset.inventory)?,
    ])
}
