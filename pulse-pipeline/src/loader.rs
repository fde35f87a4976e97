//! Sales and inventory extract loader.
//!
//! A file is read into a `RawTable` (header row + string cells), its header
//! is checked by the validator, and only then are the rows deserialized into
//! typed records. `.csv` files go through the CSV reader; anything else is
//! opened as a spreadsheet and its first worksheet is used.
//!
//! Failures never escape as errors: each file's problems become user-facing
//! strings in `LoadOutcome::errors` and that table is left absent, while the
//! other file is still loaded.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::StringRecord;
use serde::de::DeserializeOwned;

use pulse_metrics::records::{
    Dataset, InventoryRecord, SalesRecord, INVENTORY_REQUIRED_COLUMNS, SALES_REQUIRED_COLUMNS,
};
use pulse_metrics::timestamp::format_timestamp;

use crate::error::IngestError;
use crate::validator::validate;

/// How a source file is parsed, decided by its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Delimited,
    Spreadsheet,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SourceKind::Delimited,
            _ => SourceKind::Spreadsheet,
        }
    }
}

/// Which extract a table is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Sales,
    Inventory,
}

impl TableKind {
    /// Label used in structural error messages.
    pub fn label(&self) -> &'static str {
        match self {
            TableKind::Sales => "Sales Report",
            TableKind::Inventory => "Inventory Report",
        }
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Sales => SALES_REQUIRED_COLUMNS,
            TableKind::Inventory => INVENTORY_REQUIRED_COLUMNS,
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            TableKind::Sales => "sales",
            TableKind::Inventory => "inventory",
        }
    }
}

/// Untyped table: a header row plus string cells.
#[derive(Clone, Debug, Default)]
pub struct RawTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: StringRecord::from(headers),
            rows: rows.into_iter().map(StringRecord::from).collect(),
        }
    }

    /// Read a delimited table from any reader. Cells are trimmed.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, IngestError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let rows = csv_reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, rows })
    }

    /// Read the first worksheet of a workbook; its first row is the header.
    pub fn from_spreadsheet(path: &Path) -> Result<Self, IngestError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| IngestError::Spreadsheet(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IngestError::EmptySpreadsheet(path.to_path_buf()))?
            .map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| IngestError::EmptySpreadsheet(path.to_path_buf()))?
            .iter()
            .map(|c| cell_text(c).trim().to_string())
            .collect();

        let body = rows
            .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        Ok(Self::new(headers, body))
    }

    /// Open `path` and parse it according to its extension.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        match SourceKind::from_path(path) {
            SourceKind::Delimited => {
                let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_csv_reader(file)
            }
            SourceKind::Spreadsheet => Self::from_spreadsheet(path),
        }
    }

    pub fn columns(&self) -> Vec<String> {
        self.headers.iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Deserialize every row by header name. Stops at the first bad row.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>, IngestError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                row.deserialize(Some(&self.headers))
                    .map_err(|e| IngestError::Row {
                        // 1-based, counting the header row.
                        line: idx + 2,
                        reason: csv_reason(&e),
                    })
            })
            .collect()
    }
}

/// Result of loading both extracts.
#[derive(Clone, Debug, Default)]
pub struct LoadOutcome {
    pub sales: Option<Vec<SalesRecord>>,
    pub inventory: Option<Vec<InventoryRecord>>,
    pub errors: Vec<String>,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Both tables, or every error. Any error blocks both tables.
    pub fn into_dataset(self) -> Result<Dataset, Vec<String>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        match (self.sales, self.inventory) {
            (Some(sales), Some(inventory)) => Ok(Dataset::new(sales, inventory)),
            _ => Err(vec!["Both a sales and an inventory report are required".to_string()]),
        }
    }
}

/// Load and validate the two extract files.
pub fn load_data(sales_path: &Path, inventory_path: &Path) -> LoadOutcome {
    log::info!(
        "loading sales from {} ({:?}), inventory from {} ({:?})",
        sales_path.display(),
        SourceKind::from_path(sales_path),
        inventory_path.display(),
        SourceKind::from_path(inventory_path)
    );
    load_tables(
        RawTable::from_path(sales_path),
        RawTable::from_path(inventory_path),
    )
}

/// Validate and type two already-read tables.
pub fn load_tables(
    sales: Result<RawTable, IngestError>,
    inventory: Result<RawTable, IngestError>,
) -> LoadOutcome {
    let mut errors = Vec::new();
    let sales = ingest::<SalesRecord>(TableKind::Sales, sales, &mut errors);
    let inventory = ingest::<InventoryRecord>(TableKind::Inventory, inventory, &mut errors);
    LoadOutcome {
        sales,
        inventory,
        errors,
    }
}

fn ingest<T: DeserializeOwned>(
    kind: TableKind,
    raw: Result<RawTable, IngestError>,
    errors: &mut Vec<String>,
) -> Option<Vec<T>> {
    let raw = match raw {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("{} file unreadable: {}", kind.noun(), e);
            errors.push(format!("Error loading {} file: {}", kind.noun(), e));
            return None;
        }
    };

    let structural = validate(&raw.columns(), kind.required_columns(), kind.label());
    if !structural.is_empty() {
        log::warn!("{} failed header validation", kind.label());
        errors.extend(structural);
        return None;
    }

    match raw.deserialize::<T>() {
        Ok(records) => {
            log::info!("loaded {} {} rows", records.len(), kind.noun());
            Some(records)
        }
        Err(e) => {
            log::warn!("{} file rejected: {}", kind.noun(), e);
            errors.push(format!("Error loading {} file: {}", kind.noun(), e));
            None
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other
            .as_datetime()
            .map(|ts| format_timestamp(&ts))
            .unwrap_or_else(|| other.to_string()),
    }
}

/// csv's deserialize errors carry a position we already report; keep the cause.
fn csv_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALES_CSV: &str = "\
Date,Boutique_ID,Boutique_Name,Region,SKU_Code,Product_Category,Brand,Units_Sold,Revenue_Local_Currency,Revenue_USD,Transaction_ID,Sales_Associate_ID,Customer_Type,Payment_Method
2024-06-10,BTQ001,Dubai Mall,Middle East,SKU1234,Watches,Rolex,1,18000,4900.5,TXN202406100001,SA101,VIP,Credit Card
2024-06-10,BTQ001,Dubai Mall,Middle East,SKU1235,Jewelry,Cartier,2,,5100,TXN202406100001,,Returning,
2024-06-11 15:45:00,BTQ002,Paris Champs-Élysées,Europe,SKU4321,Accessories,Cartier,1.0,900,1000,TXN202406110001,SA202,New,Cash
";

    const INVENTORY_CSV: &str = "\
Date,Boutique_ID,SKU_Code,Product_Name,Category,Brand,Current_Stock_Units,Min_Stock_Threshold,Retail_Price
2024-06-11,BTQ001,SKU1000,Luxury Item 0,Watches,Rolex,0,5,25000
2024-06-11,BTQ001,SKU1001,Luxury Item 1,Jewelry,Cartier,12,5,8000
";

    fn csv(text: &str) -> Result<RawTable, IngestError> {
        RawTable::from_csv_reader(text.as_bytes())
    }

    #[test]
    fn loads_clean_extracts() {
        let outcome = load_tables(csv(SALES_CSV), csv(INVENTORY_CSV));
        assert!(outcome.is_clean(), "{:?}", outcome.errors);

        let sales = outcome.sales.clone().unwrap();
        assert_eq!(sales.len(), 3);
        assert_eq!(sales[0].revenue_local_currency, Some(18000.0));
        assert_eq!(sales[1].revenue_local_currency, None);
        assert_eq!(sales[1].sales_associate_id, None);
        assert_eq!(sales[2].units_sold, 1);
        assert_eq!(sales[2].boutique_name, "Paris Champs-Élysées");
        assert_eq!(sales[0].customer_type, pulse_metrics::CustomerType::Vip);

        let inventory = outcome.inventory.clone().unwrap();
        // Optional columns absent from the extract.
        assert_eq!(inventory[0].unit_cost, None);
        assert!(inventory[0].last_restock_date.is_none());
        assert!(inventory[0].max_stock_threshold.is_none());

        let dataset = outcome.into_dataset().unwrap();
        assert_eq!(dataset.inventory.len(), 2);
    }

    #[test]
    fn bad_date_marks_only_that_table_absent() {
        let broken = SALES_CSV.replace(
            "2024-06-10,BTQ001,Dubai Mall,Middle East,SKU1234",
            "yesterday-ish,BTQ001,Dubai Mall,Middle East,SKU1234",
        );
        let outcome = load_tables(csv(&broken), csv(INVENTORY_CSV));

        assert!(outcome.sales.is_none());
        assert!(outcome.inventory.is_some());
        assert_eq!(outcome.errors.len(), 1);
        assert!(
            outcome.errors[0].starts_with("Error loading sales file: row 2"),
            "{}",
            outcome.errors[0]
        );
        assert!(outcome.into_dataset().is_err());
    }

    #[test]
    fn blank_unit_cost_cell_loads_as_unknown() {
        let inventory = "\
Date,Boutique_ID,SKU_Code,Product_Name,Category,Brand,Current_Stock_Units,Min_Stock_Threshold,Unit_Cost,Retail_Price
2024-06-11,BTQ001,SKU1000,Luxury Item 0,Watches,Rolex,4,5,,25000
2024-06-11,BTQ001,SKU1001,Luxury Item 1,Jewelry,Cartier,12,5,3200.5,8000
";
        let outcome = load_tables(csv(SALES_CSV), csv(inventory));
        assert!(outcome.is_clean(), "{:?}", outcome.errors);

        let inventory = outcome.inventory.unwrap();
        assert_eq!(inventory[0].unit_cost, None);
        assert_eq!(inventory[0].stock_value(), 0.0);
        assert_eq!(inventory[1].unit_cost, Some(3200.5));
    }

    #[test]
    fn missing_columns_are_reported_and_block_the_table() {
        let inventory = "Date,Boutique_ID,SKU_Code\n2024-06-11,BTQ001,SKU1000\n";
        let outcome = load_tables(csv(SALES_CSV), csv(inventory));

        assert!(outcome.sales.is_some());
        assert!(outcome.inventory.is_none());
        assert_eq!(
            outcome.errors,
            vec![
                "Inventory Report is missing columns: Product_Name, Category, Brand, Current_Stock_Units, Min_Stock_Threshold, Retail_Price"
                    .to_string()
            ]
        );
    }

    #[test]
    fn unreadable_file_becomes_load_error() {
        let missing = Path::new("/definitely/not/here/sales.csv");
        let outcome = load_tables(RawTable::from_path(missing), csv(INVENTORY_CSV));
        assert!(outcome.sales.is_none());
        assert!(outcome.errors[0].starts_with("Error loading sales file: failed to open"));
    }

    #[test]
    fn unknown_customer_type_is_a_parse_error() {
        let broken = SALES_CSV.replace(",New,Cash", ",Walk-in,Cash");
        let outcome = load_tables(csv(&broken), csv(INVENTORY_CSV));
        assert!(outcome.sales.is_none());
        assert!(outcome.errors[0].contains("row 4"), "{}", outcome.errors[0]);
    }

    #[test]
    fn extension_decides_source_kind() {
        assert_eq!(SourceKind::from_path(Path::new("daily.CSV")), SourceKind::Delimited);
        assert_eq!(SourceKind::from_path(Path::new("daily.xlsx")), SourceKind::Spreadsheet);
        assert_eq!(SourceKind::from_path(Path::new("daily.xls")), SourceKind::Spreadsheet);
        assert_eq!(SourceKind::from_path(Path::new("daily")), SourceKind::Spreadsheet);
    }

    #[test]
    fn spreadsheet_cells_render_as_text() {
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("VIP".into())), "VIP");
    }
}
