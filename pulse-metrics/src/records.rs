//! Row types for the sales and inventory extracts.
//!
//! Field names on the wire follow the extract headers exactly
//! (`Boutique_ID`, `Revenue_USD`, ...), so the same structs deserialize
//! an uploaded file and serialize back to an export without remapping.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp::{
    deserialize_optional_timestamp, deserialize_timestamp, serialize_optional_timestamp,
    serialize_timestamp,
};

/// Columns a sales extract must carry.
pub const SALES_REQUIRED_COLUMNS: &[&str] = &[
    "Date",
    "Boutique_ID",
    "Boutique_Name",
    "Region",
    "SKU_Code",
    "Product_Category",
    "Brand",
    "Units_Sold",
    "Revenue_USD",
    "Transaction_ID",
    "Customer_Type",
];

/// Columns an inventory extract must carry.
pub const INVENTORY_REQUIRED_COLUMNS: &[&str] = &[
    "Date",
    "Boutique_ID",
    "SKU_Code",
    "Product_Name",
    "Category",
    "Brand",
    "Current_Stock_Units",
    "Min_Stock_Threshold",
    "Retail_Price",
];

/// Customer segment recorded at the point of sale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    New,
    Returning,
    #[serde(rename = "VIP")]
    Vip,
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerType::New => write!(f, "New"),
            CustomerType::Returning => write!(f, "Returning"),
            CustomerType::Vip => write!(f, "VIP"),
        }
    }
}

/// One line item of a sales extract.
///
/// Several rows may share a `transaction_id`; a purchase is the group, not
/// the row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(
        rename = "Date",
        deserialize_with = "deserialize_timestamp",
        serialize_with = "serialize_timestamp"
    )]
    pub date: NaiveDateTime,
    #[serde(rename = "Boutique_ID")]
    pub boutique_id: String,
    #[serde(rename = "Boutique_Name")]
    pub boutique_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "SKU_Code")]
    pub sku_code: String,
    #[serde(rename = "Product_Category")]
    pub product_category: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Units_Sold", deserialize_with = "deserialize_count")]
    pub units_sold: u32,
    #[serde(rename = "Revenue_Local_Currency", default)]
    pub revenue_local_currency: Option<f64>,
    #[serde(rename = "Revenue_USD")]
    pub revenue_usd: f64,
    #[serde(rename = "Transaction_ID")]
    pub transaction_id: String,
    #[serde(rename = "Sales_Associate_ID", default)]
    pub sales_associate_id: Option<String>,
    #[serde(rename = "Customer_Type")]
    pub customer_type: CustomerType,
    #[serde(rename = "Payment_Method", default)]
    pub payment_method: Option<String>,
}

/// One (boutique, SKU) stock snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(
        rename = "Date",
        deserialize_with = "deserialize_timestamp",
        serialize_with = "serialize_timestamp"
    )]
    pub date: NaiveDateTime,
    #[serde(rename = "Boutique_ID")]
    pub boutique_id: String,
    #[serde(rename = "SKU_Code")]
    pub sku_code: String,
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Current_Stock_Units", deserialize_with = "deserialize_count")]
    pub current_stock_units: u32,
    #[serde(rename = "Min_Stock_Threshold", deserialize_with = "deserialize_count")]
    pub min_stock_threshold: u32,
    #[serde(
        rename = "Max_Stock_Threshold",
        default,
        deserialize_with = "deserialize_optional_count"
    )]
    pub max_stock_threshold: Option<u32>,
    /// `None` when the column is absent or the cell is blank.
    #[serde(rename = "Unit_Cost", default)]
    pub unit_cost: Option<f64>,
    #[serde(rename = "Retail_Price")]
    pub retail_price: f64,
    #[serde(
        rename = "Last_Restock_Date",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        serialize_with = "serialize_optional_timestamp"
    )]
    pub last_restock_date: Option<NaiveDateTime>,
    #[serde(
        rename = "Supplier_Lead_Time_Days",
        default,
        deserialize_with = "deserialize_optional_count"
    )]
    pub supplier_lead_time_days: Option<u32>,
}

impl InventoryRecord {
    /// Stock valued at cost; zero when the cost is unknown.
    pub fn stock_value(&self) -> f64 {
        self.unit_cost
            .map_or(0.0, |cost| self.current_stock_units as f64 * cost)
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock_units <= self.min_stock_threshold
    }

    pub fn is_stockout(&self) -> bool {
        self.current_stock_units == 0
    }
}

/// The two source tables, held together and replaced together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub sales: Vec<SalesRecord>,
    pub inventory: Vec<InventoryRecord>,
}

impl Dataset {
    pub fn new(sales: Vec<SalesRecord>, inventory: Vec<InventoryRecord>) -> Self {
        Self { sales, inventory }
    }
}

/// Whole, non-negative counts. Spreadsheet exports often write `3.0` for 3.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_count(&s).map_err(serde::de::Error::custom)
}

fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_count(v).map(Some).map_err(serde::de::Error::custom),
    }
}

fn parse_count(raw: &str) -> Result<u32, String> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Ok(n);
    }
    match s.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(v as u32),
        _ => Err(format!("expected a non-negative whole number, got '{}'", s)),
    }
}
