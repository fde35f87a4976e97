//! Synthetic sales and inventory extracts for exploring the dashboard
//! without real data.
//!
//! Output depends only on the seed and the anchor timestamp, so two calls
//! with the same arguments produce identical tables.

use chrono::{Duration, NaiveDateTime};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use pulse_metrics::records::{CustomerType, Dataset, InventoryRecord, SalesRecord};

/// Seed used when the caller has no preference.
pub const DEMO_SEED: u64 = 42;

const DAYS: i64 = 30;
const SKUS_PER_BOUTIQUE: usize = 50;
const MIN_STOCK_THRESHOLD: u32 = 5;
const MAX_STOCK_THRESHOLD: u32 = 20;

const BOUTIQUES: &[(&str, &str)] = &[
    ("Dubai Mall", "Middle East"),
    ("Paris Champs-Élysées", "Europe"),
    ("London Bond Street", "Europe"),
    ("NYC Fifth Avenue", "Americas"),
    ("Tokyo Ginza", "Asia"),
    ("Hong Kong Central", "Asia"),
];
const CATEGORIES: &[&str] = &["Watches", "Jewelry", "Accessories"];
const BRANDS: &[&str] = &["Rolex", "Cartier", "Patek Philippe", "Van Cleef & Arpels"];
const PAYMENT_METHODS: &[&str] = &["Credit Card", "Cash", "Wire Transfer"];
const CUSTOMER_TYPES: &[(CustomerType, u32)] = &[
    (CustomerType::New, 3),
    (CustomerType::Returning, 5),
    (CustomerType::Vip, 2),
];

/// Build 30 days of sales for six boutiques plus a 50-SKU stock snapshot per
/// boutique, ending at `anchor`.
pub fn generate_demo_data(seed: u64, anchor: NaiveDateTime) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let sales = demo_sales(&mut rng, anchor);
    let inventory = demo_inventory(&mut rng, anchor);
    log::debug!(
        "generated demo dataset: {} sales rows, {} inventory rows (seed {})",
        sales.len(),
        inventory.len(),
        seed
    );
    Dataset::new(sales, inventory)
}

fn boutique_id(index: usize) -> String {
    format!("BTQ{:03}", index + 1)
}

fn pick<'a>(rng: &mut StdRng, choices: &[&'a str]) -> &'a str {
    choices.choose(rng).copied().unwrap_or_default()
}

fn demo_sales(rng: &mut StdRng, anchor: NaiveDateTime) -> Vec<SalesRecord> {
    let customer_weights: Vec<u32> = CUSTOMER_TYPES.iter().map(|(_, w)| *w).collect();
    let customer_dist = WeightedIndex::new(&customer_weights).ok();

    let mut records = Vec::new();
    for offset in (0..DAYS).rev() {
        let date = anchor - Duration::days(offset);
        let day_code = date.format("%Y%m%d");

        for (b_idx, (name, region)) in BOUTIQUES.iter().enumerate() {
            let transactions = rng.gen_range(5..=15);
            for t_idx in 0..transactions {
                let customer_type = customer_dist
                    .as_ref()
                    .map(|d| CUSTOMER_TYPES[d.sample(rng)].0)
                    .unwrap_or(CustomerType::Returning);

                records.push(SalesRecord {
                    date,
                    boutique_id: boutique_id(b_idx),
                    boutique_name: name.to_string(),
                    region: region.to_string(),
                    sku_code: format!("SKU{}", rng.gen_range(1000..9999)),
                    product_category: pick(rng, CATEGORIES).to_string(),
                    brand: pick(rng, BRANDS).to_string(),
                    units_sold: rng.gen_range(1..4),
                    revenue_local_currency: Some(rng.gen_range(5_000..50_000) as f64),
                    revenue_usd: rng.gen_range(5_000..50_000) as f64,
                    transaction_id: format!("TXN{}{}{:04}", day_code, b_idx + 1, t_idx),
                    sales_associate_id: Some(format!("SA{}", rng.gen_range(100..999))),
                    customer_type,
                    payment_method: Some(pick(rng, PAYMENT_METHODS).to_string()),
                });
            }
        }
    }
    records
}

fn demo_inventory(rng: &mut StdRng, anchor: NaiveDateTime) -> Vec<InventoryRecord> {
    let mut records = Vec::with_capacity(BOUTIQUES.len() * SKUS_PER_BOUTIQUE);
    for b_idx in 0..BOUTIQUES.len() {
        for i in 0..SKUS_PER_BOUTIQUE {
            records.push(InventoryRecord {
                date: anchor,
                boutique_id: boutique_id(b_idx),
                sku_code: format!("SKU{}", 1000 + i),
                product_name: format!("Luxury Item {}", i),
                category: pick(rng, CATEGORIES).to_string(),
                brand: pick(rng, BRANDS).to_string(),
                current_stock_units: rng.gen_range(0..20),
                min_stock_threshold: MIN_STOCK_THRESHOLD,
                max_stock_threshold: Some(MAX_STOCK_THRESHOLD),
                unit_cost: Some(rng.gen_range(2_000..20_000) as f64),
                retail_price: rng.gen_range(5_000..50_000) as f64,
                last_restock_date: Some(anchor - Duration::days(rng.gen_range(1..60))),
                supplier_lead_time_days: Some(rng.gen_range(7..30)),
            });
        }
    }
    records
}
