use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde::Serialize;

use pulse_metrics::{
    BoutiqueMetrics, CategoryMetrics, CategoryStock, DailyRevenue, Dataset, TurnoverStatus,
};
use pulse_pipeline::components::email_summary_notifier::EmailSummaryNotifier;
use pulse_pipeline::components::noop_notifier::NoopNotifier;
use pulse_pipeline::export::{export_dataset, export_report};
use pulse_pipeline::notifier::{dispatch, Notifier, NotifierInput};
use pulse_pipeline::{
    generate_demo_data, load_data, AlertReport, DashboardConfig, DashboardReport, ReportContext,
    Session,
};

/// Daily KPI and alert dashboard for a boutique retail network
#[derive(Parser, Debug)]
#[command(name = "pulse-server")]
#[command(version)]
struct Args {
    /// Sales extract (.csv, or a spreadsheet)
    #[arg(long, requires = "inventory", conflicts_with = "demo")]
    sales: Option<PathBuf>,

    /// Inventory extract (.csv, or a spreadsheet)
    #[arg(long, requires = "sales", conflicts_with = "demo")]
    inventory: Option<PathBuf>,

    /// Use generated demo data (the default when no extracts are given)
    #[arg(long)]
    demo: bool,

    /// Seed for the demo generator
    #[arg(long, default_value_t = pulse_pipeline::DEMO_SEED)]
    seed: u64,

    /// Dashboard configuration (YAML)
    #[arg(long, default_value = "config.yaml", env = "PULSE_CONFIG")]
    config: PathBuf,

    /// Print the report as JSON instead of the human rendition
    #[arg(long)]
    json: bool,

    /// Write the report and source tables as CSV files into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Prepare the alert summary email
    #[arg(long)]
    notify: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DashboardJson<'a> {
    #[serde(flatten)]
    report: &'a DashboardReport,
    turnover_status: TurnoverStatus,
    sales_rows: usize,
    inventory_rows: usize,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a number with comma thousands separators.
fn format_dollars(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };
    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

fn signed_pct(value: f64) -> String {
    format!("{:+.1}%", value)
}

fn print_alerts(alerts: &AlertReport) {
    if alerts.is_empty() {
        println!("  No alerts. All boutiques within thresholds.");
        return;
    }
    for message in &alerts.critical {
        println!("  !! CRITICAL  {}", message);
    }
    for message in &alerts.warning {
        println!("  !  WARNING   {}", message);
    }
}

fn print_boutiques(boutiques: &[BoutiqueMetrics]) {
    println!("  Top boutiques (trailing week)");
    println!("  {:\u{2500}<64}", "");
    for (i, b) in boutiques.iter().take(5).enumerate() {
        println!(
            "  {}. {:24} {:12} {:>12}  conv {:>5.1}%  ATV ${}",
            i + 1,
            b.boutique_name,
            b.region,
            format!("${}", format_dollars(b.revenue)),
            b.conversion_rate,
            format_dollars(b.atv),
        );
    }
    println!("  {:\u{2500}<64}", "");
}

fn print_categories(categories: &[CategoryMetrics]) {
    println!("  Category share of revenue");
    for c in categories {
        println!(
            "    {:14} {:>5.1}%  ${}",
            c.category,
            c.revenue_share,
            format_dollars(c.revenue)
        );
    }
}

/// Days of the revenue trend shown in the terminal.
const TREND_DAYS: usize = 7;

fn print_revenue_trend(trend: &[DailyRevenue]) {
    println!("  Daily revenue");
    for day in &trend[trend.len().saturating_sub(TREND_DAYS)..] {
        println!("    {}  ${}", day.date, format_dollars(day.revenue));
    }
}

fn stock_flag(row: &CategoryStock) -> &'static str {
    if row.current_stock_units < row.min_stock_threshold {
        "below minimum"
    } else {
        ""
    }
}

fn print_category_stock(stock: &[CategoryStock]) {
    println!("  Inventory by category (units on hand / minimum)");
    for c in stock {
        println!(
            "    {:14} {:>6} / {:<6} {}",
            c.category,
            c.current_stock_units,
            c.min_stock_threshold,
            stock_flag(c)
        );
    }
}

fn print_human(report: &DashboardReport, status: TurnoverStatus, dataset: &Dataset) {
    let bar = "\u{2550}".repeat(62);
    println!();
    println!("  \u{2554}{}\u{2557}", bar);
    println!("  \u{2551}{:^62}\u{2551}", "LUXURY RETAIL DASHBOARD");
    println!("  \u{255a}{}\u{255d}", bar);
    println!();
    println!(
        "  {} sales rows  \u{00b7}  {} inventory rows  \u{00b7}  generated {}",
        dataset.sales.len(),
        dataset.inventory.len(),
        report.generated_at.format("%Y-%m-%d %H:%M")
    );
    println!();

    print_alerts(&report.alerts);
    println!();

    let k = &report.kpis;
    println!(
        "  Revenue ${} ({})  \u{00b7}  ATV ${} ({})  \u{00b7}  Conversion {:.1}% ({:+.1} pts)",
        format_dollars(k.daily_revenue),
        signed_pct(k.revenue_growth),
        format_dollars(k.atv),
        signed_pct(k.atv_change),
        k.conversion_rate,
        k.conversion_change,
    );
    println!(
        "  Turnover {:.1}x ({})  \u{00b7}  {} low stock  \u{00b7}  {} stockouts",
        k.inventory_turnover, status, k.low_stock_items, k.stockout_risk,
    );
    println!();

    print_boutiques(&report.boutiques);
    println!();
    print_categories(&report.categories);
    println!();
    print_revenue_trend(&report.revenue_trend);
    println!();
    print_category_stock(&report.category_stock);
    println!();
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = DashboardConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let now = chrono::Local::now().naive_local();

    let mut session = Session::new();
    match (&args.sales, &args.inventory) {
        (Some(sales), Some(inventory)) if !args.demo => {
            if let Err(errors) = session.ingest(load_data(sales, inventory)) {
                for error in &errors {
                    eprintln!("Error: {}", error);
                }
                bail!("{} problem(s) loading the extracts", errors.len());
            }
        }
        _ => {
            log::info!("using demo data (seed {})", args.seed);
            session.replace(generate_demo_data(args.seed, now));
        }
    }
    let Some(dataset) = session.dataset() else {
        bail!("no dataset loaded");
    };

    let report = ReportContext::new(&dataset, &config, now).run();
    let status = report.kpis.turnover_status(&config.thresholds);

    if let Some(dir) = &args.export_dir {
        let mut written = export_report(dir, &report)
            .with_context(|| format!("exporting report to {}", dir.display()))?;
        written.extend(
            export_dataset(dir, &dataset)
                .with_context(|| format!("exporting tables to {}", dir.display()))?,
        );
        log::info!("exported {} file(s) to {}", written.len(), dir.display());
    }

    let notifiers: Vec<Box<dyn Notifier>> = if args.notify {
        vec![Box::new(EmailSummaryNotifier::new(config.email_settings.clone()))]
    } else {
        vec![Box::new(NoopNotifier)]
    };
    dispatch(
        &notifiers,
        NotifierInput {
            alerts: report.alerts.clone(),
            generated_at: now,
        },
    )
    .await;

    if args.json {
        let out = DashboardJson {
            report: &report,
            turnover_status: status,
            sales_rows: dataset.sales.len(),
            inventory_rows: dataset.inventory.len(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_human(&report, status, &dataset);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_get_thousands_separators() {
        assert_eq!(format_dollars(0.0), "0");
        assert_eq!(format_dollars(999.4), "999");
        assert_eq!(format_dollars(1_234_567.0), "1,234,567");
        assert_eq!(format_dollars(-45_000.0), "-45,000");
    }

    #[test]
    fn category_below_summed_minimum_is_flagged() {
        let row = |units, min| CategoryStock {
            category: "Watches".into(),
            current_stock_units: units,
            min_stock_threshold: min,
        };
        assert_eq!(stock_flag(&row(9, 10)), "below minimum");
        assert_eq!(stock_flag(&row(10, 10)), "");
    }

    #[test]
    fn extracts_require_each_other() {
        assert!(Args::try_parse_from(["pulse-server", "--sales", "s.csv"]).is_err());
        let args =
            Args::try_parse_from(["pulse-server", "--sales", "s.csv", "--inventory", "i.csv"])
                .unwrap();
        assert!(!args.demo);
        assert_eq!(args.seed, 42);
    }

    #[test]
    fn demo_conflicts_with_extracts() {
        assert!(Args::try_parse_from([
            "pulse-server",
            "--demo",
            "--sales",
            "s.csv",
            "--inventory",
            "i.csv"
        ])
        .is_err());
    }
}
