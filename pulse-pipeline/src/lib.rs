pub mod alert;
pub mod alert_engine;
pub mod alert_rule;
pub mod components;
pub mod config;
pub mod demo;
pub mod error;
pub mod export;
pub mod loader;
pub mod notifier;
pub mod report;
pub mod util;
pub mod validator;

pub use alert::{Alert, AlertReport, Severity};
pub use alert_engine::{check_alerts, AlertEngine};
pub use config::{DashboardConfig, EmailSettings};
pub use demo::{generate_demo_data, DEMO_SEED};
pub use loader::{load_data, LoadOutcome};
pub use report::{DashboardReport, ReportContext, Session};
