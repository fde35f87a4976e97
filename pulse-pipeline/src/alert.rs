use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use pulse_metrics::records::{InventoryRecord, SalesRecord};
use pulse_metrics::thresholds::{Heuristics, ThresholdConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single human-readable alert.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

impl Alert {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Everything an alert rule may read. Borrowed for one evaluation.
#[derive(Clone, Copy, Debug)]
pub struct AlertInput<'a> {
    pub sales: &'a [SalesRecord],
    pub inventory: &'a [InventoryRecord],
    pub thresholds: &'a ThresholdConfig,
    pub heuristics: &'a Heuristics,
    /// Wall clock for the evaluation. Only gating and restock ages use it.
    pub now: NaiveDateTime,
}

/// Alert messages split by severity, each list in rule order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AlertReport {
    pub critical: Vec<String>,
    pub warning: Vec<String>,
}

impl AlertReport {
    pub fn push(&mut self, alert: Alert) {
        match alert.severity {
            Severity::Critical => self.critical.push(alert.message),
            Severity::Warning => self.warning.push(alert.message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.warning.is_empty()
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.warning.len()
    }
}

impl Extend<Alert> for AlertReport {
    fn extend<T: IntoIterator<Item = Alert>>(&mut self, iter: T) {
        for alert in iter {
            self.push(alert);
        }
    }
}
