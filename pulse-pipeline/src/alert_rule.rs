use crate::alert::{Alert, AlertInput};
use crate::util;

/// Alert rules run independently of one another; every alert they return
/// is kept. A rule never fails: degenerate input yields no alerts.
pub trait AlertRule: Send + Sync {
    /// Decide if this rule should run for the given input.
    fn enable(&self, _input: &AlertInput<'_>) -> bool {
        true
    }

    /// Evaluate the rule against the tables.
    fn evaluate(&self, input: &AlertInput<'_>) -> Vec<Alert>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
