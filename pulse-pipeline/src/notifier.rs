use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::alert::AlertReport;
use crate::util;

/// Input handed to notifiers after the alerts have been computed.
#[derive(Clone, Debug)]
pub struct NotifierInput {
    pub alerts: AlertReport,
    pub generated_at: NaiveDateTime,
}

/// A notifier pushes an alert summary somewhere outside the process.
/// It runs after the report is complete and never affects it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Decide if this notifier should run.
    fn enable(&self, _input: &NotifierInput) -> bool {
        true
    }

    /// Deliver the summary.
    async fn notify(&self, input: Arc<NotifierInput>) -> Result<(), String>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Run every enabled notifier. Failures are logged and swallowed.
///
/// Returns how many notifiers completed successfully.
pub async fn dispatch(notifiers: &[Box<dyn Notifier>], input: NotifierInput) -> usize {
    let input = Arc::new(input);
    let mut delivered = 0;
    for notifier in notifiers {
        if !notifier.enable(&input) {
            log::debug!("notifier {} disabled, skipping", notifier.name());
            continue;
        }
        match notifier.notify(Arc::clone(&input)).await {
            Ok(()) => {
                log::info!("notifier {} delivered alert summary", notifier.name());
                delivered += 1;
            }
            Err(e) => log::warn!("notifier {} failed: {}", notifier.name(), e),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::noop_notifier::NoopNotifier;
    use chrono::NaiveDate;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _input: Arc<NotifierInput>) -> Result<(), String> {
            Err("smtp relay unreachable".to_string())
        }
    }

    struct DisabledNotifier;

    #[async_trait]
    impl Notifier for DisabledNotifier {
        fn enable(&self, _input: &NotifierInput) -> bool {
            false
        }

        async fn notify(&self, _input: Arc<NotifierInput>) -> Result<(), String> {
            panic!("disabled notifier must not run");
        }
    }

    fn input() -> NotifierInput {
        NotifierInput {
            alerts: AlertReport::default(),
            generated_at: NaiveDate::from_ymd_opt(2024, 6, 30)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn failures_do_not_stop_other_notifiers() {
        let notifiers: Vec<Box<dyn Notifier>> = vec![
            Box::new(FailingNotifier),
            Box::new(DisabledNotifier),
            Box::new(NoopNotifier),
        ];
        assert_eq!(dispatch(&notifiers, input()).await, 1);
    }

    #[test]
    fn names_are_short() {
        assert_eq!(FailingNotifier.name(), "FailingNotifier");
    }
}
