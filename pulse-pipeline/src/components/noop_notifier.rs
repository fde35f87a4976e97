use std::sync::Arc;

use async_trait::async_trait;

use crate::notifier::{Notifier, NotifierInput};

/// Default notifier: accepts the summary and does nothing with it.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, input: Arc<NotifierInput>) -> Result<(), String> {
        log::debug!(
            "noop notifier dropped summary with {} alerts",
            input.alerts.len()
        );
        Ok(())
    }
}
