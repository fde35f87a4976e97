use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EmailSettings;
use crate::notifier::{Notifier, NotifierInput};

/// A rendered alert summary email.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Renders the daily alert summary email.
///
/// Delivery is not wired to an SMTP relay; the email is composed and logged
/// as prepared. Without `email_settings` the notifier is disabled.
pub struct EmailSummaryNotifier {
    settings: Option<EmailSettings>,
}

impl EmailSummaryNotifier {
    pub fn new(settings: Option<EmailSettings>) -> Self {
        Self { settings }
    }

    /// Render the email, or `None` when no settings are configured.
    pub fn compose(&self, input: &NotifierInput) -> Option<AlertEmail> {
        let settings = self.settings.as_ref()?;
        let alerts = &input.alerts;

        let mut body = String::new();
        // Writing into a String cannot fail.
        let _ = write!(
            body,
            "<html>\n<body>\n<h2>Daily Alert Summary</h2>\n<p>Generated at: {}</p>\n",
            input.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = write!(
            body,
            "<h3 style=\"color: red;\">Critical Alerts ({})</h3>\n<ul>\n",
            alerts.critical.len()
        );
        for alert in &alerts.critical {
            let _ = writeln!(body, "<li>{}</li>", escape_html(alert));
        }
        let _ = write!(
            body,
            "</ul>\n<h3 style=\"color: orange;\">Warnings ({})</h3>\n<ul>\n",
            alerts.warning.len()
        );
        for alert in &alerts.warning {
            let _ = writeln!(body, "<li>{}</li>", escape_html(alert));
        }
        let _ = write!(
            body,
            "</ul>\n<p><a href=\"{}\">View Full Dashboard</a></p>\n</body>\n</html>\n",
            escape_html(&settings.dashboard_url)
        );

        Some(AlertEmail {
            from: settings.from_email.clone(),
            to: settings.to_emails.clone(),
            subject: format!(
                "Luxury Retail Dashboard - Alert Summary {}",
                input.generated_at.format("%Y-%m-%d")
            ),
            html_body: body,
        })
    }
}

#[async_trait]
impl Notifier for EmailSummaryNotifier {
    fn enable(&self, _input: &NotifierInput) -> bool {
        if self.settings.is_none() {
            log::info!("email settings not configured, skipping alert summary");
            return false;
        }
        true
    }

    async fn notify(&self, input: Arc<NotifierInput>) -> Result<(), String> {
        let email = self
            .compose(&input)
            .ok_or_else(|| "email settings not configured".to_string())?;
        if email.to.is_empty() {
            return Err("no recipients configured in email_settings.to_emails".to_string());
        }
        log::info!(
            "alert summary '{}' prepared for {} (sending disabled)",
            email.subject,
            email.to.join(", ")
        );
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
