//! Dashboard configuration document.
//!
//! ```yaml
//! thresholds:
//!   revenue_drop_pct: 20
//! email_settings:
//!   from_email: dashboard@company.com
//!   to_emails: [ceo@company.com]
//!   dashboard_url: https://bi.company.com
//! heuristics:
//!   visitors_per_boutique_per_day: 120
//! ```
//!
//! Every section and key is optional. A missing file means all defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use pulse_metrics::thresholds::{Heuristics, ThresholdConfig};

use crate::error::ConfigError;

/// Recipients and links for the alert summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default = "default_from_email")]
    pub from_email: String,
    #[serde(default)]
    pub to_emails: Vec<String>,
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
}

fn default_from_email() -> String {
    "dashboard@company.com".to_string()
}

fn default_dashboard_url() -> String {
    "#".to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub thresholds: ThresholdConfig,
    pub email_settings: Option<EmailSettings>,
    pub heuristics: Heuristics,
}

impl DashboardConfig {
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        // An empty document is valid and means "all defaults".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Trailing windows must cover at least one day.
    fn validate(&self, origin: &Path) -> Result<(), ConfigError> {
        let windows = [
            ("boutique_window_days", self.heuristics.boutique_window_days),
            ("turnover_window_days", self.heuristics.turnover_window_days),
        ];
        for (key, days) in windows {
            if days < 1 {
                return Err(ConfigError::Invalid {
                    path: origin.to_path_buf(),
                    reason: format!("heuristics.{} must be at least 1, got {}", key, days),
                });
            }
        }
        Ok(())
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "configuration file {} not found, using default settings",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_yaml_str(&text, path)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DashboardConfig {
        DashboardConfig::from_yaml_str(text, Path::new("config.yaml")).unwrap()
    }

    #[test]
    fn partial_thresholds_merge_over_defaults() {
        let config = parse("thresholds:\n  revenue_drop_pct: 30\n");
        assert_eq!(config.thresholds.revenue_drop_pct, 30.0);
        assert_eq!(config.thresholds.inventory_turnover_min, 2.0);
        assert!(config.email_settings.is_none());
        assert_eq!(config.heuristics, Heuristics::default());
    }

    #[test]
    fn unknown_threshold_keys_are_skipped() {
        let config = parse("thresholds:\n  revenue_drop_pct: 22.5\n  revenu_drop_pct: 99\n");
        assert_eq!(config.thresholds.revenue_drop_pct, 22.5);
        assert_eq!(
            config.thresholds,
            ThresholdConfig {
                revenue_drop_pct: 22.5,
                ..ThresholdConfig::default()
            }
        );
    }

    #[test]
    fn serialized_config_reads_back() {
        let config = DashboardConfig {
            thresholds: ThresholdConfig {
                shrinkage_rate_max: 3.0,
                ..ThresholdConfig::default()
            },
            ..DashboardConfig::default()
        };
        let text = serde_yaml::to_string(&config).unwrap();
        assert_eq!(parse(&text), config);
    }

    #[test]
    fn email_settings_fill_missing_keys() {
        let config = parse("email_settings:\n  to_emails: [a@x.com, b@x.com]\n");
        let email = config.email_settings.unwrap();
        assert_eq!(email.from_email, "dashboard@company.com");
        assert_eq!(email.to_emails.len(), 2);
        assert_eq!(email.dashboard_url, "#");
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse(""), DashboardConfig::default());
    }

    #[test]
    fn missing_file_is_default() {
        let config = DashboardConfig::load(Path::new("/no/such/dir/config.yaml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = DashboardConfig::from_yaml_str("thresholds: [1, 2", Path::new("bad.yaml"));
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn non_positive_window_is_rejected() {
        let err = DashboardConfig::from_yaml_str(
            "heuristics:\n  turnover_window_days: 0\n",
            Path::new("config.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("turnover_window_days"));
    }

    #[test]
    fn very_long_window_is_accepted() {
        let config = parse("heuristics:\n  boutique_window_days: 100000000\n");
        assert_eq!(config.heuristics.boutique_window_days, 100_000_000);
    }

    #[test]
    fn heuristics_are_configurable() {
        let config = parse("heuristics:\n  visitors_per_boutique_per_day: 120\n");
        assert_eq!(config.heuristics.visitors_per_boutique_per_day, 120);
        assert_eq!(config.heuristics.boutique_window_days, 7);
    }
}
