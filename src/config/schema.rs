use crate::scoring::ScoringConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the JSON record export
    #[serde(default)]
    pub dataset: Option<String>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub dashboard: Option<DashboardConfig>,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

pub const DEFAULT_REVENUE_WINDOW_DAYS: i64 = 90;
pub const DEFAULT_INACTIVITY_RISK_DAYS: i64 = 90;
pub const DEFAULT_CALENDAR_WINDOW_DAYS: i64 = 90;
pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const DEFAULT_TREND_MONTHS: u32 = 12;

pub fn default_product_catalog() -> Vec<String> {
    ["Security", "Trend Micro", "Kaspersky", "Bitdefender", "Norton", "McAfee"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Dashboard view settings. Unset fields use the built-in defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Look-ahead for "revenue up for renewal" (default: 90)
    #[serde(default)]
    pub revenue_window_days: Option<i64>,

    /// Days without an order before a customer counts as at risk (default: 90)
    #[serde(default)]
    pub inactivity_risk_days: Option<i64>,

    /// Default span of the renewal calendar (default: 90)
    #[serde(default)]
    pub calendar_window_days: Option<i64>,

    /// Rows per page of the client list (default: 50)
    #[serde(default)]
    pub list_limit: Option<usize>,

    /// Months shown by the trend view (default: 12)
    #[serde(default)]
    pub trend_months: Option<u32>,

    /// Products offered, used for cross-sell suggestions
    #[serde(default)]
    pub product_catalog: Option<Vec<String>>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            revenue_window_days: Some(DEFAULT_REVENUE_WINDOW_DAYS),
            inactivity_risk_days: Some(DEFAULT_INACTIVITY_RISK_DAYS),
            calendar_window_days: Some(DEFAULT_CALENDAR_WINDOW_DAYS),
            list_limit: Some(DEFAULT_LIST_LIMIT),
            trend_months: Some(DEFAULT_TREND_MONTHS),
            product_catalog: Some(default_product_catalog()),
        }
    }
}

impl DashboardConfig {
    pub fn revenue_window_days(&self) -> i64 {
        self.revenue_window_days.unwrap_or(DEFAULT_REVENUE_WINDOW_DAYS)
    }

    pub fn inactivity_risk_days(&self) -> i64 {
        self.inactivity_risk_days.unwrap_or(DEFAULT_INACTIVITY_RISK_DAYS)
    }

    pub fn calendar_window_days(&self) -> i64 {
        self.calendar_window_days.unwrap_or(DEFAULT_CALENDAR_WINDOW_DAYS)
    }

    pub fn list_limit(&self) -> usize {
        self.list_limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }

    pub fn trend_months(&self) -> u32 {
        self.trend_months.unwrap_or(DEFAULT_TREND_MONTHS)
    }

    pub fn product_catalog(&self) -> Vec<String> {
        self.product_catalog
            .clone()
            .unwrap_or_else(default_product_catalog)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error (default: warn)
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub format: Option<LogFormat>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Some("warn".to_string()),
            format: Some(LogFormat::Compact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.dataset.is_none());
        assert!(config.scoring.is_none());
        assert!(config.dashboard.is_none());
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
dataset: /srv/exports/retention.json
scoring:
  due_soon_window_days: 45
dashboard:
  revenue_window_days: 60
  list_limit: 25
  product_catalog:
    - Norton
    - McAfee
logging:
  level: debug
  format: json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.dataset.as_deref(), Some("/srv/exports/retention.json"));
        assert_eq!(config.scoring.unwrap().due_soon_window_days, Some(45));

        let dashboard = config.dashboard.unwrap();
        assert_eq!(dashboard.revenue_window_days(), 60);
        assert_eq!(dashboard.list_limit(), 25);
        assert_eq!(dashboard.inactivity_risk_days(), 90);
        assert_eq!(dashboard.product_catalog(), vec!["Norton", "McAfee"]);

        let logging = config.logging.unwrap();
        assert_eq!(logging.level.as_deref(), Some("debug"));
        assert_eq!(logging.format, Some(LogFormat::Json));
    }

    #[test]
    fn test_default_config_roundtrip() {
        let config = Config {
            dataset: Some("export.json".to_string()),
            scoring: Some(ScoringConfig::default()),
            dashboard: Some(DashboardConfig::default()),
            logging: Some(LoggingConfig::default()),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_unset_dashboard_fields_use_defaults() {
        let dashboard: DashboardConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(dashboard.revenue_window_days(), 90);
        assert_eq!(dashboard.calendar_window_days(), 90);
        assert_eq!(dashboard.list_limit(), 50);
        assert_eq!(dashboard.trend_months(), 12);
        assert_eq!(dashboard.product_catalog().len(), 6);
    }
}
