use super::renewal::{
    RenewalWindows, DUE_SOON_WINDOW_DAYS, INACTIVITY_DUE_SOON_DAYS, INACTIVITY_OVERDUE_DAYS,
};
use serde::{Deserialize, Serialize};

/// Renewal classification settings.
///
/// Every field is optional; unset fields fall back to the built-in windows.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   due_soon_window_days: 30
///   inactivity_due_soon_days: 270
///   inactivity_overdue_days: 365
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// A subscription ending within this many days is due soon (default: 30)
    #[serde(default)]
    pub due_soon_window_days: Option<i64>,

    /// Without a subscription, this many days since the last order is due soon (default: 270)
    #[serde(default)]
    pub inactivity_due_soon_days: Option<i64>,

    /// Without a subscription, this many days since the last order is overdue (default: 365)
    #[serde(default)]
    pub inactivity_overdue_days: Option<i64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            due_soon_window_days: Some(DUE_SOON_WINDOW_DAYS),
            inactivity_due_soon_days: Some(INACTIVITY_DUE_SOON_DAYS),
            inactivity_overdue_days: Some(INACTIVITY_OVERDUE_DAYS),
        }
    }
}

impl ScoringConfig {
    pub fn windows(&self) -> RenewalWindows {
        let defaults = RenewalWindows::default();
        RenewalWindows {
            due_soon_days: self.due_soon_window_days.unwrap_or(defaults.due_soon_days),
            inactivity_due_soon_days: self
                .inactivity_due_soon_days
                .unwrap_or(defaults.inactivity_due_soon_days),
            inactivity_overdue_days: self
                .inactivity_overdue_days
                .unwrap_or(defaults.inactivity_overdue_days),
        }
    }
}
