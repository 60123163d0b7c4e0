use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days ahead of `today` in which a subscription end date counts as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 30;
/// Days without an order after which a customer without a subscription is due soon.
pub const INACTIVITY_DUE_SOON_DAYS: i64 = 270;
/// Days without an order after which a customer without a subscription is overdue.
pub const INACTIVITY_OVERDUE_DAYS: i64 = 365;

/// Renewal state of a customer as of an evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStatus {
    Overdue,
    DueSoon,
    Active,
    Unknown,
}

impl RenewalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalStatus::Overdue => "overdue",
            RenewalStatus::DueSoon => "due_soon",
            RenewalStatus::Active => "active",
            RenewalStatus::Unknown => "unknown",
        }
    }

    /// Overdue and due-soon customers are the ones that need outreach.
    pub fn is_at_risk(&self) -> bool {
        matches!(self, RenewalStatus::Overdue | RenewalStatus::DueSoon)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "overdue" => Some(RenewalStatus::Overdue),
            "due_soon" => Some(RenewalStatus::DueSoon),
            "active" => Some(RenewalStatus::Active),
            "unknown" => Some(RenewalStatus::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for RenewalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day counts that drive classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalWindows {
    pub due_soon_days: i64,
    pub inactivity_due_soon_days: i64,
    pub inactivity_overdue_days: i64,
}

impl Default for RenewalWindows {
    fn default() -> Self {
        Self {
            due_soon_days: DUE_SOON_WINDOW_DAYS,
            inactivity_due_soon_days: INACTIVITY_DUE_SOON_DAYS,
            inactivity_overdue_days: INACTIVITY_OVERDUE_DAYS,
        }
    }
}

/// Classify with the default windows.
pub fn classify(
    next_renewal_date: Option<NaiveDate>,
    last_order_date: Option<NaiveDate>,
    today: NaiveDate,
) -> RenewalStatus {
    classify_with(&RenewalWindows::default(), next_renewal_date, last_order_date, today)
}

/// A tracked subscription decides the status on its own; order recency is only
/// consulted when there is none.
pub fn classify_with(
    windows: &RenewalWindows,
    next_renewal_date: Option<NaiveDate>,
    last_order_date: Option<NaiveDate>,
    today: NaiveDate,
) -> RenewalStatus {
    if let Some(renewal) = next_renewal_date {
        let days_left = (renewal - today).num_days();
        if days_left < 0 {
            RenewalStatus::Overdue
        } else if days_left <= windows.due_soon_days {
            RenewalStatus::DueSoon
        } else {
            RenewalStatus::Active
        }
    } else if let Some(last_order) = last_order_date {
        let days_since = (today - last_order).num_days();
        if days_since > windows.inactivity_overdue_days {
            RenewalStatus::Overdue
        } else if days_since > windows.inactivity_due_soon_days {
            RenewalStatus::DueSoon
        } else {
            RenewalStatus::Active
        }
    } else {
        RenewalStatus::Unknown
    }
}

/// Signed days from `today` until `date` (negative once it has passed).
pub fn days_until(date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    date.map(|d| (d - today).num_days())
}

pub fn days_since(date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    date.map(|d| (today - d).num_days())
}
