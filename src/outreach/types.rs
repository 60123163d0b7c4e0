use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const OUTREACH_STATE_VERSION: u32 = 1;

/// Customers already contacted, hidden from the client list until the
/// follow-up date passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachState {
    pub version: u32,
    #[serde(default)]
    pub snoozed: HashMap<String, OutreachEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachEntry {
    pub snoozed_at: DateTime<Utc>,
    pub snooze_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OutreachEntry {
    fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.snooze_until.is_none_or(|until| now < until)
    }

    /// Remaining snooze time: "indefinite", "expired", or "{N}w/d/h/m left"
    pub fn format_remaining(&self) -> String {
        let Some(until) = self.snooze_until else {
            return "indefinite".to_string();
        };
        let now = Utc::now();
        if until <= now {
            return "expired".to_string();
        }

        let duration = until - now;
        let days = duration.num_days();
        if days >= 7 {
            format!("{}w left", days / 7)
        } else if days >= 1 {
            format!("{}d left", days)
        } else if duration.num_hours() >= 1 {
            format!("{}h left", duration.num_hours())
        } else if duration.num_minutes() >= 1 {
            format!("{}m left", duration.num_minutes())
        } else {
            "<1m left".to_string()
        }
    }
}

impl Default for OutreachState {
    fn default() -> Self {
        Self::new()
    }
}

impl OutreachState {
    pub fn new() -> Self {
        Self {
            version: OUTREACH_STATE_VERSION,
            snoozed: HashMap::new(),
        }
    }

    /// Snoozed indefinitely or until a time not yet reached
    pub fn is_snoozed(&self, customer_id: &str) -> bool {
        self.snoozed
            .get(customer_id)
            .is_some_and(|entry| entry.is_active_at(Utc::now()))
    }

    /// Record outreach to a customer, replacing any earlier entry
    pub fn snooze(&mut self, customer_id: String, until: Option<DateTime<Utc>>, note: Option<String>) {
        let entry = OutreachEntry {
            snoozed_at: Utc::now(),
            snooze_until: until,
            note,
        };
        self.snoozed.insert(customer_id, entry);
    }

    /// Returns true if the customer had an entry
    pub fn unsnooze(&mut self, customer_id: &str) -> bool {
        self.snoozed.remove(customer_id).is_some()
    }

    pub fn clean_expired(&mut self) {
        let now = Utc::now();
        self.snoozed.retain(|_, entry| entry.is_active_at(now));
    }

    pub fn entry(&self, customer_id: &str) -> Option<&OutreachEntry> {
        self.snoozed.get(customer_id)
    }
}
