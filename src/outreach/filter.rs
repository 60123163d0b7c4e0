use super::types::OutreachState;
use crate::scoring::CustomerSnapshot;

/// Drop customers that are currently snoozed
pub fn filter_active(snapshots: Vec<CustomerSnapshot>, state: &OutreachState) -> Vec<CustomerSnapshot> {
    snapshots
        .into_iter()
        .filter(|s| !state.is_snoozed(&s.customer_id))
        .collect()
}

/// Keep only customers that are currently snoozed
pub fn filter_snoozed(snapshots: Vec<CustomerSnapshot>, state: &OutreachState) -> Vec<CustomerSnapshot> {
    snapshots
        .into_iter()
        .filter(|s| state.is_snoozed(&s.customer_id))
        .collect()
}
