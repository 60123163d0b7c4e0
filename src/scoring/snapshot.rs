use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flattened per-customer aggregate of order history and subscription state.
///
/// Built fresh for every evaluation from the record export. `lifetime_value` and
/// `total_orders` are assumed non-negative; the scorer does not re-check them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    pub lifetime_value: Decimal,
    pub total_orders: u32,
    /// Free-text tier label (customer group); empty when unset.
    #[serde(default)]
    pub customer_tier: String,
    pub last_order_date: Option<NaiveDate>,
    pub next_renewal_date: Option<NaiveDate>,
}

impl CustomerSnapshot {
    /// Display name, falling back to the id for unnamed customers
    pub fn display_name(&self) -> &str {
        if self.customer_name.is_empty() {
            &self.customer_id
        } else {
            &self.customer_name
        }
    }
}
