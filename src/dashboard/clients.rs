use crate::dataset::Dataset;
use crate::scoring::{
    calculate_priority, classify_with, days_since, days_until, estimate_customer_upsell,
    CustomerSnapshot, PriorityScore, RenewalStatus, RenewalWindows,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Sort key used for customers without a tracked renewal date.
const NO_RENEWAL_SORT_DAYS: i64 = 999;

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub status: Option<RenewalStatus>,
    pub limit: Option<usize>,
    pub offset: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientRow {
    #[serde(flatten)]
    pub snapshot: CustomerSnapshot,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub territory: Option<String>,
    pub renewal_status: RenewalStatus,
    pub days_until_renewal: Option<i64>,
    pub days_since_last_order: Option<i64>,
    pub upsell_potential: Decimal,
    pub priority: PriorityScore,
    pub products_purchased: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientPage {
    /// Rows matching the filter before pagination
    pub total: usize,
    pub rows: Vec<ClientRow>,
}

/// Build the ranked client list from already-selected snapshots.
///
/// At-risk customers come first, then higher priority, then the nearest renewal.
pub fn list_clients(
    dataset: &Dataset,
    snapshots: Vec<CustomerSnapshot>,
    windows: &RenewalWindows,
    today: NaiveDate,
    filter: &ClientFilter,
) -> ClientPage {
    let mut products: HashMap<&str, BTreeSet<String>> = HashMap::new();
    if dataset.capabilities.product {
        for order in dataset.submitted_orders() {
            if let Some(name) = order.product_name() {
                products
                    .entry(order.customer_id.as_str())
                    .or_default()
                    .insert(name.to_string());
            }
        }
    }

    let mut rows: Vec<ClientRow> = snapshots
        .into_iter()
        .map(|snapshot| {
            let customer = dataset.find_customer(&snapshot.customer_id);
            let status = classify_with(
                windows,
                snapshot.next_renewal_date,
                snapshot.last_order_date,
                today,
            );
            let days_until_renewal = days_until(snapshot.next_renewal_date, today);
            let priority = calculate_priority(&snapshot, status, days_until_renewal);
            let products_purchased = products
                .get(snapshot.customer_id.as_str())
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();

            ClientRow {
                email: customer.and_then(|c| c.email.clone()),
                phone: customer.and_then(|c| c.phone.clone()),
                territory: customer.and_then(|c| c.territory.clone()),
                renewal_status: status,
                days_until_renewal,
                days_since_last_order: days_since(snapshot.last_order_date, today),
                upsell_potential: estimate_customer_upsell(
                    snapshot.lifetime_value,
                    snapshot.total_orders,
                ),
                priority,
                products_purchased,
                snapshot,
            }
        })
        .filter(|row| filter.status.is_none_or(|s| row.renewal_status == s))
        .collect();

    rows.sort_by(compare_rows);

    let total = rows.len();
    let rows = rows
        .into_iter()
        .skip(filter.offset)
        .take(filter.limit.unwrap_or(usize::MAX))
        .collect();

    ClientPage { total, rows }
}

fn compare_rows(a: &ClientRow, b: &ClientRow) -> Ordering {
    b.renewal_status
        .is_at_risk()
        .cmp(&a.renewal_status.is_at_risk())
        .then_with(|| b.priority.total.cmp(&a.priority.total))
        .then_with(|| {
            let a_days = a.days_until_renewal.unwrap_or(NO_RENEWAL_SORT_DAYS);
            let b_days = b.days_until_renewal.unwrap_or(NO_RENEWAL_SORT_DAYS);
            a_days.cmp(&b_days)
        })
        .then_with(|| a.snapshot.customer_id.cmp(&b.snapshot.customer_id))
}
