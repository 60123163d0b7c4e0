pub mod capabilities;
pub mod storage;
pub mod types;

pub use capabilities::SchemaCapabilities;
pub use storage::{load_dataset, parse_dataset};
pub use types::{Customer, OrderType, SalesOrder, Subscription, SubscriptionStatus};

use crate::scoring::{CustomerSnapshot, SeatHolding};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Read-only record export: customers, sales orders and subscriptions.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub orders: Vec<SalesOrder>,
    pub subscriptions: Vec<Subscription>,
    pub capabilities: SchemaCapabilities,
}

impl Dataset {
    pub fn enabled_customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter().filter(|c| !c.disabled)
    }

    pub fn find_customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }

    /// Completed orders only; drafts never count towards any metric.
    pub fn submitted_orders(&self) -> impl Iterator<Item = &SalesOrder> {
        self.orders.iter().filter(|o| o.submitted)
    }

    /// Completed orders of one customer, most recent first
    pub fn orders_for(&self, customer_id: &str) -> Vec<&SalesOrder> {
        let mut orders: Vec<&SalesOrder> = self
            .submitted_orders()
            .filter(|o| o.customer_id == customer_id)
            .collect();
        orders.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        orders
    }

    /// Subscriptions of one customer, latest end date first
    pub fn subscriptions_for(&self, customer_id: &str) -> Vec<&Subscription> {
        let mut subs: Vec<&Subscription> = self
            .subscriptions
            .iter()
            .filter(|s| s.customer_id == customer_id)
            .collect();
        subs.sort_by(|a, b| b.end_date.cmp(&a.end_date));
        subs
    }

    pub fn snapshot(&self, customer: &Customer) -> CustomerSnapshot {
        let orders = self.orders_for(&customer.id);
        let subs: Vec<&Subscription> = self
            .subscriptions
            .iter()
            .filter(|s| s.customer_id == customer.id)
            .collect();
        build_snapshot(customer, &orders, &subs)
    }

    /// Snapshots for every enabled customer, in export order.
    pub fn snapshots(&self) -> Vec<CustomerSnapshot> {
        let mut orders_by_customer: HashMap<&str, Vec<&SalesOrder>> = HashMap::new();
        for order in self.submitted_orders() {
            orders_by_customer
                .entry(order.customer_id.as_str())
                .or_default()
                .push(order);
        }
        let mut subs_by_customer: HashMap<&str, Vec<&Subscription>> = HashMap::new();
        for sub in &self.subscriptions {
            subs_by_customer
                .entry(sub.customer_id.as_str())
                .or_default()
                .push(sub);
        }

        self.enabled_customers()
            .map(|c| {
                let orders = orders_by_customer.get(c.id.as_str()).map_or(&[][..], |v| v.as_slice());
                let subs = subs_by_customer.get(c.id.as_str()).map_or(&[][..], |v| v.as_slice());
                build_snapshot(c, orders, subs)
            })
            .collect()
    }

    /// Seat counts of all completed orders, empty when the export has no seat column.
    pub fn seat_holdings(&self) -> Vec<SeatHolding> {
        if !self.capabilities.seats {
            return Vec::new();
        }
        self.submitted_orders()
            .filter_map(|o| {
                o.seats.map(|seats| SeatHolding {
                    customer_id: o.customer_id.clone(),
                    seats,
                })
            })
            .collect()
    }
}

/// Fold one customer's rows into the flat record the scoring engine consumes.
pub fn build_snapshot(
    customer: &Customer,
    orders: &[&SalesOrder],
    subscriptions: &[&Subscription],
) -> CustomerSnapshot {
    let completed = orders.iter().filter(|o| o.submitted);
    let lifetime_value: Decimal = completed.clone().map(|o| o.grand_total).sum();
    let total_orders = completed.clone().count() as u32;
    let last_order_date = completed.map(|o| o.transaction_date).max();
    let next_renewal_date = subscriptions
        .iter()
        .filter(|s| s.status.is_open())
        .map(|s| s.end_date)
        .min();

    CustomerSnapshot {
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        lifetime_value,
        total_orders,
        customer_tier: customer.customer_group.clone().unwrap_or_default(),
        last_order_date,
        next_renewal_date,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small export shared by the dashboard tests, evaluated on 2026-10-19.

    use super::*;
    use chrono::NaiveDate;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn today() -> NaiveDate {
        date(2026, 10, 19)
    }

    fn customer(id: &str, name: &str, group: &str, created: NaiveDate) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: Some(format!("{}@example.com", id.to_lowercase())),
            phone: None,
            customer_group: if group.is_empty() { None } else { Some(group.to_string()) },
            territory: Some("North".to_string()),
            created,
            disabled: false,
        }
    }

    fn order(
        id: &str,
        customer_id: &str,
        on: NaiveDate,
        total: i64,
        order_type: OrderType,
        product: Option<&str>,
        seats: Option<u32>,
    ) -> SalesOrder {
        SalesOrder {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            transaction_date: on,
            grand_total: Decimal::from(total),
            submitted: true,
            order_type: Some(order_type),
            product: product.map(str::to_string),
            seats,
            salesperson: None,
        }
    }

    fn subscription(id: &str, customer_id: &str, end: NaiveDate, status: SubscriptionStatus) -> Subscription {
        Subscription {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            start_date: None,
            end_date: end,
            status,
        }
    }

    /// Five enabled customers covering every renewal status, plus one disabled.
    ///
    /// - C-ACME: enterprise, 11 orders of 1100, subscription past due since 2026-09-09
    /// - C-BETA: SMB, 3 orders of 800 (two private tier), renewal due 2026-10-29
    /// - C-GAMMA: no group, one order of 300 on 2026-06-01, no subscription
    /// - C-DELTA: commercial, last order 2025-09-01, no subscription, one draft order
    /// - C-EPS: VIP, created this month, nothing bought
    /// - C-OLD: disabled, one order in 2024
    pub fn sample_dataset() -> Dataset {
        let customers = vec![
            customer("C-ACME", "Acme Corp", "Enterprise", date(2023, 1, 10)),
            customer("C-BETA", "Beta Retail", "SMB", date(2025, 10, 20)),
            customer("C-GAMMA", "Gamma Labs", "", date(2026, 5, 20)),
            customer("C-DELTA", "Delta Health", "Commercial", date(2024, 12, 1)),
            customer("C-EPS", "Epsilon Partners", "VIP", date(2026, 10, 3)),
            Customer {
                disabled: true,
                ..customer("C-OLD", "Old Industries", "SMB", date(2022, 5, 1))
            },
        ];

        let mut orders = Vec::new();
        // Acme: one new order in Nov 2025, then monthly renewals through Sep 2026
        let acme_months = [(2025, 11), (2025, 12), (2026, 1), (2026, 2), (2026, 3), (2026, 4),
            (2026, 5), (2026, 6), (2026, 7), (2026, 8), (2026, 9)];
        for (i, (y, m)) in acme_months.iter().enumerate() {
            let order_type = if i == 0 { OrderType::NewOrderBusiness } else { OrderType::Renewal };
            orders.push(order(
                &format!("SO-A{:02}", i + 1),
                "C-ACME",
                date(*y, *m, 5),
                1100,
                order_type,
                Some("Trend Micro"),
                Some(25),
            ));
        }
        orders.push(order("SO-B1", "C-BETA", date(2025, 10, 25), 800, OrderType::NewOrderPrivate, Some("Norton"), Some(4)));
        orders.push(order("SO-B2", "C-BETA", date(2026, 4, 10), 800, OrderType::ExtensionPrivate, Some("Norton"), Some(4)));
        orders.push(order("SO-B3", "C-BETA", date(2026, 10, 2), 800, OrderType::Renewal, Some("Norton"), Some(5)));
        orders.push(order("SO-G1", "C-GAMMA", date(2026, 6, 1), 300, OrderType::NewOrderBusiness, Some("Kaspersky"), None));
        orders.push(order("SO-D1", "C-DELTA", date(2025, 3, 1), 2600, OrderType::NewOrderBusiness, Some("Bitdefender"), Some(50)));
        orders.push(order("SO-D2", "C-DELTA", date(2025, 9, 1), 2600, OrderType::Renewal, Some("Bitdefender"), Some(50)));
        orders.push(SalesOrder {
            submitted: false,
            ..order("SO-D3", "C-DELTA", date(2026, 10, 5), 9999, OrderType::Renewal, Some("Bitdefender"), Some(1))
        });
        orders.push(SalesOrder {
            order_type: None,
            ..order("SO-O1", "C-OLD", date(2024, 1, 1), 500, OrderType::Other, None, None)
        });

        let subscriptions = vec![
            subscription("SUB-A", "C-ACME", date(2026, 9, 9), SubscriptionStatus::PastDueDate),
            subscription("SUB-A0", "C-ACME", date(2025, 9, 9), SubscriptionStatus::Completed),
            subscription("SUB-B", "C-BETA", date(2026, 10, 29), SubscriptionStatus::Active),
        ];

        Dataset {
            customers,
            orders,
            subscriptions,
            capabilities: SchemaCapabilities::full(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_snapshots_skip_disabled_customers() {
        let dataset = sample_dataset();
        let snapshots = dataset.snapshots();
        assert_eq!(snapshots.len(), 5);
        assert!(snapshots.iter().all(|s| s.customer_id != "C-OLD"));
    }

    #[test]
    fn test_snapshot_aggregates_completed_orders() {
        let dataset = sample_dataset();
        let acme = dataset.find_customer("C-ACME").unwrap();
        let snapshot = dataset.snapshot(acme);

        assert_eq!(snapshot.lifetime_value, Decimal::from(12_100));
        assert_eq!(snapshot.total_orders, 11);
        assert_eq!(snapshot.customer_tier, "Enterprise");
        assert_eq!(snapshot.last_order_date, Some(date(2026, 9, 5)));
        // Completed subscription is not a pending renewal
        assert_eq!(snapshot.next_renewal_date, Some(date(2026, 9, 9)));
    }

    #[test]
    fn test_snapshot_ignores_draft_orders() {
        let dataset = sample_dataset();
        let delta = dataset.find_customer("C-DELTA").unwrap();
        let snapshot = dataset.snapshot(delta);

        assert_eq!(snapshot.total_orders, 2);
        assert_eq!(snapshot.lifetime_value, Decimal::from(5_200));
        assert_eq!(snapshot.last_order_date, Some(date(2025, 9, 1)));
        assert_eq!(snapshot.next_renewal_date, None);
    }

    #[test]
    fn test_snapshot_without_history() {
        let dataset = sample_dataset();
        let eps = dataset.find_customer("C-EPS").unwrap();
        let snapshot = dataset.snapshot(eps);

        assert_eq!(snapshot.total_orders, 0);
        assert_eq!(snapshot.lifetime_value, Decimal::ZERO);
        assert_eq!(snapshot.last_order_date, None);
        assert_eq!(snapshot.next_renewal_date, None);
    }

    #[test]
    fn test_snapshots_match_single_snapshot() {
        let dataset = sample_dataset();
        for snapshot in dataset.snapshots() {
            let customer = dataset.find_customer(&snapshot.customer_id).unwrap();
            assert_eq!(snapshot, dataset.snapshot(customer));
        }
    }

    #[test]
    fn test_orders_for_most_recent_first() {
        let dataset = sample_dataset();
        let orders = dataset.orders_for("C-BETA");
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["SO-B3", "SO-B2", "SO-B1"]);
    }

    #[test]
    fn test_seat_holdings_respect_capabilities() {
        let mut dataset = sample_dataset();
        // 11 Acme + 3 Beta + 2 Delta orders carry seats
        assert_eq!(dataset.seat_holdings().len(), 16);

        dataset.capabilities.seats = false;
        assert!(dataset.seat_holdings().is_empty());
    }
}
