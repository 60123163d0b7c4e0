use crate::dataset::Dataset;
use crate::scoring::kpi::round1;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRetention {
    pub product: String,
    pub unique_customers: usize,
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub renewal_orders: usize,
    pub new_orders: usize,
    pub avg_seats: f64,
    /// Renewal orders as a share of all orders, in percent
    pub retention_rate: f64,
}

#[derive(Default)]
struct ProductTally<'a> {
    customers: HashSet<&'a str>,
    orders: usize,
    revenue: Decimal,
    renewals: usize,
    new_orders: usize,
    seat_total: u64,
    seat_orders: u64,
}

/// Retention per product, highest revenue first. Empty when the export has no
/// product column.
pub fn product_retention(dataset: &Dataset) -> Vec<ProductRetention> {
    if !dataset.capabilities.product {
        return Vec::new();
    }

    let mut tallies: HashMap<&str, ProductTally> = HashMap::new();
    for order in dataset.submitted_orders() {
        let Some(name) = order.product_name() else {
            continue;
        };
        let tally = tallies.entry(name).or_default();
        tally.customers.insert(order.customer_id.as_str());
        tally.orders += 1;
        tally.revenue += order.grand_total;
        if order.is_renewal() {
            tally.renewals += 1;
        } else if order.is_new() {
            tally.new_orders += 1;
        }
        if dataset.capabilities.seats {
            if let Some(seats) = order.seats {
                tally.seat_total += seats as u64;
                tally.seat_orders += 1;
            }
        }
    }

    let mut products: Vec<ProductRetention> = tallies
        .into_iter()
        .map(|(name, tally)| ProductRetention {
            product: name.to_string(),
            unique_customers: tally.customers.len(),
            total_orders: tally.orders,
            total_revenue: tally.revenue,
            renewal_orders: tally.renewals,
            new_orders: tally.new_orders,
            avg_seats: if tally.seat_orders == 0 {
                0.0
            } else {
                round1(tally.seat_total as f64 / tally.seat_orders as f64)
            },
            retention_rate: if tally.orders == 0 {
                0.0
            } else {
                round1(tally.renewals as f64 / tally.orders as f64 * 100.0)
            },
        })
        .collect();

    products.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.product.cmp(&b.product))
    });
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_dataset;

    #[test]
    fn test_sorted_by_revenue() {
        let products = product_retention(&sample_dataset());
        let names: Vec<&str> = products.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(names, vec!["Trend Micro", "Bitdefender", "Norton", "Kaspersky"]);
    }

    #[test]
    fn test_product_figures() {
        let products = product_retention(&sample_dataset());

        let trend = &products[0];
        assert_eq!(trend.total_revenue, Decimal::from(12_100));
        assert_eq!(trend.total_orders, 11);
        assert_eq!(trend.renewal_orders, 10);
        assert_eq!(trend.new_orders, 1);
        assert_eq!(trend.avg_seats, 25.0);
        assert_eq!(trend.retention_rate, 90.9);

        let bitdefender = &products[1];
        assert_eq!(bitdefender.total_orders, 2);
        assert_eq!(bitdefender.avg_seats, 50.0);
        assert_eq!(bitdefender.retention_rate, 50.0);

        let norton = &products[2];
        assert_eq!(norton.unique_customers, 1);
        assert_eq!(norton.renewal_orders, 2);
        assert_eq!(norton.avg_seats, 4.3);

        let kaspersky = &products[3];
        assert_eq!(kaspersky.avg_seats, 0.0);
        assert_eq!(kaspersky.retention_rate, 0.0);
    }

    #[test]
    fn test_without_product_column() {
        let mut dataset = sample_dataset();
        dataset.capabilities.product = false;
        assert!(product_retention(&dataset).is_empty());
    }
}
