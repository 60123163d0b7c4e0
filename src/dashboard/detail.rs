use crate::dataset::{Customer, Dataset, SalesOrder, Subscription};
use crate::scoring::{
    calculate_priority, classify_with, days_until, estimate_customer_upsell,
    upsell_recommendations, OrderFacts, PriorityScore, ProductBreakdown, Recommendation,
    RenewalStatus, RenewalWindows,
};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeSet;

pub const RECENT_ORDER_LIMIT: usize = 20;
/// Breakdown key for orders without a product name.
pub const UNNAMED_PRODUCT: &str = "Other";

#[derive(Debug, Clone, Serialize)]
pub struct ClientMetrics {
    pub lifetime_value: Decimal,
    pub total_orders: u32,
    pub renewal_orders: u32,
    pub average_order_value: Decimal,
    pub upsell_potential: Decimal,
    pub last_order_date: Option<NaiveDate>,
    pub next_renewal_date: Option<NaiveDate>,
    pub days_until_renewal: Option<i64>,
    pub renewal_status: RenewalStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDetail {
    pub profile: Customer,
    pub metrics: ClientMetrics,
    pub product_breakdown: ProductBreakdown,
    pub recent_orders: Vec<SalesOrder>,
    pub subscriptions: Vec<Subscription>,
    pub recommendations: Vec<Recommendation>,
    pub priority: PriorityScore,
}

/// Everything known about one customer, including the full score breakdown.
///
/// # Errors
///
/// Returns an error if no customer has the given id.
pub fn client_detail(
    dataset: &Dataset,
    windows: &RenewalWindows,
    catalog: &[String],
    customer_id: &str,
    today: NaiveDate,
) -> Result<ClientDetail> {
    let customer = dataset
        .find_customer(customer_id)
        .ok_or_else(|| anyhow::anyhow!("Customer {} not found", customer_id))?;

    let orders = dataset.orders_for(&customer.id);
    let subscriptions = dataset.subscriptions_for(&customer.id);
    let snapshot = dataset.snapshot(customer);

    let status = classify_with(
        windows,
        snapshot.next_renewal_date,
        snapshot.last_order_date,
        today,
    );
    let days_until_renewal = days_until(snapshot.next_renewal_date, today);
    let priority = calculate_priority(&snapshot, status, days_until_renewal);

    let average_order_value = if snapshot.total_orders == 0 {
        Decimal::ZERO
    } else {
        (snapshot.lifetime_value / Decimal::from(snapshot.total_orders))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    let metrics = ClientMetrics {
        lifetime_value: snapshot.lifetime_value,
        total_orders: snapshot.total_orders,
        renewal_orders: orders.iter().filter(|o| o.is_renewal()).count() as u32,
        average_order_value,
        upsell_potential: estimate_customer_upsell(snapshot.lifetime_value, snapshot.total_orders),
        last_order_date: snapshot.last_order_date,
        next_renewal_date: snapshot.next_renewal_date,
        days_until_renewal,
        renewal_status: status,
    };

    let product_breakdown = if dataset.capabilities.product {
        product_breakdown(&orders)
    } else {
        ProductBreakdown::new()
    };

    let owned: BTreeSet<String> = product_breakdown.keys().cloned().collect();
    // "Other" is never suggested as a cross-sell
    let offered: Vec<String> = catalog
        .iter()
        .filter(|p| p.as_str() != UNNAMED_PRODUCT)
        .cloned()
        .collect();
    let facts: Vec<OrderFacts> = orders
        .iter()
        .map(|o| OrderFacts {
            seats: if dataset.capabilities.seats { o.seats } else { None },
            private_tier: o.order_type.is_some_and(|t| t.is_private_tier()),
        })
        .collect();
    let recommendations = upsell_recommendations(&facts, &owned, &offered);

    tracing::debug!(
        customer = %customer.id,
        orders = orders.len(),
        recommendations = recommendations.len(),
        score = priority.total,
        "built client detail"
    );

    Ok(ClientDetail {
        profile: customer.clone(),
        metrics,
        product_breakdown,
        recent_orders: orders
            .iter()
            .take(RECENT_ORDER_LIMIT)
            .map(|o| (*o).clone())
            .collect(),
        subscriptions: subscriptions.into_iter().cloned().collect(),
        recommendations,
        priority,
    })
}

fn product_breakdown(orders: &[&SalesOrder]) -> ProductBreakdown {
    let mut breakdown = ProductBreakdown::new();
    for order in orders {
        let name = order.product_name().unwrap_or(UNNAMED_PRODUCT);
        let usage = breakdown.entry(name.to_string()).or_default();
        usage.count += 1;
        usage.revenue += order.grand_total;
        usage.seats += order.seats.unwrap_or(0);
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_product_catalog;
    use crate::dataset::fixtures::{date, sample_dataset, today};
    use crate::scoring::{Component, RecommendationKind};

    fn detail(id: &str) -> Result<ClientDetail> {
        client_detail(
            &sample_dataset(),
            &RenewalWindows::default(),
            &default_product_catalog(),
            id,
            today(),
        )
    }

    fn kinds(detail: &ClientDetail) -> Vec<RecommendationKind> {
        detail.recommendations.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_unknown_customer_is_error() {
        let err = detail("C-NOPE").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_metrics() {
        let acme = detail("C-ACME").unwrap();
        assert_eq!(acme.metrics.total_orders, 11);
        assert_eq!(acme.metrics.renewal_orders, 10);
        assert_eq!(acme.metrics.average_order_value, Decimal::from(1100));
        assert_eq!(acme.metrics.renewal_status, RenewalStatus::Overdue);
        assert_eq!(acme.metrics.days_until_renewal, Some(-40));
        assert_eq!(acme.subscriptions.len(), 2);
        assert_eq!(acme.subscriptions[0].id, "SUB-A");
        assert_eq!(acme.recent_orders[0].transaction_date, date(2026, 9, 5));
    }

    #[test]
    fn test_zero_orders_average_is_zero() {
        let eps = detail("C-EPS").unwrap();
        assert_eq!(eps.metrics.total_orders, 0);
        assert_eq!(eps.metrics.average_order_value, Decimal::ZERO);
        assert!(eps.product_breakdown.is_empty());
        assert!(eps.recommendations.is_empty());
    }

    #[test]
    fn test_breakdown_excludes_drafts() {
        let delta = detail("C-DELTA").unwrap();
        let usage = &delta.product_breakdown["Bitdefender"];
        assert_eq!(usage.count, 2);
        assert_eq!(usage.revenue, Decimal::from(5200));
        assert_eq!(usage.seats, 100);
    }

    #[test]
    fn test_unnamed_product_grouped_as_other() {
        let old = detail("C-OLD").unwrap();
        assert_eq!(old.product_breakdown[UNNAMED_PRODUCT].count, 1);
        // Unnamed purchases still count as owning something
        assert_eq!(kinds(&old), vec![RecommendationKind::CrossSell]);
        assert_eq!(
            old.recommendations[0].description,
            "Customer hasn't purchased: Bitdefender, Kaspersky, McAfee"
        );
    }

    #[test]
    fn test_other_never_offered_as_cross_sell() {
        let catalog = vec![UNNAMED_PRODUCT.to_string(), "Norton".to_string()];
        let detail = client_detail(
            &sample_dataset(),
            &RenewalWindows::default(),
            &catalog,
            "C-BETA",
            today(),
        )
        .unwrap();
        assert!(!kinds(&detail).contains(&RecommendationKind::CrossSell));
    }

    #[test]
    fn test_recommendations_for_private_tier_customer() {
        let beta = detail("C-BETA").unwrap();
        assert_eq!(
            kinds(&beta),
            vec![
                RecommendationKind::SeatUpgrade,
                RecommendationKind::CrossSell,
                RecommendationKind::TierUpgrade
            ]
        );
        assert_eq!(beta.recommendations[0].potential_value, Decimal::from(250));
        assert!(beta.recommendations[1]
            .description
            .ends_with("Bitdefender, Kaspersky, McAfee"));
    }

    #[test]
    fn test_recommendations_for_large_account() {
        let acme = detail("C-ACME").unwrap();
        assert_eq!(kinds(&acme), vec![RecommendationKind::CrossSell]);
    }

    #[test]
    fn test_priority_breakdown_present() {
        let beta = detail("C-BETA").unwrap();
        assert_eq!(beta.priority.total, 44);
        let urgency = beta.priority.component(Component::Urgency).unwrap();
        assert_eq!(urgency.points, 12);
        assert_eq!(urgency.buckets.len(), 4);
    }
}
