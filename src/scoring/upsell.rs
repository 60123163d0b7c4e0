use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Assumed price of one additional seat.
pub const PRICE_PER_SEAT: i64 = 50;
/// Portfolio average used when no order carries a seat count.
pub const DEFAULT_AVERAGE_SEATS: i64 = 10;
/// Seat count below which a seat upgrade is recommended.
pub const SEAT_UPGRADE_TARGET: u32 = 10;
pub const CROSS_SELL_VALUE: i64 = 500;
pub const TIER_UPGRADE_VALUE: i64 = 200;
/// Maximum number of missing products named in a cross-sell recommendation.
const CROSS_SELL_MAX_NAMED: usize = 3;

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Flat 25% uplift on the customer's average order value.
pub fn estimate_customer_upsell(lifetime_value: Decimal, total_orders: u32) -> Decimal {
    if total_orders == 0 {
        return Decimal::ZERO;
    }
    let avg_order = lifetime_value / Decimal::from(total_orders);
    round_money(avg_order * Decimal::new(25, 2))
}

/// Seat count of a single completed order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatHolding {
    pub customer_id: String,
    pub seats: u32,
}

/// Average seats over orders with a positive seat count.
pub fn average_seats(holdings: &[SeatHolding]) -> Decimal {
    let counted: Vec<u32> = holdings.iter().map(|h| h.seats).filter(|&s| s > 0).collect();
    if counted.is_empty() {
        return Decimal::from(DEFAULT_AVERAGE_SEATS);
    }
    let total: u64 = counted.iter().map(|&s| s as u64).sum();
    Decimal::from(total) / Decimal::from(counted.len() as u64)
}

/// Revenue available from lifting every below-average customer to the portfolio
/// average seat count. A customer's current seats is the largest of its orders
/// that sit below the average.
pub fn estimate_portfolio_upsell(holdings: &[SeatHolding]) -> Decimal {
    let avg_seats = average_seats(holdings);

    let mut below_average: HashMap<&str, u32> = HashMap::new();
    for holding in holdings {
        if holding.seats == 0 || Decimal::from(holding.seats) >= avg_seats {
            continue;
        }
        let current = below_average.entry(holding.customer_id.as_str()).or_insert(0);
        *current = (*current).max(holding.seats);
    }

    let price = Decimal::from(PRICE_PER_SEAT);
    let total: Decimal = below_average
        .values()
        .map(|&seats| (avg_seats - Decimal::from(seats)) * price)
        .sum();

    round_money(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    SeatUpgrade,
    CrossSell,
    TierUpgrade,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub potential_value: Decimal,
}

/// The order attributes recommendations look at.
#[derive(Debug, Clone, Default)]
pub struct OrderFacts {
    pub seats: Option<u32>,
    pub private_tier: bool,
}

/// Concrete next-step suggestions for one customer. `orders` is most recent
/// first; `owned_products` are the product names the customer has bought.
pub fn upsell_recommendations(
    orders: &[OrderFacts],
    owned_products: &BTreeSet<String>,
    catalog: &[String],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if let Some(seats) = orders
        .iter()
        .filter_map(|o| o.seats)
        .find(|&s| s > 0 && s < SEAT_UPGRADE_TARGET)
    {
        recommendations.push(Recommendation {
            kind: RecommendationKind::SeatUpgrade,
            title: "Seat Upgrade Opportunity".to_string(),
            description: format!(
                "Current: {} seats. Consider upgrading to {}+ seats for volume discount.",
                seats, SEAT_UPGRADE_TARGET
            ),
            potential_value: Decimal::from((SEAT_UPGRADE_TARGET - seats) as i64 * PRICE_PER_SEAT),
        });
    }

    let missing: BTreeSet<&String> = catalog
        .iter()
        .filter(|p| !owned_products.contains(p.as_str()))
        .collect();
    if !missing.is_empty() && !owned_products.is_empty() {
        let named: Vec<&str> = missing
            .iter()
            .take(CROSS_SELL_MAX_NAMED)
            .map(|p| p.as_str())
            .collect();
        recommendations.push(Recommendation {
            kind: RecommendationKind::CrossSell,
            title: "Cross-Sell Opportunity".to_string(),
            description: format!("Customer hasn't purchased: {}", named.join(", ")),
            potential_value: Decimal::from(CROSS_SELL_VALUE),
        });
    }

    if orders.iter().any(|o| o.private_tier) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::TierUpgrade,
            title: "Business Tier Upgrade".to_string(),
            description: "Customer is on Private tier. Consider upgrading to Business tier for enhanced features."
                .to_string(),
            potential_value: Decimal::from(TIER_UPGRADE_VALUE),
        });
    }

    recommendations
}

/// Per-product totals for a single customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductUsage {
    pub count: u32,
    pub revenue: Decimal,
    pub seats: u32,
}

pub type ProductBreakdown = BTreeMap<String, ProductUsage>;

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(customer: &str, seats: u32) -> SeatHolding {
        SeatHolding {
            customer_id: customer.to_string(),
            seats,
        }
    }

    fn catalog() -> Vec<String> {
        ["Security", "Trend Micro", "Kaspersky", "Bitdefender", "Norton", "McAfee"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_customer_upsell_zero_orders() {
        assert_eq!(estimate_customer_upsell(Decimal::from(1000), 0), Decimal::ZERO);
    }

    #[test]
    fn test_customer_upsell_quarter_of_average_order() {
        assert_eq!(
            estimate_customer_upsell(Decimal::from(1000), 4),
            Decimal::new(625, 1)
        );
    }

    #[test]
    fn test_customer_upsell_rounds_to_cents() {
        // 100 / 3 * 0.25 = 8.3333...
        assert_eq!(
            estimate_customer_upsell(Decimal::from(100), 3),
            Decimal::new(833, 2)
        );
    }

    #[test]
    fn test_average_seats_defaults_to_ten() {
        assert_eq!(average_seats(&[]), Decimal::from(10));
        assert_eq!(average_seats(&[holding("A", 0)]), Decimal::from(10));
    }

    #[test]
    fn test_average_seats_ignores_zero_seats() {
        let holdings = vec![holding("A", 4), holding("B", 0), holding("C", 8)];
        assert_eq!(average_seats(&holdings), Decimal::from(6));
    }

    #[test]
    fn test_portfolio_upsell_only_below_average() {
        // avg = (2 + 10 + 18) / 3 = 10
        let holdings = vec![holding("A", 2), holding("B", 10), holding("C", 18)];
        // only A: (10 - 2) * 50 = 400
        assert_eq!(estimate_portfolio_upsell(&holdings), Decimal::from(400));
    }

    #[test]
    fn test_portfolio_upsell_uses_largest_below_average_order() {
        // avg = (2 + 6 + 28) / 3 = 12; A's below-average orders are 2 and 6
        let holdings = vec![holding("A", 2), holding("A", 6), holding("B", 28)];
        // (12 - 6) * 50 = 300
        assert_eq!(estimate_portfolio_upsell(&holdings), Decimal::from(300));
    }

    #[test]
    fn test_portfolio_upsell_empty() {
        assert_eq!(estimate_portfolio_upsell(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_recommendations_seat_upgrade() {
        let orders = vec![
            OrderFacts { seats: Some(25), private_tier: false },
            OrderFacts { seats: Some(4), private_tier: false },
            OrderFacts { seats: Some(2), private_tier: false },
        ];
        let recs = upsell_recommendations(&orders, &BTreeSet::new(), &catalog());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::SeatUpgrade);
        // First qualifying order is the 4-seat one
        assert_eq!(recs[0].potential_value, Decimal::from(300));
        assert!(recs[0].description.contains("Current: 4 seats"));
    }

    #[test]
    fn test_recommendations_cross_sell_requires_owned_product() {
        let recs = upsell_recommendations(&[], &BTreeSet::new(), &catalog());
        assert!(recs.is_empty());

        let owned: BTreeSet<String> = ["Norton".to_string()].into_iter().collect();
        let recs = upsell_recommendations(&[], &owned, &catalog());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::CrossSell);
        assert_eq!(
            recs[0].description,
            "Customer hasn't purchased: Bitdefender, Kaspersky, McAfee"
        );
    }

    #[test]
    fn test_recommendations_no_cross_sell_when_catalog_owned() {
        let owned: BTreeSet<String> = catalog().into_iter().collect();
        let recs = upsell_recommendations(&[], &owned, &catalog());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_recommendations_tier_upgrade() {
        let orders = vec![
            OrderFacts { seats: None, private_tier: false },
            OrderFacts { seats: None, private_tier: true },
        ];
        let recs = upsell_recommendations(&orders, &BTreeSet::new(), &catalog());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::TierUpgrade);
        assert_eq!(recs[0].potential_value, Decimal::from(200));
    }
}
