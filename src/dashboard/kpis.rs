use super::period::{days_after, days_before, one_year_before, Period};
use crate::config::schema::DashboardConfig;
use crate::dataset::{Dataset, SubscriptionStatus};
use crate::scoring::kpi::round1;
use crate::scoring::{compare, estimate_portfolio_upsell, KpiComparison};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize)]
pub struct KpiComparisons {
    pub customers: KpiComparison,
    pub renewal_revenue: KpiComparison,
    pub renewal_rate: KpiComparison,
    pub renewals_count: KpiComparison,
    pub at_risk: KpiComparison,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardKpis {
    pub total_customers: usize,
    pub revenue_up_for_renewal: Decimal,
    pub clients_at_risk: usize,
    pub upsell_potential: Decimal,
    /// Renewal orders per ordering customer over the trailing year, x100
    pub renewal_rate: f64,
    pub avg_customer_value: Decimal,
    pub renewals_this_month: usize,
    pub comparisons: KpiComparisons,
}

/// Renewal activity within one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewalMetrics {
    pub renewal_orders: usize,
    pub total_orders: usize,
    pub ordering_customers: usize,
    pub renewal_revenue: Decimal,
    pub renewal_rate: f64,
}

impl RenewalMetrics {
    /// Renewal orders as a percentage of all orders, unrounded.
    pub fn renewal_share(&self) -> f64 {
        if self.total_orders == 0 {
            0.0
        } else {
            self.renewal_orders as f64 / self.total_orders as f64 * 100.0
        }
    }
}

pub fn renewal_metrics(dataset: &Dataset, period: &Period) -> RenewalMetrics {
    let mut renewal_orders = 0;
    let mut total_orders = 0;
    let mut renewal_revenue = Decimal::ZERO;
    let mut customers: HashSet<&str> = HashSet::new();

    for order in dataset
        .submitted_orders()
        .filter(|o| period.contains(o.transaction_date))
    {
        total_orders += 1;
        customers.insert(order.customer_id.as_str());
        if order.is_renewal() {
            renewal_orders += 1;
            renewal_revenue += order.grand_total;
        }
    }

    let renewal_rate = if customers.is_empty() {
        0.0
    } else {
        round1(renewal_orders as f64 / customers.len() as f64 * 100.0)
    };

    RenewalMetrics {
        renewal_orders,
        total_orders,
        ordering_customers: customers.len(),
        renewal_revenue,
        renewal_rate,
    }
}

/// Distinct enabled customers that have gone quiet or hold a past-due subscription.
///
/// A customer counts as inactive when it has completed orders but none dated on
/// or after `today - inactivity_days`.
pub fn at_risk_count(dataset: &Dataset, today: NaiveDate, inactivity_days: i64) -> usize {
    let cutoff = days_before(today, inactivity_days.max(0) as u64);

    let mut last_order: HashMap<&str, NaiveDate> = HashMap::new();
    for order in dataset.submitted_orders() {
        let entry = last_order
            .entry(order.customer_id.as_str())
            .or_insert(order.transaction_date);
        *entry = (*entry).max(order.transaction_date);
    }

    let past_due: HashSet<&str> = dataset
        .subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::PastDueDate)
        .map(|s| s.customer_id.as_str())
        .collect();

    dataset
        .enabled_customers()
        .filter(|c| {
            let inactive = last_order
                .get(c.id.as_str())
                .is_some_and(|&last| last < cutoff);
            inactive || past_due.contains(c.id.as_str())
        })
        .count()
}

/// Trailing-year order value of customers whose open subscription ends within
/// the next `window_days`.
pub fn upcoming_renewal_revenue(dataset: &Dataset, today: NaiveDate, window_days: i64) -> Decimal {
    let window = Period {
        start: today,
        end: days_after(today, window_days.max(0) as u64),
    };
    let renewing: HashSet<&str> = dataset
        .subscriptions
        .iter()
        .filter(|s| s.status.is_open() && window.contains(s.end_date))
        .map(|s| s.customer_id.as_str())
        .collect();

    let since = one_year_before(today);
    dataset
        .submitted_orders()
        .filter(|o| renewing.contains(o.customer_id.as_str()) && o.transaction_date >= since)
        .map(|o| o.grand_total)
        .sum()
}

/// Mean lifetime value over every customer with at least one completed order.
pub fn average_customer_value(dataset: &Dataset) -> Decimal {
    let mut lifetime: HashMap<&str, Decimal> = HashMap::new();
    for order in dataset.submitted_orders() {
        *lifetime.entry(order.customer_id.as_str()).or_default() += order.grand_total;
    }
    if lifetime.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = lifetime.values().sum();
    (total / Decimal::from(lifetime.len() as u64))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// This calendar month against the previous one.
pub fn kpi_comparisons(dataset: &Dataset, today: NaiveDate) -> KpiComparisons {
    let this_month = Period::month_of(today);
    let last_month = Period::previous_month_of(today);

    let new_customers = |period: &Period| {
        dataset
            .enabled_customers()
            .filter(|c| period.contains(c.created))
            .count() as f64
    };

    let current = renewal_metrics(dataset, &this_month);
    let previous = renewal_metrics(dataset, &last_month);

    KpiComparisons {
        customers: compare(new_customers(&this_month), new_customers(&last_month), false),
        renewal_revenue: compare(
            current.renewal_revenue.to_f64().unwrap_or(0.0),
            previous.renewal_revenue.to_f64().unwrap_or(0.0),
            false,
        ),
        renewal_rate: compare(current.renewal_share(), previous.renewal_share(), true),
        renewals_count: compare(
            current.renewal_orders as f64,
            previous.renewal_orders as f64,
            false,
        ),
        at_risk: KpiComparison::unavailable(),
    }
}

pub fn dashboard_kpis(dataset: &Dataset, config: &DashboardConfig, today: NaiveDate) -> DashboardKpis {
    let total_customers = dataset.enabled_customers().count();

    let trailing_year = Period {
        start: days_before(today, 365),
        end: today,
    };
    let yearly = renewal_metrics(dataset, &trailing_year);

    let kpis = DashboardKpis {
        total_customers,
        revenue_up_for_renewal: upcoming_renewal_revenue(
            dataset,
            today,
            config.revenue_window_days(),
        ),
        clients_at_risk: at_risk_count(dataset, today, config.inactivity_risk_days()),
        upsell_potential: estimate_portfolio_upsell(&dataset.seat_holdings()),
        renewal_rate: yearly.renewal_rate,
        avg_customer_value: average_customer_value(dataset),
        renewals_this_month: renewal_metrics(dataset, &Period::month_of(today)).renewal_orders,
        comparisons: kpi_comparisons(dataset, today),
    };

    tracing::debug!(
        customers = kpis.total_customers,
        at_risk = kpis.clients_at_risk,
        "computed dashboard kpis"
    );
    kpis
}
