use super::period::trailing_months;
use crate::dataset::Dataset;
use crate::scoring::kpi::round1;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub const DEFAULT_TREND_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTrend {
    pub month: String,
    pub month_short: String,
    pub renewals: usize,
    pub new_orders: usize,
    pub total_orders: usize,
    /// Share of the month's orders that were renewals, in percent
    pub renewal_rate: f64,
    pub total_revenue: Decimal,
    pub renewal_revenue: Decimal,
    pub new_revenue: Decimal,
}

/// Monthly order activity for the last `months` calendar months, oldest first.
/// Zero months means the default span.
pub fn trend_data(dataset: &Dataset, today: NaiveDate, months: u32) -> Vec<MonthTrend> {
    let months = if months == 0 { DEFAULT_TREND_MONTHS } else { months };

    trailing_months(today, months)
        .into_iter()
        .map(|period| {
            let mut trend = MonthTrend {
                month: period.start.format("%b %Y").to_string(),
                month_short: period.start.format("%b").to_string(),
                renewals: 0,
                new_orders: 0,
                total_orders: 0,
                renewal_rate: 0.0,
                total_revenue: Decimal::ZERO,
                renewal_revenue: Decimal::ZERO,
                new_revenue: Decimal::ZERO,
            };
            for order in dataset
                .submitted_orders()
                .filter(|o| period.contains(o.transaction_date))
            {
                trend.total_orders += 1;
                trend.total_revenue += order.grand_total;
                if order.is_renewal() {
                    trend.renewals += 1;
                    trend.renewal_revenue += order.grand_total;
                } else if order.is_new() {
                    trend.new_orders += 1;
                    trend.new_revenue += order.grand_total;
                }
            }
            if trend.total_orders > 0 {
                trend.renewal_rate =
                    round1(trend.renewals as f64 / trend.total_orders as f64 * 100.0);
            }
            trend
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{sample_dataset, today};

    #[test]
    fn test_last_three_months() {
        let trends = trend_data(&sample_dataset(), today(), 3);
        let labels: Vec<&str> = trends.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(labels, vec!["Aug 2026", "Sep 2026", "Oct 2026"]);
        assert_eq!(trends[2].month_short, "Oct");

        assert_eq!(trends[0].renewals, 1);
        assert_eq!(trends[0].renewal_revenue, Decimal::from(1100));
        assert_eq!(trends[0].renewal_rate, 100.0);

        // The October draft order is not counted
        let october = &trends[2];
        assert_eq!(october.total_orders, 1);
        assert_eq!(october.total_revenue, Decimal::from(800));
    }

    #[test]
    fn test_mixed_month_rate() {
        let trends = trend_data(&sample_dataset(), today(), 12);
        assert_eq!(trends.len(), 12);
        // Nov 2025: Acme's first order is new, no renewals
        let november = &trends[0];
        assert_eq!(november.month, "Nov 2025");
        assert_eq!(november.new_orders, 1);
        assert_eq!(november.renewals, 0);
        assert_eq!(november.renewal_rate, 0.0);
        // Jun 2026: one Acme renewal and Gamma's first order
        let june = &trends[7];
        assert_eq!(june.month, "Jun 2026");
        assert_eq!(june.total_orders, 2);
        assert_eq!(june.renewal_rate, 50.0);
        assert_eq!(june.new_revenue, Decimal::from(300));
    }

    #[test]
    fn test_zero_months_uses_default() {
        assert_eq!(trend_data(&sample_dataset(), today(), 0).len(), 12);
    }

    #[test]
    fn test_empty_month() {
        let trends = trend_data(&crate::dataset::Dataset::default(), today(), 1);
        assert_eq!(trends[0].total_orders, 0);
        assert_eq!(trends[0].renewal_rate, 0.0);
    }
}
