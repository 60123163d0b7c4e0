use super::period::{one_year_before, Period};
use crate::dataset::{Dataset, SubscriptionStatus};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Annual value at or above which a renewal is high risk.
pub const HIGH_VALUE_THRESHOLD: i64 = 5_000;
pub const MEDIUM_VALUE_THRESHOLD: i64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRisk {
    High,
    Medium,
    Low,
}

impl ValueRisk {
    pub fn from_value(value: Decimal) -> Self {
        if value >= Decimal::from(HIGH_VALUE_THRESHOLD) {
            ValueRisk::High
        } else if value >= Decimal::from(MEDIUM_VALUE_THRESHOLD) {
            ValueRisk::Medium
        } else {
            ValueRisk::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueRisk::High => "high",
            ValueRisk::Medium => "medium",
            ValueRisk::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEntry {
    pub subscription_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub end_date: NaiveDate,
    pub status: SubscriptionStatus,
    pub annual_value: Decimal,
    pub value_risk: ValueRisk,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub entries: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub renewal_count: usize,
    pub total_value: Decimal,
    pub high_value_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub days_in_month: i64,
    /// 0 = Monday
    pub first_day_weekday: u32,
    pub days: Vec<CalendarDay>,
    pub summary: MonthSummary,
}

/// Open subscriptions of enabled customers ending between `from` and `to`
/// inclusive, soonest first.
pub fn renewal_calendar(dataset: &Dataset, from: NaiveDate, to: NaiveDate) -> Vec<CalendarEntry> {
    let period = Period { start: from, end: to };

    let mut entries: Vec<CalendarEntry> = dataset
        .subscriptions
        .iter()
        .filter(|s| s.status.is_open() && period.contains(s.end_date))
        .filter_map(|s| {
            let customer = dataset.find_customer(&s.customer_id)?;
            if customer.disabled {
                return None;
            }
            let since = one_year_before(s.end_date);
            let annual_value: Decimal = dataset
                .submitted_orders()
                .filter(|o| o.customer_id == s.customer_id && o.transaction_date >= since)
                .map(|o| o.grand_total)
                .sum();
            Some(CalendarEntry {
                subscription_id: s.id.clone(),
                customer_id: s.customer_id.clone(),
                customer_name: customer.name.clone(),
                end_date: s.end_date,
                status: s.status,
                annual_value,
                value_risk: ValueRisk::from_value(annual_value),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.end_date
            .cmp(&b.end_date)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    entries
}

/// Renewals of one calendar month grouped by day, highest value first within a day.
///
/// # Errors
///
/// Returns an error if `year`/`month` do not name a calendar month.
pub fn calendar_month(dataset: &Dataset, year: i32, month: u32) -> Result<CalendarMonth> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow::anyhow!("Invalid month {}-{:02}", year, month))?;
    let period = Period::month_of(first_day);

    let entries = renewal_calendar(dataset, period.start, period.end);

    let summary = MonthSummary {
        renewal_count: entries.len(),
        total_value: entries.iter().map(|e| e.annual_value).sum(),
        high_value_count: entries
            .iter()
            .filter(|e| e.value_risk == ValueRisk::High)
            .count(),
    };

    let mut by_day: BTreeMap<NaiveDate, Vec<CalendarEntry>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(entry.end_date).or_default().push(entry);
    }
    let days = by_day
        .into_iter()
        .map(|(date, mut entries)| {
            entries.sort_by(|a, b| b.annual_value.cmp(&a.annual_value));
            CalendarDay { date, entries }
        })
        .collect();

    Ok(CalendarMonth {
        year,
        month,
        month_name: first_day.format("%B %Y").to_string(),
        first_day: period.start,
        last_day: period.end,
        days_in_month: period.days(),
        first_day_weekday: first_day.weekday().num_days_from_monday(),
        days,
        summary,
    })
}
