use super::factors::{
    match_bucket, revenue_buckets, Bucket, Component, DUE_SOON_BUCKETS, ENGAGEMENT_BUCKETS,
    OVERDUE_BUCKETS, TIER_FALLBACK_POINTS, TIER_GROUPS,
};
use super::renewal::{RenewalStatus, DUE_SOON_WINDOW_DAYS};
use super::snapshot::CustomerSnapshot;
use serde::Serialize;
use std::fmt;

/// Highest possible total; the component maxima already sum to this.
pub const MAX_PRIORITY_SCORE: u8 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct ComponentScore {
    pub component: Component,
    pub points: u8,
    pub max_points: u8,
    pub tier_label: String,  // matched bucket, e.g. ">=10000"
    pub explanation: String, // e.g. "lifetime value 12000.00"
    pub buckets: Vec<String>, // every bucket of the component, in evaluation order
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= 75 {
            PriorityLevel::Critical
        } else if score >= 50 {
            PriorityLevel::High
        } else if score >= 25 {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Low => "low",
            PriorityLevel::Medium => "medium",
            PriorityLevel::High => "high",
            PriorityLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityScore {
    pub total: u8,
    pub level: PriorityLevel,
    pub components: Vec<ComponentScore>,
}

impl PriorityScore {
    pub fn component(&self, component: Component) -> Option<&ComponentScore> {
        self.components.iter().find(|c| c.component == component)
    }
}

/// Score a customer for outreach priority.
///
/// `days_until_renewal` is signed (negative once the renewal date has passed) and
/// absent when the customer has no tracked subscription.
pub fn calculate_priority(
    snapshot: &CustomerSnapshot,
    status: RenewalStatus,
    days_until_renewal: Option<i64>,
) -> PriorityScore {
    let components = vec![
        revenue_component(snapshot),
        urgency_component(status, days_until_renewal),
        tier_component(&snapshot.customer_tier),
        engagement_component(snapshot.total_orders),
    ];

    let sum: u32 = components.iter().map(|c| c.points as u32).sum();
    let total = sum.min(MAX_PRIORITY_SCORE as u32) as u8;

    PriorityScore {
        total,
        level: PriorityLevel::from_score(total),
        components,
    }
}

fn bucket_component<T: PartialOrd + fmt::Display>(
    component: Component,
    buckets: &[Bucket<T>],
    value: &T,
    unit: &str,
    explanation: String,
) -> ComponentScore {
    let (points, tier_label) = match match_bucket(buckets, value) {
        Some(bucket) => (bucket.points, bucket.range.to_string()),
        None => (0, "none".to_string()),
    };
    ComponentScore {
        component,
        points,
        max_points: component.max_points(),
        tier_label,
        explanation,
        buckets: buckets.iter().map(|b| b.describe(unit)).collect(),
    }
}

fn revenue_component(snapshot: &CustomerSnapshot) -> ComponentScore {
    bucket_component(
        Component::Revenue,
        &revenue_buckets(),
        &snapshot.lifetime_value,
        "",
        format!("lifetime value {:.2}", snapshot.lifetime_value),
    )
}

fn urgency_component(status: RenewalStatus, days_until_renewal: Option<i64>) -> ComponentScore {
    match status {
        RenewalStatus::Overdue => {
            let days_overdue = match days_until_renewal {
                Some(d) if d < 0 => d.abs(),
                _ => 0,
            };
            bucket_component(
                Component::Urgency,
                &OVERDUE_BUCKETS,
                &days_overdue,
                " days overdue",
                format!("overdue by {} days", days_overdue),
            )
        }
        RenewalStatus::DueSoon => {
            // A renewal due today has no positive lead time and counts as a full window
            let days_left = match days_until_renewal {
                Some(d) if d > 0 => d,
                _ => DUE_SOON_WINDOW_DAYS,
            };
            bucket_component(
                Component::Urgency,
                &DUE_SOON_BUCKETS,
                &days_left,
                " days left",
                format!("renewal due in {} days", days_left),
            )
        }
        RenewalStatus::Active | RenewalStatus::Unknown => ComponentScore {
            component: Component::Urgency,
            points: 0,
            max_points: Component::Urgency.max_points(),
            tier_label: status.as_str().to_string(),
            explanation: format!("renewal status {}, no urgency", status),
            buckets: OVERDUE_BUCKETS
                .iter()
                .map(|b| format!("overdue {}", b.describe(" days")))
                .chain(
                    DUE_SOON_BUCKETS
                        .iter()
                        .map(|b| format!("due soon {}", b.describe(" days"))),
                )
                .chain(std::iter::once("active/unknown -> 0".to_string()))
                .collect(),
        },
    }
}

fn tier_component(tier: &str) -> ComponentScore {
    let matched = TIER_GROUPS.iter().find(|g| g.matches(tier));
    let (points, tier_label) = match matched {
        Some(group) => (group.points, group.names.join("/")),
        None => (TIER_FALLBACK_POINTS, "other".to_string()),
    };
    let explanation = if tier.is_empty() {
        "customer group not set".to_string()
    } else {
        format!("customer group {}", tier)
    };
    let buckets = TIER_GROUPS
        .iter()
        .map(|g| g.describe())
        .chain(std::iter::once(format!("other -> {}", TIER_FALLBACK_POINTS)))
        .collect();

    ComponentScore {
        component: Component::Tier,
        points,
        max_points: Component::Tier.max_points(),
        tier_label,
        explanation,
        buckets,
    }
}

fn engagement_component(total_orders: u32) -> ComponentScore {
    bucket_component(
        Component::Engagement,
        &ENGAGEMENT_BUCKETS,
        &total_orders,
        " orders",
        format!("{} completed orders", total_orders),
    )
}
