pub mod config;
pub mod engine;
pub mod factors;
pub mod kpi;
pub mod renewal;
pub mod snapshot;
pub mod upsell;
pub mod validation;

pub use config::ScoringConfig;
pub use engine::{calculate_priority, ComponentScore, PriorityLevel, PriorityScore};
pub use factors::Component;
pub use kpi::{compare, Direction, KpiComparison};
pub use renewal::{classify, classify_with, days_since, days_until, RenewalStatus, RenewalWindows};
pub use snapshot::CustomerSnapshot;
pub use upsell::{
    estimate_customer_upsell, estimate_portfolio_upsell, upsell_recommendations, OrderFacts,
    ProductBreakdown, ProductUsage, Recommendation, RecommendationKind, SeatHolding,
};
pub use validation::validate_scoring;
