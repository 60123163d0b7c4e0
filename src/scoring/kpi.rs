use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

const COMPARISON_SUFFIX: &str = "vs last month";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiComparison {
    /// Absolute change, one decimal place.
    pub change: f64,
    pub direction: Direction,
    pub label: String,
    /// Signed change, one decimal place.
    pub raw_change: f64,
}

impl KpiComparison {
    /// Placeholder for metrics whose history cannot be reconstructed.
    pub fn unavailable() -> Self {
        Self {
            change: 0.0,
            direction: Direction::Neutral,
            label: COMPARISON_SUFFIX.to_string(),
            raw_change: 0.0,
        }
    }
}

/// One decimal place, ties to even, matching the `{:.1}` labels.
pub fn round1(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Compare a metric against its prior-period value.
///
/// Rates pass `is_percentage_point` so the change is the point difference
/// rather than a percentage of a percentage.
pub fn compare(current: f64, previous: f64, is_percentage_point: bool) -> KpiComparison {
    if previous == 0.0 {
        if current > 0.0 {
            return KpiComparison {
                change: 100.0,
                direction: Direction::Up,
                label: format!("+100% {}", COMPARISON_SUFFIX),
                raw_change: 100.0,
            };
        }
        return KpiComparison {
            change: 0.0,
            direction: Direction::Neutral,
            label: "No change".to_string(),
            raw_change: 0.0,
        };
    }

    let raw = if is_percentage_point {
        current - previous
    } else {
        (current - previous) / previous * 100.0
    };

    let direction = if raw > 0.0 {
        Direction::Up
    } else if raw < 0.0 {
        Direction::Down
    } else {
        Direction::Neutral
    };

    let sign = if raw > 0.0 { "+" } else { "" };
    let unit = if is_percentage_point { "pp" } else { "%" };

    KpiComparison {
        change: round1(raw.abs()),
        direction,
        label: format!("{}{:.1}{} {}", sign, raw, unit, COMPARISON_SUFFIX),
        raw_change: round1(raw),
    }
}
