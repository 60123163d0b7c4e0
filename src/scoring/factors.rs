use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Lower or upper bound of a scoring bucket. Buckets are evaluated in order and
/// the first match wins, so tables end with `Otherwise`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp<T> {
    AtLeast(T),
    AtMost(T),
    Otherwise,
}

impl<T: PartialOrd> RangeOp<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            RangeOp::AtLeast(n) => value >= n,
            RangeOp::AtMost(n) => value <= n,
            RangeOp::Otherwise => true,
        }
    }
}

impl<T: fmt::Display> fmt::Display for RangeOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::AtLeast(n) => write!(f, ">={}", n),
            RangeOp::AtMost(n) => write!(f, "<={}", n),
            RangeOp::Otherwise => f.write_str("otherwise"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Bucket<T> {
    pub range: RangeOp<T>,
    pub points: u8,
}

impl<T: fmt::Display> Bucket<T> {
    /// Human-readable bucket text, e.g. ">=10000 -> 40".
    pub fn describe(&self, unit: &str) -> String {
        match self.range {
            RangeOp::Otherwise => format!("otherwise -> {}", self.points),
            _ => format!("{}{} -> {}", self.range, unit, self.points),
        }
    }
}

/// First bucket whose range matches `value`.
pub fn match_bucket<'a, T: PartialOrd>(buckets: &'a [Bucket<T>], value: &T) -> Option<&'a Bucket<T>> {
    buckets.iter().find(|b| b.range.matches(value))
}

/// The four scoring components. Their maxima sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Revenue,
    Urgency,
    Tier,
    Engagement,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::Revenue,
        Component::Urgency,
        Component::Tier,
        Component::Engagement,
    ];

    pub fn max_points(&self) -> u8 {
        match self {
            Component::Revenue => 40,
            Component::Urgency => 35,
            Component::Tier => 15,
            Component::Engagement => 10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Component::Revenue => "Revenue",
            Component::Urgency => "Urgency",
            Component::Tier => "Tier",
            Component::Engagement => "Engagement",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn revenue_buckets() -> [Bucket<Decimal>; 5] {
    [
        Bucket { range: RangeOp::AtLeast(Decimal::from(10_000)), points: 40 },
        Bucket { range: RangeOp::AtLeast(Decimal::from(5_000)), points: 30 },
        Bucket { range: RangeOp::AtLeast(Decimal::from(2_000)), points: 20 },
        Bucket { range: RangeOp::AtLeast(Decimal::from(500)), points: 10 },
        Bucket { range: RangeOp::Otherwise, points: 5 },
    ]
}

pub const OVERDUE_BUCKETS: [Bucket<i64>; 4] = [
    Bucket { range: RangeOp::AtLeast(30), points: 35 },
    Bucket { range: RangeOp::AtLeast(14), points: 30 },
    Bucket { range: RangeOp::AtLeast(7), points: 25 },
    Bucket { range: RangeOp::Otherwise, points: 20 },
];

pub const DUE_SOON_BUCKETS: [Bucket<i64>; 4] = [
    Bucket { range: RangeOp::AtMost(7), points: 18 },
    Bucket { range: RangeOp::AtMost(14), points: 12 },
    Bucket { range: RangeOp::AtMost(21), points: 8 },
    Bucket { range: RangeOp::Otherwise, points: 4 },
];

pub const ENGAGEMENT_BUCKETS: [Bucket<u32>; 4] = [
    Bucket { range: RangeOp::AtLeast(10), points: 10 },
    Bucket { range: RangeOp::AtLeast(5), points: 7 },
    Bucket { range: RangeOp::AtLeast(2), points: 4 },
    Bucket { range: RangeOp::Otherwise, points: 1 },
];

/// Tier groups matched case-insensitively against the customer group.
#[derive(Debug, Clone, Copy)]
pub struct TierGroup {
    pub names: &'static [&'static str],
    pub points: u8,
}

pub const TIER_GROUPS: [TierGroup; 2] = [
    TierGroup { names: &["enterprise", "strategic", "vip"], points: 15 },
    TierGroup { names: &["commercial", "smb"], points: 8 },
];

pub const TIER_FALLBACK_POINTS: u8 = 3;

impl TierGroup {
    pub fn matches(&self, tier: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(tier))
    }

    pub fn describe(&self) -> String {
        format!("{} -> {}", self.names.join("/"), self.points)
    }
}
