use chrono::{Datelike, Days, Months, NaiveDate};

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = days_before(date, date.day0() as u64);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// Calendar month before the one containing `date`
    pub fn previous_month_of(date: NaiveDate) -> Self {
        let this_month = Self::month_of(date);
        Self::month_of(days_before(this_month.start, 1))
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// `date + days`, clamped to the last representable date.
pub fn days_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// `date - days`, clamped to the first representable date.
pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// The last `count` calendar months up to and including the month of `today`, oldest first.
///
/// Months before the first representable date are left out.
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<Period> {
    let current = Period::month_of(today);
    (0..count)
        .rev()
        .filter_map(|back| current.start.checked_sub_months(Months::new(back)))
        .map(Period::month_of)
        .collect()
}

/// Same calendar day one year earlier (Feb 29 maps to Feb 28).
pub fn one_year_before(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_of() {
        let period = Period::month_of(date(2026, 10, 19));
        assert_eq!(period.start, date(2026, 10, 1));
        assert_eq!(period.end, date(2026, 10, 31));
        assert_eq!(period.days(), 31);
    }

    #[test]
    fn test_month_of_december_and_february() {
        let dec = Period::month_of(date(2026, 12, 31));
        assert_eq!(dec.end, date(2026, 12, 31));
        let feb = Period::month_of(date(2028, 2, 10));
        assert_eq!(feb.end, date(2028, 2, 29));
    }

    #[test]
    fn test_previous_month_crosses_year() {
        let period = Period::previous_month_of(date(2026, 1, 15));
        assert_eq!(period.start, date(2025, 12, 1));
        assert_eq!(period.end, date(2025, 12, 31));
    }

    #[test]
    fn test_trailing_months_oldest_first() {
        let months = trailing_months(date(2026, 2, 10), 3);
        let starts: Vec<NaiveDate> = months.iter().map(|p| p.start).collect();
        assert_eq!(starts, vec![date(2025, 12, 1), date(2026, 1, 1), date(2026, 2, 1)]);
    }

    #[test]
    fn test_one_year_before_leap_day() {
        assert_eq!(one_year_before(date(2028, 2, 29)), date(2027, 2, 28));
        assert_eq!(one_year_before(date(2026, 10, 19)), date(2025, 10, 19));
    }

    #[test]
    fn test_huge_month_count_does_not_overflow() {
        let months = trailing_months(date(2026, 10, 19), 4_000_000);
        assert!(!months.is_empty());
        assert_eq!(months.last().unwrap().start, date(2026, 10, 1));
        assert!(months.len() < 4_000_000);
    }

    #[test]
    fn test_day_offsets_saturate() {
        assert_eq!(days_after(date(2026, 10, 19), u64::MAX), NaiveDate::MAX);
        assert_eq!(days_before(date(2026, 10, 19), u64::MAX), NaiveDate::MIN);
        assert_eq!(days_after(date(2026, 10, 19), 12), date(2026, 10, 31));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let period = Period::month_of(date(2026, 9, 5));
        assert!(period.contains(date(2026, 9, 1)));
        assert!(period.contains(date(2026, 9, 30)));
        assert!(!period.contains(date(2026, 10, 1)));
    }
}
