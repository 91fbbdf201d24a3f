//! Day-bucket date semantics.
//!
//! Observation dates are stored as Unix epoch seconds at full precision,
//! but lookups compare them at calendar-day granularity. Every bucket is
//! a UTC calendar day, so two timestamps share a bucket exactly when they
//! fall between the same pair of UTC midnights.
//!
//! ```
//! use skycache_types::{DayBucket, same_day};
//!
//! // 2014-12-20 23:59:59 UTC and 2014-12-21 00:00:01 UTC
//! assert!(!same_day(1_419_119_999, 1_419_120_001));
//! assert!(same_day(1_419_033_600, 1_419_119_999));
//!
//! let day = DayBucket::of(1_419_033_600);
//! assert_eq!(day.to_string(), "2014-12-20");
//! ```

use core::fmt;

use time::{Date, OffsetDateTime, macros::format_description};

use crate::error::{ParseError, ParseResult};

/// Number of seconds in one calendar day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Day holding `i64::MIN`, the earliest bucket a timestamp can fall in.
const FIRST_DAY: i64 = i64::MIN.div_euclid(SECONDS_PER_DAY);

/// Day holding `i64::MAX`.
const LAST_DAY: i64 = i64::MAX.div_euclid(SECONDS_PER_DAY);

/// A UTC calendar day, stored as days since the Unix epoch.
///
/// Buckets always lie between the day of `i64::MIN` and the day of
/// `i64::MAX`, so every bucket contains at least one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayBucket(i64);

impl DayBucket {
    /// The bucket containing the given epoch-seconds timestamp.
    #[must_use]
    pub fn of(timestamp: i64) -> Self {
        Self(timestamp.div_euclid(SECONDS_PER_DAY))
    }

    /// The bucket for a calendar date.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self::of(date.midnight().assume_utc().unix_timestamp())
    }

    /// The bucket containing the current instant.
    #[must_use]
    pub fn today() -> Self {
        Self::of(OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Parse either a `YYYY-MM-DD` date or an integer epoch-seconds timestamp.
    ///
    /// ```
    /// use skycache_types::DayBucket;
    ///
    /// assert_eq!(DayBucket::parse("2014-12-20"), DayBucket::parse("1419033600"));
    /// assert!(DayBucket::parse("December 20").is_err());
    /// ```
    pub fn parse(s: &str) -> ParseResult<Self> {
        let s = s.trim();
        if let Ok(timestamp) = s.parse::<i64>() {
            return Ok(Self::of(timestamp));
        }

        let format = format_description!("[year]-[month]-[day]");
        Date::parse(s, &format)
            .map(Self::from_date)
            .map_err(|_| ParseError::InvalidDay(s.to_string()))
    }

    /// Days elapsed since 1970-01-01 (negative before the epoch).
    #[must_use]
    pub fn days_since_epoch(&self) -> i64 {
        self.0
    }

    /// First second of the day (inclusive).
    ///
    /// The earliest representable day starts at `i64::MIN`, part way
    /// through its calendar day.
    #[must_use]
    pub fn start(&self) -> i64 {
        self.0.saturating_mul(SECONDS_PER_DAY)
    }

    /// Last second of the day (inclusive).
    ///
    /// The latest representable day ends at `i64::MAX`.
    #[must_use]
    pub fn last(&self) -> i64 {
        (self.0 + 1)
            .checked_mul(SECONDS_PER_DAY)
            .map_or(i64::MAX, |next| next - 1)
    }

    /// First second of the following day (exclusive upper bound).
    ///
    /// Saturates at `i64::MAX` for the latest representable day.
    #[must_use]
    pub fn end(&self) -> i64 {
        self.last().saturating_add(1)
    }

    /// Whether the timestamp falls inside this day.
    #[must_use]
    pub fn contains(&self, timestamp: i64) -> bool {
        Self::of(timestamp) == *self
    }

    /// The bucket `days` days later (or earlier, for negative values).
    #[must_use]
    pub fn offset(&self, days: i64) -> Self {
        Self(self.0.saturating_add(days).clamp(FIRST_DAY, LAST_DAY))
    }

    /// The calendar date of this bucket.
    pub fn date(&self) -> ParseResult<Date> {
        OffsetDateTime::from_unix_timestamp(self.start())
            .map(|dt| dt.date())
            .map_err(|_| ParseError::TimestampOutOfRange(self.start()))
    }
}

impl fmt::Display for DayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date() {
            Ok(date) => write!(
                f,
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
            Err(_) => write!(f, "day {}", self.0),
        }
    }
}

/// Whether two epoch-seconds timestamps fall on the same UTC calendar day.
///
/// Time of day is ignored: `23:59:59` and `00:00:01` on the next day are
/// different days even though they are two seconds apart.
#[must_use]
pub fn same_day(a: i64, b: i64) -> bool {
    DayBucket::of(a) == DayBucket::of(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::macros::date;

    const DEC_20_2014: i64 = 1_419_033_600;

    #[test]
    fn test_same_day_identical() {
        assert!(same_day(DEC_20_2014, DEC_20_2014));
    }

    #[test]
    fn test_same_day_across_midnight() {
        let last_second = DEC_20_2014 + SECONDS_PER_DAY - 1;
        let next_day = DEC_20_2014 + SECONDS_PER_DAY + 1;
        assert!(same_day(DEC_20_2014, last_second));
        assert!(!same_day(last_second, next_day));
    }

    #[test]
    fn test_same_day_before_epoch() {
        // 1969-12-31 23:59:59 vs 1970-01-01 00:00:00
        assert!(!same_day(-1, 0));
        assert!(same_day(-1, -SECONDS_PER_DAY));
    }

    #[test]
    fn test_bucket_bounds() {
        let day = DayBucket::of(DEC_20_2014 + 3_600 * 13);
        assert_eq!(day.start(), DEC_20_2014);
        assert_eq!(day.end(), DEC_20_2014 + SECONDS_PER_DAY);
        assert!(day.contains(DEC_20_2014));
        assert!(!day.contains(day.end()));
    }

    #[test]
    fn test_bucket_date() {
        let day = DayBucket::of(DEC_20_2014);
        assert_eq!(day.date().unwrap(), date!(2014 - 12 - 20));
        assert_eq!(DayBucket::from_date(date!(2014 - 12 - 20)), day);
    }

    #[test]
    fn test_parse_date_string() {
        let day = DayBucket::parse("2014-12-20").unwrap();
        assert_eq!(day.start(), DEC_20_2014);
    }

    #[test]
    fn test_parse_epoch_seconds() {
        let day = DayBucket::parse(" 1419040800 ").unwrap();
        assert_eq!(day.start(), DEC_20_2014);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            DayBucket::parse("tomorrow"),
            Err(ParseError::InvalidDay("tomorrow".to_string()))
        );
        assert!(DayBucket::parse("2014-13-01").is_err());
    }

    #[test]
    fn test_offset_and_ordering() {
        let day = DayBucket::of(DEC_20_2014);
        assert_eq!(day.offset(1).start(), DEC_20_2014 + SECONDS_PER_DAY);
        assert!(day < day.offset(1));
        assert_eq!(day.offset(-1).offset(1), day);
    }

    #[test]
    fn test_display() {
        assert_eq!(DayBucket::of(0).to_string(), "1970-01-01");
        assert_eq!(DayBucket::of(DEC_20_2014).to_string(), "2014-12-20");
    }

    #[test]
    fn test_display_out_of_range() {
        let day = DayBucket::of(i64::MAX);
        assert!(day.date().is_err());
        assert!(day.to_string().starts_with("day "));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let first = DayBucket::of(i64::MIN);
        assert_eq!(first.start(), i64::MIN);
        assert!(first.last() < 0);
        assert!(first.contains(i64::MIN));
        assert!(first.date().is_err());
        assert!(first.to_string().starts_with("day -"));

        let last = DayBucket::of(i64::MAX);
        assert_eq!(last.last(), i64::MAX);
        assert_eq!(last.end(), i64::MAX);
        assert!(last.start() > 0);
        assert!(last.contains(i64::MAX));
    }

    #[test]
    fn test_offset_clamps_to_representable_days() {
        let first = DayBucket::of(i64::MIN);
        assert_eq!(first.offset(-1), first);
        assert_eq!(first.offset(i64::MIN).start(), i64::MIN);

        let last = DayBucket::of(i64::MAX);
        assert_eq!(last.offset(1), last);
        assert_eq!(DayBucket::of(0).offset(i64::MAX), last);
        assert_eq!(last.offset(1).last(), i64::MAX);
    }

    proptest! {
        #[test]
        fn prop_same_day_reflexive(t in any::<i64>()) {
            prop_assert!(same_day(t, t));
        }

        #[test]
        fn prop_same_day_symmetric(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(same_day(a, b), same_day(b, a));
        }

        #[test]
        fn prop_same_day_matches_bucket_bounds(
            t in -10_000_000_000i64..10_000_000_000i64,
            delta in -200_000i64..200_000i64,
        ) {
            let other = t + delta;
            let day = DayBucket::of(t);
            let expected = other >= day.start() && other < day.end();
            prop_assert_eq!(same_day(t, other), expected);
        }

        #[test]
        fn prop_bucket_bounds_hold_for_any_timestamp(t in any::<i64>()) {
            let day = DayBucket::of(t);
            prop_assert!(day.start() <= t && t <= day.last());
            prop_assert!(day.contains(day.start()) && day.contains(day.last()));
        }

        #[test]
        fn prop_bucket_start_is_midnight(t in -10_000_000_000i64..10_000_000_000i64) {
            let day = DayBucket::of(t);
            prop_assert!(day.start() <= t && t < day.end());
            let dt = OffsetDateTime::from_unix_timestamp(day.start()).unwrap();
            prop_assert_eq!(dt.hour(), 0);
            prop_assert_eq!(dt.minute(), 0);
            prop_assert_eq!(dt.second(), 0);
        }
    }
}
