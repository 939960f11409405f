//! Client-side date filtering.
//!
//! [`DateRange`] keeps records whose `updated_at` falls inside inclusive
//! bounds. Records without an interpretable `updated_at` always pass.
//! Day-only bounds typed by an operator are resolved in their local zone.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::CoreError;
use crate::models::ComponentRecord;

/// Inclusive `updated_at` bounds. Both ends are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// A range that keeps every record.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Creates a range from instants.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDateRange`] if `start` is after `end`.
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, CoreError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CoreError::InvalidDateRange {
                    start: s.to_rfc3339(),
                    end: e.to_rfc3339(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates a range from whole days (UTC): `start` from 00:00:00, `end`
    /// through the last instant of that day.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDateRange`] if `start` is after `end`.
    pub fn from_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, CoreError> {
        Self::new(
            start.map(|d| start_of_day(d, &Utc)),
            end.map(|d| end_of_day(d, &Utc)),
        )
    }

    /// Parses optional command-line bounds, resolving whole days in the
    /// local time zone.
    ///
    /// Each bound is either `YYYY-MM-DD` (day granularity) or an RFC 3339
    /// timestamp (used as given).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDate`] for malformed input and
    /// [`CoreError::InvalidDateRange`] for inverted bounds.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, CoreError> {
        Self::parse_in(start, end, &Local)
    }

    /// Like [`DateRange::parse`], with whole days resolved in `tz`.
    ///
    /// # Errors
    ///
    /// Same as [`DateRange::parse`].
    pub fn parse_in<Tz: TimeZone>(
        start: Option<&str>,
        end: Option<&str>,
        tz: &Tz,
    ) -> Result<Self, CoreError> {
        let start = start
            .map(|s| parse_bound(s, |d| start_of_day(d, tz)))
            .transpose()?;
        let end = end.map(|s| parse_bound(s, |d| end_of_day(d, tz))).transpose()?;
        Self::new(start, end)
    }

    /// Returns the start bound.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Returns the end bound.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns true if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns true if the record passes the filter.
    pub fn matches(&self, record: &ComponentRecord) -> bool {
        let Some(updated) = record.updated_at_datetime() else {
            return true;
        };
        self.start.is_none_or(|s| updated >= s) && self.end.is_none_or(|e| updated <= e)
    }

    /// Keeps matching records, preserving their order.
    pub fn filter(&self, records: Vec<ComponentRecord>) -> Vec<ComponentRecord> {
        if self.is_unbounded() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    resolve(&naive, tz.from_local_datetime(&naive).earliest())
}

fn end_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    let naive = day.and_time(last);
    resolve(&naive, tz.from_local_datetime(&naive).latest())
}

/// A wall-clock time skipped by a DST jump falls back to reading it as UTC.
fn resolve<Tz: TimeZone>(naive: &NaiveDateTime, local: Option<DateTime<Tz>>) -> DateTime<Utc> {
    local.map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
}

fn parse_bound(
    input: &str,
    day_bound: impl FnOnce(NaiveDate) -> DateTime<Utc>,
) -> Result<DateTime<Utc>, CoreError> {
    let text = input.trim();
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(day_bound(day));
    }
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CoreError::InvalidDate(input.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use chrono::FixedOffset;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_at(id: i64, y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> ComponentRecord {
        ComponentRecord::new(id, format!("r{id}"))
            .with_updated_at(Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap())
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::from_days(Some(day(2024, 3, 10)), Some(day(2024, 3, 10))).unwrap();
        let records = vec![
            record_at(1, 2024, 3, 10, 0, 0, 0),
            record_at(2, 2024, 3, 10, 12, 0, 0),
            record_at(3, 2024, 3, 11, 0, 0, 1),
        ];

        let kept: Vec<String> = range.filter(records).iter().map(|r| r.id.to_string()).collect();
        assert_eq!(kept, ["1", "2"]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 18, 30, 0).unwrap();
        let range = DateRange::new(Some(start), Some(end)).unwrap();

        assert!(range.matches(&ComponentRecord::new(1, "").with_updated_at(start)));
        assert!(range.matches(&ComponentRecord::new(2, "").with_updated_at(end)));
        assert!(!range.matches(
            &ComponentRecord::new(3, "").with_updated_at(end + chrono::Duration::seconds(1))
        ));
    }

    #[test]
    fn test_end_of_day_includes_last_second() {
        let range = DateRange::from_days(None, Some(day(2024, 3, 10))).unwrap();
        assert!(range.matches(&record_at(1, 2024, 3, 10, 23, 59, 59)));
        assert!(!range.matches(&record_at(2, 2024, 3, 11, 0, 0, 0)));
    }

    #[test]
    fn test_unbounded_is_identity() {
        let records = vec![
            record_at(1, 1999, 1, 1, 0, 0, 0),
            ComponentRecord::new(2, "no timestamp"),
            record_at(3, 2099, 1, 1, 0, 0, 0),
        ];
        assert_eq!(DateRange::unbounded().filter(records.clone()), records);
    }

    #[test]
    fn test_missing_or_raw_timestamps_always_pass() {
        let range = DateRange::from_days(Some(day(2024, 1, 1)), Some(day(2024, 1, 1))).unwrap();
        assert!(range.matches(&ComponentRecord::new(1, "missing")));
        assert!(range.matches(
            &ComponentRecord::new(2, "garbled").with_updated_at(Timestamp::Raw("??".into()))
        ));
    }

    #[test]
    fn test_open_ended_ranges() {
        let from = DateRange::from_days(Some(day(2024, 6, 1)), None).unwrap();
        assert!(from.matches(&record_at(1, 2030, 1, 1, 0, 0, 0)));
        assert!(!from.matches(&record_at(2, 2024, 5, 31, 23, 59, 59)));

        let until = DateRange::from_days(None, Some(day(2024, 6, 1))).unwrap();
        assert!(until.matches(&record_at(3, 1970, 1, 2, 0, 0, 0)));
    }

    #[test]
    fn test_parse_bounds() {
        let range =
            DateRange::parse_in(Some("2024-02-01"), Some("2024-02-01T12:00:00+02:00"), &Utc)
                .unwrap();
        assert_eq!(range.start(), Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert_eq!(range.end(), Some(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()));

        assert!(matches!(
            DateRange::parse(Some("01/02/2024"), None),
            Err(CoreError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_day_bounds_follow_operator_zone() {
        let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();
        let range = DateRange::parse_in(Some("2024-03-10"), Some("2024-03-10"), &jakarta).unwrap();

        assert_eq!(range.start(), Some(Utc.with_ymd_and_hms(2024, 3, 9, 17, 0, 0).unwrap()));

        let early_local = jakarta.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();
        let early = ComponentRecord::new(1, "").with_updated_at(early_local.with_timezone(&Utc));
        assert!(range.matches(&early));
        assert!(range.matches(&record_at(2, 2024, 3, 10, 16, 59, 59)));
        assert!(!range.matches(&record_at(3, 2024, 3, 10, 17, 0, 0)));
        assert!(!range.matches(&record_at(4, 2024, 3, 9, 16, 59, 59)));
    }

    #[test]
    fn test_parse_defaults_to_local_zone() {
        assert_eq!(
            DateRange::parse(Some("2024-03-10"), Some("2024-03-12")).unwrap(),
            DateRange::parse_in(Some("2024-03-10"), Some("2024-03-12"), &Local).unwrap()
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = DateRange::from_days(Some(day(2024, 2, 2)), Some(day(2024, 2, 1)));
        assert!(matches!(result, Err(CoreError::InvalidDateRange { .. })));
    }
}
