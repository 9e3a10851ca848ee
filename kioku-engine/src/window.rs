//! Temporal window resolution
//!
//! Turns a date-filter specification into a concrete inclusive
//! `[from, to]` pair of UTC instants. Offsets count periods into the past;
//! 0 is the current period. Weeks run Monday through Sunday.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use kioku_common::time::{end_of_day, start_of_day};
use kioku_common::DateFilterType;

/// Date filter specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    pub filter_type: DateFilterType,
    /// Used by the Absolute policy only
    pub from_date: NaiveDate,
    /// Used by the Absolute policy only
    pub to_date: NaiveDate,
    pub from_offset: u32,
    pub to_offset: u32,
}

impl Default for DateFilter {
    /// Today (the current day, offset 0)
    fn default() -> Self {
        Self {
            filter_type: DateFilterType::RelativeDay,
            from_date: NaiveDate::MIN,
            to_date: NaiveDate::MAX,
            from_offset: 0,
            to_offset: 0,
        }
    }
}

impl DateFilter {
    /// Absolute window over the given dates, inclusive
    pub fn absolute(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            filter_type: DateFilterType::Absolute,
            from_date: from,
            to_date: to,
            ..Self::default()
        }
    }

    /// Relative window of the given policy, shifted by the same offset on
    /// both ends
    pub fn relative(filter_type: DateFilterType, offset: u32) -> Self {
        Self {
            filter_type,
            from_offset: offset,
            to_offset: offset,
            ..Self::default()
        }
    }
}

/// Resolve a filter against `now` into an inclusive UTC instant range.
pub fn resolve(now: DateTime<Utc>, filter: &DateFilter) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let from_offset = u64::from(filter.from_offset);
    let to_offset = u64::from(filter.to_offset);

    match filter.filter_type {
        DateFilterType::Absolute => (start_of_day(filter.from_date), end_of_day(filter.to_date)),
        DateFilterType::RelativeDay => (
            start_of_day(sub_days(today, from_offset)),
            end_of_day(sub_days(today, to_offset)),
        ),
        DateFilterType::RelativeFullWeek => {
            let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
            (
                start_of_day(sub_days(monday, 7 * from_offset)),
                end_of_day(sub_days(monday, 7 * to_offset) + Days::new(6)),
            )
        }
        DateFilterType::RelativeRollingWeek => (
            start_of_day(sub_days(today, 7 * from_offset)),
            end_of_day(sub_days(today, 7 * to_offset)),
        ),
        DateFilterType::RelativeFullMonth => {
            // Both ends land in the same shifted month, keyed by the `to`
            // offset, matching the records command's behavior.
            let shifted = sub_months(today, filter.to_offset);
            let first = shifted.with_day(1).unwrap_or(shifted);
            let last = first + Months::new(1) - Days::new(1);
            (start_of_day(first), end_of_day(last))
        }
        DateFilterType::RelativeRollingMonth => (
            start_of_day(sub_months(today, filter.from_offset)),
            end_of_day(sub_months(today, filter.to_offset)),
        ),
        DateFilterType::RelativeFullYear => {
            let jan_first = today.with_ordinal(1).unwrap_or(today);
            let from = sub_months(jan_first, filter.from_offset.saturating_mul(12));
            let to = sub_months(jan_first, filter.to_offset.saturating_mul(12))
                + Months::new(12)
                - Days::new(1);
            (start_of_day(from), end_of_day(to))
        }
        DateFilterType::RelativeRollingYear => (
            start_of_day(sub_months(today, filter.from_offset.saturating_mul(12))),
            end_of_day(sub_months(today, filter.to_offset.saturating_mul(12))),
        ),
    }
}

/// Shift back by whole days, saturating at the calendar start
fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Shift back by whole months, saturating at the calendar start
fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(NaiveDate::MIN)
}
