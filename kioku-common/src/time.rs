//! Timestamp utilities
//!
//! All instants are UTC. Dates widen to instants through `start_of_day` /
//! `end_of_day`; windows built from them are inclusive on both ends.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// First instant of the given day (00:00:00.0 UTC)
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant of the given day (23:59:59.999999999 UTC).
///
/// `NaiveDate::MAX` is a valid open-ended sentinel here; its day has no next
/// midnight, so the result saturates at the calendar's last instant.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    match date.checked_add_days(Days::new(1)) {
        Some(next) => start_of_day(next) - chrono::Duration::nanoseconds(1),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_start_of_day() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 14).unwrap();
        let instant = start_of_day(date);
        assert_eq!(instant.to_rfc3339(), "2023-06-14T00:00:00+00:00");
    }

    #[test]
    fn test_end_of_day_nanosecond_precision() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 14).unwrap();
        let instant = end_of_day(date);
        assert_eq!(instant.hour(), 23);
        assert_eq!(instant.minute(), 59);
        assert_eq!(instant.second(), 59);
        assert_eq!(instant.nanosecond(), 999_999_999);
    }

    #[test]
    fn test_end_of_day_saturates_at_max_date() {
        // Open-ended windows pass the max date as their till bound
        assert_eq!(end_of_day(NaiveDate::MAX), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_end_of_day_is_before_next_day() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(end_of_day(date) < start_of_day(next));
    }
}
