//! Calendar helpers for the display timezone.
//!
//! The dashboard works with whole local days: a period `[date_from, date_to]`
//! means from 00:00:00 of the first day up to 23:59:59.999999 of the last one.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
};
use chrono_tz::Tz;

/// Attach a timezone to a local wall-clock time.
///
/// Ambiguous times take the earlier instant. A time skipped by a DST jump is
/// shifted forward by the length of the gap, so a skipped midnight becomes the
/// first instant that exists on that date.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // смещение, действовавшее до перехода
            let before = tz.offset_from_utc_datetime(&(naive - Duration::days(1)));
            let utc = naive - Duration::seconds(i64::from(before.fix().local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    localize(tz, date.and_time(NaiveTime::MIN))
}

pub fn end_of_day(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let last_instant = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    localize(tz, date.and_time(last_instant))
}

/// Epoch milliseconds (UTC) to the display timezone
pub fn from_epoch_millis(millis: i64, tz: Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Europe::Istanbul;

    #[test]
    fn test_day_bounds_in_istanbul() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let start = start_of_day(date, Istanbul);
        let end = end_of_day(date, Istanbul);

        // Istanbul is UTC+3 all year
        assert_eq!(start.timestamp(), 1741554000);
        assert_eq!(end.hour(), 23);
        assert_eq!(end.nanosecond(), 999_999_000);
        assert_eq!(end.timestamp_millis() - start.timestamp_millis(), 86_399_999);
    }

    #[test]
    fn test_from_epoch_millis_converts_timezone() {
        let dt = from_epoch_millis(1741554000000, Istanbul).unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_skipped_local_time_moves_forward() {
        // 2025-03-30 02:30 does not exist in Berlin, clocks jump 02:00 -> 03:00
        let naive = NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let dt = localize(chrono_tz::Europe::Berlin, naive);
        assert_eq!(dt.date_naive(), naive.date());
        assert_eq!((dt.hour(), dt.minute()), (3, 30));
    }

    #[test]
    fn test_start_of_day_when_midnight_is_skipped() {
        // Santiago switched to DST at 2022-09-11 00:00, the day starts at 01:00
        let date = NaiveDate::from_ymd_opt(2022, 9, 11).unwrap();
        let start = start_of_day(date, chrono_tz::America::Santiago);

        assert_eq!(start.date_naive(), date);
        assert_eq!(start.hour(), 1);
        assert_eq!(start.naive_utc(), date.and_hms_opt(4, 0, 0).unwrap());
    }
}
