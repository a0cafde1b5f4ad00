use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

use crate::shared::time::{end_of_day, start_of_day};

/// Inclusive time window of one API query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl DateRange {
    /// `None` when `start > end`
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Whole local days `[start_of_day(from), end_of_day(to)]`
    pub fn for_days(from: NaiveDate, to: NaiveDate, tz: Tz) -> Option<Self> {
        Self::new(start_of_day(from, tz), end_of_day(to, tz))
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.end.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Разбивает период пользователя на окна для запросов к API.
///
/// The trailing window `[now - trailing_window, now]` is always the first
/// range. The part of the user period that lies before the trailing window is
/// cut into consecutive chunks of at most `chunk` length, each starting one
/// second after the previous one ends.
#[derive(Debug, Clone, Copy)]
pub struct RangeSplitter {
    tz: Tz,
    trailing_window: Duration,
    chunk: Duration,
}

impl RangeSplitter {
    pub fn new(tz: Tz, trailing_window_days: i64, chunk_days: i64) -> Self {
        Self {
            tz,
            trailing_window: Duration::days(trailing_window_days.max(1)),
            chunk: Duration::days(chunk_days.max(1)),
        }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn split_at(
        &self,
        now: DateTime<Tz>,
        user_start: NaiveDate,
        user_end: NaiveDate,
    ) -> Vec<DateRange> {
        let trailing_start = now - self.trailing_window;
        let mut ranges = vec![DateRange {
            start: trailing_start,
            end: now,
        }];

        let start = start_of_day(user_start, self.tz);
        let end = end_of_day(user_end, self.tz);

        // Historical part never reaches into the trailing window
        let historical_end = end.min(trailing_start - Duration::seconds(1));
        if start <= historical_end {
            ranges.extend(chunk_range(start, historical_end, self.chunk));
        }

        ranges
    }
}

fn chunk_range(start: DateTime<Tz>, end: DateTime<Tz>, chunk: Duration) -> Vec<DateRange> {
    let mut ranges = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let chunk_end = (cursor + chunk).min(end);
        ranges.push(DateRange {
            start: cursor,
            end: chunk_end,
        });
        cursor = chunk_end + Duration::seconds(1);
    }

    ranges
}
