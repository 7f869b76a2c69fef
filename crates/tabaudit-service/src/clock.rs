//! Local-day boundaries for daily limits and statistics.

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, TimeZone, Utc};

use tabaudit_core::error::AppError;
use tabaudit_core::result::AppResult;

/// Computes the start of the local day and month at a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct DayWindow {
    offset: FixedOffset,
}

impl DayWindow {
    /// Create a window for an offset from UTC given in minutes.
    pub fn new(offset_minutes: i32) -> AppResult<Self> {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Invalid day start offset: {offset_minutes} minutes"
                ))
            })?;
        Ok(Self { offset })
    }

    /// Instant at which the local day containing `now` began.
    pub fn day_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset);
        self.midnight(local.date_naive())
    }

    /// Instant at which the local month containing `now` began.
    pub fn month_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset);
        let first = local.date_naive().with_day(1).unwrap_or(local.date_naive());
        self.midnight(first)
    }

    fn midnight(&self, date: chrono::NaiveDate) -> DateTime<Utc> {
        // A fixed offset has exactly one midnight per date.
        let naive = date.and_time(NaiveTime::MIN);
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_utc_day_start() {
        let window = DayWindow::new(0).unwrap();
        assert_eq!(
            window.day_start(at("2024-05-10T17:45:00Z")),
            at("2024-05-10T00:00:00Z")
        );
    }

    #[test]
    fn test_positive_offset_shifts_boundary() {
        // UTC+05:30: local midnight is 18:30 UTC the previous day.
        let window = DayWindow::new(330).unwrap();
        assert_eq!(
            window.day_start(at("2024-05-10T17:45:00Z")),
            at("2024-05-09T18:30:00Z")
        );
        assert_eq!(
            window.day_start(at("2024-05-10T19:00:00Z")),
            at("2024-05-10T18:30:00Z")
        );
    }

    #[test]
    fn test_month_start() {
        let window = DayWindow::new(-300).unwrap();
        assert_eq!(
            window.month_start(at("2024-03-01T02:00:00Z")),
            at("2024-02-01T05:00:00Z")
        );
    }

    #[test]
    fn test_rejects_out_of_range_offset() {
        assert!(DayWindow::new(24 * 60).is_err());
    }
}
