use chrono::{Datelike, Duration, NaiveDate};

use super::clock::{today, Clock};

/// Number of days shown in the calendar and counted by weekly analytics.
pub const DAYS_IN_WEEK: usize = 7;

/// This is the standard way of converting a date to a string in habitrack. The result is used as
/// a completion key inside stored habits.
pub fn completion_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reverse of [completion_key]. Only the canonical `YYYY-MM-DD` layout is accepted.
pub fn parse_completion_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// First day of the week containing `date`. Weeks start on Sunday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Sunday through Saturday of the week containing `date`.
pub fn week_dates(date: NaiveDate) -> [NaiveDate; DAYS_IN_WEEK] {
    let start = week_start(date);
    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}

/// Dates of the current week. The clock is read exactly once.
pub fn current_week_dates(clock: &dyn Clock) -> [NaiveDate; DAYS_IN_WEEK] {
    week_dates(today(clock))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{NaiveDate, Weekday};

    use crate::utils::clock::{FixedClock, MockClock};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn completion_key_is_zero_padded() {
        assert_eq!(completion_key(date(2024, 6, 9)), "2024-06-09");
        assert_eq!(completion_key(date(987, 1, 2)), "0987-01-02");
    }

    #[test]
    fn completion_key_parsing() {
        assert_eq!(parse_completion_key("2024-06-10"), Some(date(2024, 6, 10)));
        assert_eq!(parse_completion_key("10/06/2024"), None);
        assert_eq!(parse_completion_key("2024-02-30"), None);
        assert_eq!(parse_completion_key(""), None);
    }

    #[test]
    fn week_starts_on_sunday() {
        let week = week_dates(date(2024, 6, 11));
        assert_eq!(week[0], date(2024, 6, 9));
        assert_eq!(week[0].weekday(), Weekday::Sun);
        assert_eq!(week[6], date(2024, 6, 15));
    }

    #[test]
    fn sunday_is_first_day_of_its_own_week() {
        let week = week_dates(date(2024, 6, 9));
        assert_eq!(week[0], date(2024, 6, 9));
    }

    #[test]
    fn week_crosses_month_and_year_boundaries() {
        let week = week_dates(date(2025, 1, 1));
        assert_eq!(week[0], date(2024, 12, 29));
        assert_eq!(week[6], date(2025, 1, 4));
    }

    #[test]
    fn current_week_contains_today_once() {
        let mut start = date(2024, 2, 20);
        for _ in 0..14 {
            let week = current_week_dates(&FixedClock::on(start));
            assert_eq!(week.len(), 7);
            assert_eq!(week.iter().collect::<HashSet<_>>().len(), 7);
            assert_eq!(week.iter().filter(|d| **d == start).count(), 1);
            start = start.succ_opt().unwrap();
        }
    }

    #[test]
    fn current_week_reads_clock_once() {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .times(1)
            .returning(|| date(2024, 6, 11).and_hms_opt(23, 59, 59).unwrap());

        let week = current_week_dates(&clock);
        assert_eq!(week[0], date(2024, 6, 9));
    }
}
