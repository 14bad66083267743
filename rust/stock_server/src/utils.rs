// src/utils.rs

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First date after `date` that falls on a weekday.
///
/// Market holidays are not consulted, so a holiday counts as a trading day.
pub fn next_trading_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_friday_rolls_to_monday() {
        assert_eq!(next_trading_day(date(2024, 6, 14)), date(2024, 6, 17));
    }

    #[test]
    fn test_weekend_rolls_to_monday() {
        assert_eq!(next_trading_day(date(2024, 6, 15)), date(2024, 6, 17));
        assert_eq!(next_trading_day(date(2024, 6, 16)), date(2024, 6, 17));
    }

    #[test]
    fn test_midweek_is_next_day() {
        assert_eq!(next_trading_day(date(2024, 6, 10)), date(2024, 6, 11));
        assert_eq!(next_trading_day(date(2024, 6, 13)), date(2024, 6, 14));
    }

    #[test]
    fn test_holidays_are_not_skipped() {
        // July 4th 2024 was a Thursday
        assert_eq!(next_trading_day(date(2024, 7, 3)), date(2024, 7, 4));
    }

    #[test]
    fn test_crosses_year_boundary() {
        // 2021-12-31 was a Friday
        assert_eq!(next_trading_day(date(2021, 12, 31)), date(2022, 1, 3));
    }

    #[test]
    fn test_result_is_minimal_weekday_for_every_start() {
        let start = date(2023, 1, 1);
        for offset in 0..730 {
            let day = start + Duration::days(offset);
            let next = next_trading_day(day);

            assert!(next > day);
            assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));

            let mut between = day + Duration::days(1);
            while between < next {
                assert!(matches!(between.weekday(), Weekday::Sat | Weekday::Sun));
                between += Duration::days(1);
            }

            let gap = (next - day).num_days();
            let expected = match day.weekday() {
                Weekday::Fri => 3,
                Weekday::Sat => 2,
                _ => 1,
            };
            assert_eq!(gap, expected);
        }
    }
}
