//! # Period Utilities
//!
//! Pure helpers around the `"YYYY-MM"` period keys used throughout the dues
//! lifecycle, plus the `MMM-YY` month labels of the dues spreadsheet format.

use chrono::{DateTime, Datelike, Utc};
use error::{AppError, Result};
use rust_decimal::Decimal;

/// Fixed monthly dues amount in rupiah.
pub const FIXED_DUES_AMOUNT: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The `"YYYY-MM"` key for the month containing `now`.
pub fn current_period(now: DateTime<Utc>) -> String { format_period(now.year(), now.month()) }

/// Formats a (year, month) pair as a `"YYYY-MM"` period key.
pub fn format_period(year: i32, month: u32) -> String { format!("{:04}-{:02}", year, month) }

/// Parses a `"YYYY-MM"` period key into (year, month).
pub fn parse_period(period: &str) -> Result<(i32, u32)> {
    let (year_part, month_part) = period
        .split_once('-')
        .ok_or_else(|| AppError::validation(format!("Invalid period '{}': expected YYYY-MM", period)))?;

    let year: i32 = year_part
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid period year in '{}'", period)))?;
    let month: u32 = month_part
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid period month in '{}'", period)))?;

    if year_part.len() != 4 || month_part.len() != 2 || !(1..=12).contains(&month) {
        return Err(AppError::validation(format!(
            "Invalid period '{}': expected YYYY-MM",
            period
        )));
    }

    Ok((year, month))
}

/// Ordered period keys from (start_year, start_month) through
/// (end_year, end_month), inclusive of both ends. Empty when the start lies
/// after the end.
pub fn periods_between(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Vec<String> {
    let mut periods = Vec::new();
    let (mut year, mut month) = (start_year, start_month);

    while year < end_year || (year == end_year && month <= end_month) {
        periods.push(format_period(year, month));
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    periods
}

/// The `MMM-YY` spreadsheet column label for a month, e.g. `Jan-25`.
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_LABELS[(month as usize - 1) % 12];
    format!("{}-{:02}", name, year.rem_euclid(100))
}

/// Parses a `MMM-YY` column label back into (year, month).
///
/// Two-digit years map into the 2000s.
pub fn parse_month_label(label: &str) -> Result<(i32, u32)> {
    let (name, year_part) = label
        .trim()
        .split_once('-')
        .ok_or_else(|| AppError::validation(format!("Invalid month label '{}': expected MMM-YY", label)))?;

    let month = MONTH_LABELS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .ok_or_else(|| AppError::validation(format!("Unknown month name in '{}'", label)))?
        as u32
        + 1;

    let year: i32 = year_part
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid year in month label '{}'", label)))?;
    if !(0..100).contains(&year) {
        return Err(AppError::validation(format!(
            "Invalid year in month label '{}'",
            label
        )));
    }

    Ok((2000 + year, month))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_current_period() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 8, 0, 0).unwrap();
        assert_eq!(current_period(now), "2025-03");
    }

    #[test]
    fn test_parse_period_round_trip() {
        assert_eq!(parse_period("2025-01").unwrap(), (2025, 1));
        assert_eq!(parse_period("2025-12").unwrap(), (2025, 12));
        assert_eq!(format_period(2025, 7), "2025-07");
    }

    #[test]
    fn test_parse_period_invalid() {
        assert!(parse_period("2025").is_err());
        assert!(parse_period("2025-13").is_err());
        assert!(parse_period("2025-00").is_err());
        assert!(parse_period("25-01").is_err());
        assert!(parse_period("2025-1").is_err());
        assert!(parse_period("garbage").is_err());
    }

    #[test]
    fn test_periods_between_same_year() {
        assert_eq!(
            periods_between(2025, 10, 2025, 12),
            vec!["2025-10", "2025-11", "2025-12"]
        );
    }

    #[test]
    fn test_periods_between_year_carry() {
        assert_eq!(
            periods_between(2024, 11, 2025, 2),
            vec!["2024-11", "2024-12", "2025-01", "2025-02"]
        );
    }

    #[test]
    fn test_periods_between_single_month() {
        assert_eq!(periods_between(2025, 6, 2025, 6), vec!["2025-06"]);
    }

    #[test]
    fn test_periods_between_inverted_range_is_empty() {
        assert!(periods_between(2025, 6, 2025, 5).is_empty());
        assert!(periods_between(2026, 1, 2025, 12).is_empty());
    }

    #[test]
    fn test_full_year_has_twelve_periods() {
        let periods = periods_between(2025, 1, 2025, 12);
        assert_eq!(periods.len(), 12);
        assert_eq!(periods.first().map(String::as_str), Some("2025-01"));
        assert_eq!(periods.last().map(String::as_str), Some("2025-12"));
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2025, 1), "Jan-25");
        assert_eq!(month_label(2025, 12), "Dec-25");
        assert_eq!(month_label(2030, 8), "Aug-30");
    }

    #[test]
    fn test_parse_month_label() {
        assert_eq!(parse_month_label("Jan-25").unwrap(), (2025, 1));
        assert_eq!(parse_month_label("dec-25").unwrap(), (2025, 12));
        assert_eq!(parse_month_label(" Mar-26 ").unwrap(), (2026, 3));
    }

    #[test]
    fn test_parse_month_label_invalid() {
        assert!(parse_month_label("Januari-25").is_err());
        assert!(parse_month_label("Jan25").is_err());
        assert!(parse_month_label("Jan-xx").is_err());
        assert!(parse_month_label("Jan-2025").is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for month in 1..=12 {
            let label = month_label(2025, month);
            assert_eq!(parse_month_label(&label).unwrap(), (2025, month));
        }
    }

    #[test]
    fn test_fixed_dues_amount() {
        assert_eq!(FIXED_DUES_AMOUNT, Decimal::new(50_000, 0));
    }
}
