use chrono::{Datelike, Months, NaiveDate};

use crate::error::LoanSimError;
use crate::LoanSimResult;

/// Advance a date by whole calendar months.
///
/// Days past the end of the target month clamp to its last day, so
/// 2024-01-31 + 1 month is 2024-02-29.
pub fn add_months(date: NaiveDate, months: u32) -> LoanSimResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LoanSimError::DateError(format!("{date} + {months} months out of range")))
}

/// True when both dates fall in the same calendar month of the same year.
/// Day-of-month is ignored.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_months_basic() {
        assert_eq!(add_months(d(2024, 1, 15), 0).unwrap(), d(2024, 1, 15));
        assert_eq!(add_months(d(2024, 1, 15), 13).unwrap(), d(2025, 2, 15));
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        assert_eq!(add_months(d(2024, 1, 31), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(add_months(d(2023, 1, 31), 1).unwrap(), d(2023, 2, 28));
    }

    #[test]
    fn test_add_months_overflow() {
        assert!(add_months(NaiveDate::MAX, 1).is_err());
    }

    #[test]
    fn test_same_month_ignores_day() {
        assert!(same_month(d(2024, 6, 1), d(2024, 6, 30)));
        assert!(!same_month(d(2024, 6, 1), d(2025, 6, 1)));
        assert!(!same_month(d(2024, 6, 30), d(2024, 7, 1)));
    }
}
