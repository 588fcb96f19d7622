use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schedule::Schedule;
use crate::types::Money;

/// What a set of events changes relative to the baseline schedule.
///
/// Both figures are signed: a modified schedule that costs more interest or
/// runs longer yields negative values, reported as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub interest_saved: Money,
    pub months_saved: i64,
    /// Last date of the modified schedule; `None` when it has no entries.
    pub new_debt_free_date: Option<NaiveDate>,
}

/// Total interest paid over a schedule.
pub fn total_interest(schedule: &Schedule) -> Money {
    schedule.total_interest()
}

/// Diff a baseline schedule against a modified one.
pub fn compare_schedules(baseline: &Schedule, modified: &Schedule) -> SavingsSummary {
    SavingsSummary {
        interest_saved: total_interest(baseline) - total_interest(modified),
        months_saved: baseline.len() as i64 - modified.len() as i64,
        new_debt_free_date: modified.debt_free_date(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::events::{PrepaymentEvent, RateChangeEvent};
    use crate::amortization::loan::LoanTerms;
    use crate::amortization::schedule::generate_schedule;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn loan() -> LoanTerms {
        LoanTerms::new(dec!(500000), dec!(10), 24, d(2024, 1, 1)).unwrap()
    }

    #[test]
    fn test_self_comparison_is_neutral() {
        let baseline = generate_schedule(&loan(), &[], &[]).unwrap();
        let summary = compare_schedules(&baseline, &baseline);
        assert_eq!(summary.interest_saved, Decimal::ZERO);
        assert_eq!(summary.months_saved, 0);
        assert_eq!(summary.new_debt_free_date, Some(d(2025, 12, 1)));
    }

    #[test]
    fn test_prepayment_saves_interest_and_months() {
        let baseline = generate_schedule(&loan(), &[], &[]).unwrap();
        let prepay = vec![PrepaymentEvent::one_time(dec!(100000), d(2024, 6, 1))];
        let modified = generate_schedule(&loan(), &prepay, &[]).unwrap();

        let summary = compare_schedules(&baseline, &modified);
        assert!(summary.interest_saved > Decimal::ZERO);
        assert!(summary.months_saved > 0);
        assert!(summary.new_debt_free_date.unwrap() < d(2025, 12, 1));
    }

    #[test]
    fn test_rate_increase_reports_negative_savings() {
        let baseline = generate_schedule(&loan(), &[], &[]).unwrap();
        let hike = vec![RateChangeEvent::new(dec!(14), d(2024, 4, 1))];
        let modified = generate_schedule(&loan(), &[], &hike).unwrap();

        let summary = compare_schedules(&baseline, &modified);
        assert!(summary.interest_saved < Decimal::ZERO);
        assert_eq!(summary.months_saved, 0);
    }

    #[test]
    fn test_empty_modified_schedule_has_no_date() {
        let baseline = generate_schedule(&loan(), &[], &[]).unwrap();
        let summary = compare_schedules(&baseline, &Schedule::default());
        assert_eq!(summary.new_debt_free_date, None);
        assert_eq!(summary.months_saved, 24);
        assert_eq!(summary.interest_saved, baseline.total_interest());
    }
}
