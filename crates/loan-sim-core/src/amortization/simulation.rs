use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::events::{DatedEvent, PrepaymentEvent, RateChangeEvent};
use super::loan::LoanTerms;
use super::savings::{compare_schedules, SavingsSummary};
use super::schedule::{run_schedule, Schedule, ScheduleTotals};
use crate::dates::same_month;
use crate::types::*;
use crate::LoanSimResult;

/// A loan together with the events to simulate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub loan: LoanTerms,
    #[serde(default)]
    pub prepayments: Vec<PrepaymentEvent>,
    #[serde(default)]
    pub rate_changes: Vec<RateChangeEvent>,
    #[serde(default)]
    pub rounding: RoundingConfig,
}

/// A single schedule with its headline figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub emi: Money,
    pub totals: ScheduleTotals,
    pub schedule: Schedule,
}

/// Baseline versus modified schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub baseline_emi: Money,
    pub savings: SavingsSummary,
    pub baseline_totals: ScheduleTotals,
    pub modified_totals: ScheduleTotals,
    pub baseline_schedule: Schedule,
    pub modified_schedule: Schedule,
}

/// Build the schedule for a loan with its events applied.
pub fn build_schedule(
    input: &SimulationInput,
) -> LoanSimResult<ComputationOutput<ScheduleReport>> {
    let start = Instant::now();

    let emi = input.loan.emi(&input.rounding)?;
    let (schedule, mut warnings) = run_schedule(
        &input.loan,
        &input.prepayments,
        &input.rate_changes,
        &input.rounding,
    )?;
    warnings.extend(event_warnings(input, &schedule));

    let output = ScheduleReport {
        emi,
        totals: ScheduleTotals::try_from(&schedule)?,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance amortisation schedule",
        &assumptions(input, emi),
        warnings,
        elapsed,
        output,
    ))
}

/// Run the baseline (no events) and modified schedules and diff them.
pub fn simulate(input: &SimulationInput) -> LoanSimResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();

    let emi = input.loan.emi(&input.rounding)?;
    let (baseline, baseline_notes) = run_schedule(&input.loan, &[], &[], &input.rounding)?;
    let (modified, modified_notes) = run_schedule(
        &input.loan,
        &input.prepayments,
        &input.rate_changes,
        &input.rounding,
    )?;

    let mut warnings: Vec<String> = baseline_notes
        .into_iter()
        .map(|n| format!("Baseline: {n}"))
        .collect();
    warnings.extend(modified_notes);
    warnings.extend(event_warnings(input, &modified));

    let output = SimulationOutput {
        baseline_emi: emi,
        savings: compare_schedules(&baseline, &modified),
        baseline_totals: ScheduleTotals::try_from(&baseline)?,
        modified_totals: ScheduleTotals::try_from(&modified)?,
        baseline_schedule: baseline,
        modified_schedule: modified,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Prepayment and rate-change simulation against a no-event baseline",
        &assumptions(input, emi),
        warnings,
        elapsed,
        output,
    ))
}

fn assumptions(input: &SimulationInput, emi: Money) -> serde_json::Value {
    serde_json::json!({
        "principal": input.loan.principal.to_string(),
        "annual_interest_rate_pct": input.loan.annual_interest_rate.to_string(),
        "tenure_months": input.loan.tenure_months,
        "start_date": input.loan.start_date.to_string(),
        "baseline_emi": emi.to_string(),
        "emi_rounding": format!(
            "{} dp, half away from zero",
            input.rounding.emi_decimal_places
        ),
        "prepayments": input.prepayments.len(),
        "rate_changes": input.rate_changes.len(),
    })
}

/// Events that had no effect, and recurring prepayments applied only once.
fn event_warnings(input: &SimulationInput, schedule: &Schedule) -> Vec<String> {
    let mut warnings = Vec::new();

    for (i, p) in input.prepayments.iter().enumerate() {
        let date = p.effective_date();
        if !in_schedule(schedule, date) {
            warnings.push(format!(
                "Prepayment {i} dated {date} falls outside the schedule; not applied"
            ));
        } else if let Some(freq) = p.frequency() {
            warnings.push(format!(
                "Prepayment {i} is recurring ({freq:?}); applied once in {}",
                date.format("%Y-%m")
            ));
        }
    }

    for (i, rc) in input.rate_changes.iter().enumerate() {
        let date = rc.effective_date();
        if !in_schedule(schedule, date) {
            warnings.push(format!(
                "Rate change {i} dated {date} falls outside the schedule; not applied"
            ));
        }
    }

    if let Some(last) = schedule.entries.last() {
        if last.closing_balance > Decimal::ZERO {
            warnings.push(format!(
                "Schedule ends with an outstanding balance of {}",
                last.closing_balance
            ));
        }
    }

    warnings
}

fn in_schedule(schedule: &Schedule, date: chrono::NaiveDate) -> bool {
    schedule.entries.iter().any(|e| same_month(e.date, date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::events::RecurrenceFrequency;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input() -> SimulationInput {
        SimulationInput {
            loan: LoanTerms::new(dec!(500000), dec!(10), 24, d(2024, 1, 1)).unwrap(),
            prepayments: vec![PrepaymentEvent::one_time(dec!(100000), d(2024, 6, 10))],
            rate_changes: vec![],
            rounding: RoundingConfig::default(),
        }
    }

    #[test]
    fn test_simulate_envelope() {
        let out = simulate(&input()).unwrap();
        let res = &out.result;
        assert_eq!(res.baseline_emi, dec!(23072));
        assert_eq!(res.baseline_schedule.len(), 24);
        assert!(res.modified_schedule.len() < 24);
        assert_eq!(
            res.savings.months_saved,
            (res.baseline_schedule.len() - res.modified_schedule.len()) as i64
        );
        assert_eq!(res.modified_totals.total_prepaid, dec!(100000));
        // 23,072.46 rounds down, so only the baseline's last month is trued up
        assert_eq!(out.warnings.len(), 1, "{:?}", out.warnings);
        assert!(out.warnings[0].starts_with("Baseline: Month 24"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_build_schedule_report() {
        let out = build_schedule(&input()).unwrap();
        assert_eq!(out.result.emi, dec!(23072));
        assert_eq!(out.result.totals.months, out.result.schedule.len());
        assert_eq!(
            out.result.totals.debt_free_date,
            out.result.schedule.debt_free_date()
        );
    }

    #[test]
    fn test_unmatched_and_recurring_events_warn() {
        let mut inp = input();
        inp.prepayments.push(PrepaymentEvent::one_time(dec!(1000), d(2023, 12, 1)));
        inp.prepayments.push(PrepaymentEvent::recurring(
            dec!(2000),
            d(2024, 3, 1),
            RecurrenceFrequency::Yearly,
        ));
        inp.rate_changes.push(RateChangeEvent::new(dec!(9), d(2030, 1, 1)));

        let out = simulate(&inp).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("Prepayment 1 dated 2023-12-01")));
        assert!(out.warnings.iter().any(|w| w.contains("recurring (Yearly)")));
        assert!(out.warnings.iter().any(|w| w.starts_with("Rate change 0")));
    }

    #[test]
    fn test_input_json_defaults() {
        let json = r#"{
            "loan": {
                "principal": "100000",
                "annual_interest_rate": "12",
                "tenure_months": 12,
                "start_date": "2024-01-01"
            }
        }"#;
        let inp: SimulationInput = serde_json::from_str(json).unwrap();
        assert!(inp.prepayments.is_empty());
        assert_eq!(inp.rounding, RoundingConfig::default());

        let out = simulate(&inp).unwrap();
        assert_eq!(out.result.savings.interest_saved, Decimal::ZERO);
        assert_eq!(out.result.savings.months_saved, 0);
    }

    #[test]
    fn test_invalid_loan_propagates() {
        let mut inp = input();
        inp.loan.tenure_months = 0;
        assert!(simulate(&inp).is_err());
        assert!(build_schedule(&inp).is_err());
    }
}
