use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_sim_core::amortization::emi::{compute_emi_with, monthly_rate};
use loan_sim_core::amortization::scenarios::{self, ScenarioComparisonInput};
use loan_sim_core::amortization::simulation::{self, SimulationInput};
use loan_sim_core::amortization::{
    generate_schedule_with, LoanTerms, PrepaymentEvent, RateChangeEvent,
};
use loan_sim_core::RoundingConfig;

use crate::input;

/// Arguments for EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (e.g. 10.5)
    #[arg(long)]
    pub rate: Decimal,

    /// Tenure in months
    #[arg(long)]
    pub tenure: u32,

    /// Decimal places the EMI is rounded to
    #[arg(long, default_value_t = 0)]
    pub decimal_places: u32,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rounding = RoundingConfig {
        emi_decimal_places: args.decimal_places,
    };
    let emi = compute_emi_with(args.principal, args.rate, args.tenure, &rounding)?;

    // Totals come from the schedule so the final-month true-up is counted.
    let terms = LoanTerms {
        principal: args.principal,
        annual_interest_rate: args.rate,
        tenure_months: args.tenure,
        start_date: chrono::Local::now().date_naive(),
        baseline_emi: Some(emi),
    };
    let schedule = generate_schedule_with(&terms, &[], &[], &rounding)?;

    Ok(json!({
        "emi": emi,
        "monthly_rate": monthly_rate(args.rate),
        "total_payable": schedule.total_paid()?,
        "total_interest": schedule.total_interest(),
    }))
}

/// Loan terms and events, from a file, stdin, or flags
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<u32>,

    /// First instalment date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Agreed EMI, if it differs from the computed one
    #[arg(long)]
    pub emi: Option<Decimal>,

    /// Prepayments as AMOUNT@DATE, comma-separated (e.g. "100000@2024-06-01")
    #[arg(long, value_delimiter = ',')]
    pub prepayment: Vec<String>,

    /// Rate changes as RATE@DATE, comma-separated (e.g. "8.5@2025-01-01")
    #[arg(long, value_delimiter = ',')]
    pub rate_change: Vec<String>,

    /// Decimal places the EMI is rounded to
    #[arg(long, default_value_t = 0)]
    pub decimal_places: u32,
}

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input = simulation_input(args.loan)?;
    let result = simulation::build_schedule(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for baseline-versus-events simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input = simulation_input(args.loan)?;
    let result = simulation::simulate(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for multi-scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: ScenarioComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for scenario comparison".into());
    };
    let result = scenarios::compare_scenarios(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

fn simulation_input(args: LoanArgs) -> Result<SimulationInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(data);
    }

    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let tenure = args
        .tenure
        .ok_or("--tenure is required (or provide --input)")?;
    let start_date = args
        .start_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let prepayments = args
        .prepayment
        .iter()
        .map(|s| parse_dated(s).map(|(amount, date)| PrepaymentEvent::one_time(amount, date)))
        .collect::<Result<Vec<_>, _>>()?;
    let rate_changes = args
        .rate_change
        .iter()
        .map(|s| parse_dated(s).map(|(rate, date)| RateChangeEvent::new(rate, date)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SimulationInput {
        loan: LoanTerms {
            principal,
            annual_interest_rate: rate,
            tenure_months: tenure,
            start_date,
            baseline_emi: args.emi,
        },
        prepayments,
        rate_changes,
        rounding: RoundingConfig {
            emi_decimal_places: args.decimal_places,
        },
    })
}

/// Parse "VALUE@YYYY-MM-DD".
fn parse_dated(s: &str) -> Result<(Decimal, NaiveDate), String> {
    let (value, date) = s
        .split_once('@')
        .ok_or_else(|| format!("Expected VALUE@YYYY-MM-DD, got '{s}'"))?;
    let value: Decimal = value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid amount in '{s}': {e}"))?;
    let date: NaiveDate = date
        .trim()
        .parse()
        .map_err(|e| format!("Invalid date in '{s}': {e}"))?;
    Ok((value, date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_dated() {
        let (amount, date) = parse_dated("100000@2024-06-01").unwrap();
        assert_eq!(amount, dec!(100000));
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        assert!(parse_dated("100000").is_err());
        assert!(parse_dated("abc@2024-06-01").is_err());
        assert!(parse_dated("100@2024-13-01").is_err());
    }

    #[test]
    fn test_run_emi() {
        let value = run_emi(EmiArgs {
            principal: dec!(100000),
            rate: dec!(12),
            tenure: 12,
            decimal_places: 0,
        })
        .unwrap();
        assert_eq!(value["emi"], "8885");

        // The last instalment is trimmed to the closing balance, so the loan
        // costs slightly less than twelve full EMIs.
        let total_interest: Decimal = value["total_interest"].as_str().unwrap().parse().unwrap();
        let total_payable: Decimal = value["total_payable"].as_str().unwrap().parse().unwrap();
        assert!((total_interest - dec!(6618.46)).abs() < dec!(0.01));
        assert!(total_interest < dec!(6620));
        assert!((total_payable - total_interest - dec!(100000)).abs() < dec!(0.000001));
    }
}
