//! Side-by-side comparison of several what-if event sets on one loan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::events::{PrepaymentEvent, RateChangeEvent};
use super::loan::LoanTerms;
use super::savings::{compare_schedules, SavingsSummary};
use super::schedule::{run_schedule, ScheduleTotals};
use crate::error::LoanSimError;
use crate::types::*;
use crate::LoanSimResult;

/// A named set of events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub prepayments: Vec<PrepaymentEvent>,
    #[serde(default)]
    pub rate_changes: Vec<RateChangeEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonInput {
    pub loan: LoanTerms,
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub rounding: RoundingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub savings: SavingsSummary,
    pub totals: ScheduleTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonOutput {
    pub baseline_totals: ScheduleTotals,
    pub scenarios: Vec<ScenarioResult>,
    /// Scenario with the largest interest saving; earliest wins a tie
    pub best_scenario: String,
    pub best_interest_saved: Money,
}

/// Simulate every scenario against the shared no-event baseline.
pub fn compare_scenarios(
    input: &ScenarioComparisonInput,
) -> LoanSimResult<ComputationOutput<ScenarioComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.scenarios.is_empty() {
        return Err(LoanSimError::invalid(
            "scenarios",
            "At least one scenario is required",
        ));
    }

    let (baseline, _) = run_schedule(&input.loan, &[], &[], &input.rounding)?;

    let mut results = Vec::with_capacity(input.scenarios.len());
    for scenario in &input.scenarios {
        let (schedule, notes) = run_schedule(
            &input.loan,
            &scenario.prepayments,
            &scenario.rate_changes,
            &input.rounding,
        )?;
        warnings.extend(notes.into_iter().map(|n| format!("{}: {n}", scenario.name)));
        results.push(ScenarioResult {
            name: scenario.name.clone(),
            savings: compare_schedules(&baseline, &schedule),
            totals: ScheduleTotals::try_from(&schedule)?,
        });
    }

    let mut best = &results[0];
    for r in &results[1..] {
        if r.savings.interest_saved > best.savings.interest_saved {
            best = r;
        }
    }
    if best.savings.interest_saved <= Decimal::ZERO {
        warnings.push("No scenario reduces total interest versus the baseline".into());
    }

    let output = ScenarioComparisonOutput {
        baseline_totals: ScheduleTotals::try_from(&baseline)?,
        best_scenario: best.name.clone(),
        best_interest_saved: best.savings.interest_saved,
        scenarios: results,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-scenario prepayment comparison",
        &serde_json::json!({
            "principal": input.loan.principal.to_string(),
            "annual_interest_rate_pct": input.loan.annual_interest_rate.to_string(),
            "tenure_months": input.loan.tenure_months,
            "scenarios": input.scenarios.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
