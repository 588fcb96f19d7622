use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use loan_sim_core::amortization::schedule::ScheduleTotals;
use loan_sim_core::amortization::{self, Schedule};
use loan_sim_core::RoundingConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct EmiRequest {
    principal: Decimal,
    annual_interest_rate: Decimal,
    tenure_months: u32,
    #[serde(default)]
    rounding: RoundingConfig,
}

#[napi]
pub fn compute_emi(input_json: String) -> NapiResult<String> {
    let req: EmiRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let emi = amortization::compute_emi_with(
        req.principal,
        req.annual_interest_rate,
        req.tenure_months,
        &req.rounding,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&emi).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

/// Bare schedule, without the result envelope.
#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let input: amortization::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = amortization::generate_schedule_with(
        &input.loan,
        &input.prepayments,
        &input.rate_changes,
        &input.rounding,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: amortization::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Savings
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate(input_json: String) -> NapiResult<String> {
    let input: amortization::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::simulate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CompareRequest {
    baseline: Schedule,
    modified: Schedule,
}

#[napi]
pub fn compare_schedules(input_json: String) -> NapiResult<String> {
    let req: CompareRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    // Caller-built schedules: reject sums outside the decimal range up front.
    ScheduleTotals::try_from(&req.baseline).map_err(to_napi_error)?;
    ScheduleTotals::try_from(&req.modified).map_err(to_napi_error)?;
    let summary = amortization::compare_schedules(&req.baseline, &req.modified);
    serde_json::to_string(&summary).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: amortization::scenarios::ScenarioComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::scenarios::compare_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
