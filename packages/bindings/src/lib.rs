use napi::Result as NapiResult;
use napi_derive::napi;

use bond_amort_core::amortization::{self, BondCalculationInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<BondCalculationInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let rows = amortization::generate_schedule(&input.terms, &input.options)
        .map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

#[napi]
pub fn bond_summary(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let rows = amortization::generate_schedule(&input.terms, &input.options)
        .map_err(to_napi_error)?;
    let periods = amortization::resolve_total_periods(&input.terms, &input.options.limits)
        .map_err(to_napi_error)?;
    let principal = input
        .options
        .invested_amount
        .unwrap_or(input.terms.principal);
    let summary = amortization::summarize(
        &rows,
        principal,
        amortization::duration_years(periods, input.terms.payment_frequency),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&summary).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_bond(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = amortization::calculate_bond(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn upfront_costs(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    input
        .terms
        .fees
        .validate(&input.options.limits)
        .map_err(to_napi_error)?;
    let principal = input
        .options
        .invested_amount
        .unwrap_or(input.terms.principal);
    let costs = amortization::upfront_costs(&input.terms.fees, principal);
    serde_json::to_string(&costs).map_err(to_napi_error)
}
