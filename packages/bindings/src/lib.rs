use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::Value;

use mortgage_calc_core::calculators::{affordability, purchase, refinance, rent_vs_buy};
use mortgage_calc_core::{amortization, CalculatorKind, ValidationErrors, ValidationOutcome};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse(input_json: &str) -> NapiResult<Value> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn outcome_json<T: serde::Serialize>(result: Result<T, ValidationErrors>) -> NapiResult<String> {
    serde_json::to_string(&ValidationOutcome::from(result)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_affordability(input_json: String) -> NapiResult<String> {
    let output = affordability::run_affordability(&parse(&input_json)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_purchase(input_json: String) -> NapiResult<String> {
    let output = purchase::run_purchase(&parse(&input_json)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_refinance(input_json: String) -> NapiResult<String> {
    let output = refinance::run_refinance(&parse(&input_json)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_rent_vs_buy(input_json: String) -> NapiResult<String> {
    let output = rent_vs_buy::run_rent_vs_buy(&parse(&input_json)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Dispatch by calculator name (`affordability`, `purchase`, `refinance`, `rent-vs-buy`).
#[napi]
pub fn calculate(kind: String, input_json: String) -> NapiResult<String> {
    let kind: CalculatorKind = kind.parse().map_err(to_napi_error)?;
    let output = mortgage_calc_core::run(kind, &parse(&input_json)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation (form feedback, never throws on bad fields)
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_affordability_inputs(input_json: String) -> NapiResult<String> {
    outcome_json(affordability::validate_affordability_inputs(&parse(&input_json)?))
}

#[napi]
pub fn validate_purchase_inputs(input_json: String) -> NapiResult<String> {
    outcome_json(purchase::validate_purchase_inputs(&parse(&input_json)?))
}

#[napi]
pub fn validate_refinance_inputs(input_json: String) -> NapiResult<String> {
    outcome_json(refinance::validate_refinance_inputs(&parse(&input_json)?))
}

#[napi]
pub fn validate_rent_vs_buy_inputs(input_json: String) -> NapiResult<String> {
    outcome_json(rent_vs_buy::validate_rent_vs_buy_inputs(&parse(&input_json)?))
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let output = amortization::run_schedule(&parse(&input_json)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
