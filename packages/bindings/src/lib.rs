use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use sip_planner_core::{goals, lump_sum, portfolio, risk_profile, scenarios, sip, PlannerResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Deserialize the JSON input, run the calculation, serialize the output.
fn call<I, O>(input_json: &str, f: impl FnOnce(&I) -> PlannerResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = f(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// SIP
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_sip(input_json: String) -> NapiResult<String> {
    call(&input_json, sip::annuity::calculate_sip)
}

#[napi]
pub fn calculate_step_up_sip(input_json: String) -> NapiResult<String> {
    call(&input_json, sip::annuity::calculate_step_up_sip)
}

#[napi]
pub fn required_sip(input_json: String) -> NapiResult<String> {
    call(&input_json, sip::inverse::calculate_required_sip)
}

#[napi]
pub fn sip_duration(input_json: String) -> NapiResult<String> {
    call(&input_json, sip::inverse::calculate_sip_duration)
}

#[napi]
pub fn sip_projection(input_json: String) -> NapiResult<String> {
    call(&input_json, sip::projection::build_projection)
}

// ---------------------------------------------------------------------------
// Lump sum
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_lump_sum(input_json: String) -> NapiResult<String> {
    call(&input_json, lump_sum::calculate_lump_sum)
}

#[napi]
pub fn compare_sip_lump_sum(input_json: String) -> NapiResult<String> {
    call(&input_json, lump_sum::compare_sip_lump_sum)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn run_scenarios(input_json: String) -> NapiResult<String> {
    call(&input_json, scenarios::run_scenarios)
}

#[napi]
pub fn assess_risk_profile(input_json: String) -> NapiResult<String> {
    call(&input_json, risk_profile::questionnaire::assess_risk_profile)
}

#[napi]
pub fn recommend_allocation(input_json: String) -> NapiResult<String> {
    call(&input_json, risk_profile::allocation::recommend_allocation)
}

#[napi]
pub fn plan_goal(input_json: String) -> NapiResult<String> {
    call(&input_json, goals::plan_goal)
}

#[napi]
pub fn summarise_portfolio(input_json: String) -> NapiResult<String> {
    call(&input_json, portfolio::summarise_portfolio)
}
