use napi::Result as NapiResult;
use napi_derive::napi;

use bankability_core::stress_testing::{
    self, PartialBuyerData, ScenarioType, StressTestBaseline, StressTestParameters,
};
use bankability_core::templates;
use bankability_core::StressConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Stress testing
// ---------------------------------------------------------------------------

/// Unrecognised scenario tags run the composite scenario.
#[napi]
pub fn run_stress_test(
    scenario_type: String,
    baseline_json: String,
    parameters_json: String,
) -> NapiResult<String> {
    let baseline: StressTestBaseline =
        serde_json::from_str(&baseline_json).map_err(to_napi_error)?;
    let parameters: StressTestParameters =
        serde_json::from_str(&parameters_json).map_err(to_napi_error)?;
    let output = stress_testing::run_stress_test(
        ScenarioType::from(scenario_type.as_str()),
        &baseline,
        &parameters,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct StressBindingInput {
    scenario_type: Option<ScenarioType>,
    baseline: StressTestBaseline,
    #[serde(default)]
    parameters: StressTestParameters,
    config: Option<StressConfig>,
}

/// One-document form of `run_stress_test`: scenario, baseline, parameters
/// and an optional engine config. A missing scenario runs the composite.
#[napi]
pub fn run_stress_request(input_json: String) -> NapiResult<String> {
    let input: StressBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = stress_testing::run_stress_test_with_config(
        input.scenario_type.unwrap_or(ScenarioType::Custom),
        &input.baseline,
        &input.parameters,
        &input.config.unwrap_or_default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_default_baseline(buyer_json: String) -> NapiResult<String> {
    let partial: PartialBuyerData = serde_json::from_str(&buyer_json).map_err(to_napi_error)?;
    let baseline = stress_testing::generate_default_baseline(&partial);
    serde_json::to_string(&baseline).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[napi]
pub fn get_scenario_templates() -> NapiResult<String> {
    serde_json::to_string(&templates::get_scenario_templates()).map_err(to_napi_error)
}

#[napi]
pub fn run_template_suite(baseline_json: String) -> NapiResult<String> {
    let baseline: StressTestBaseline =
        serde_json::from_str(&baseline_json).map_err(to_napi_error)?;
    let output = templates::run_template_suite(&baseline).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
