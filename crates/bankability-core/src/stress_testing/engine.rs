use std::time::Instant;

use crate::config::StressConfig;
use crate::types::{with_metadata, ComputationOutput};
use crate::BankabilityResult;

use super::custom;
use super::model::{ScenarioType, StressTestBaseline, StressTestParameters, StressTestResults};
use super::validation::{sanitise_parameters, validate_baseline};
use super::{covenant_breach, price_shock, regulatory, supply_disruption};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run a stress test of the given type with the standard configuration.
pub fn run_stress_test(
    scenario_type: ScenarioType,
    baseline: &StressTestBaseline,
    parameters: &StressTestParameters,
) -> BankabilityResult<ComputationOutput<StressTestResults>> {
    run_stress_test_with_config(scenario_type, baseline, parameters, &StressConfig::default())
}

/// Run a stress test of the given type against an explicit configuration.
///
/// Inputs are validated before any evaluator runs. Invalid baselines,
/// negative durations and values beyond `config.limits` are rejected;
/// out-of-domain percentages are clamped and reported in `warnings`.
pub fn run_stress_test_with_config(
    scenario_type: ScenarioType,
    baseline: &StressTestBaseline,
    parameters: &StressTestParameters,
    config: &StressConfig,
) -> BankabilityResult<ComputationOutput<StressTestResults>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation --
    config.validate()?;
    validate_baseline(baseline, config)?;
    let params = sanitise_parameters(baseline, parameters, config, &mut warnings)?;
    note_unused_inputs(scenario_type, &params, &mut warnings);

    // -- Evaluate --
    let result = evaluate(scenario_type, baseline, &params, config);
    note_covenant_violations(scenario_type, baseline, &params, config, &mut warnings);

    tracing::debug!(
        scenario = %scenario_type,
        financial_impact = %result.financial_impact,
        risk_score = %result.risk_score,
        covenant_status = %result.covenant_status,
        "stress test evaluated"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        scenario_type.methodology(),
        &serde_json::json!({
            "scenario_type": scenario_type,
            "baseline": baseline,
            "parameters": params,
        }),
        warnings,
        elapsed,
        result,
    ))
}

pub fn run_price_shock_scenario(
    baseline: &StressTestBaseline,
    parameters: &StressTestParameters,
) -> BankabilityResult<ComputationOutput<StressTestResults>> {
    run_stress_test(ScenarioType::PriceShock, baseline, parameters)
}

pub fn run_supply_disruption_scenario(
    baseline: &StressTestBaseline,
    parameters: &StressTestParameters,
) -> BankabilityResult<ComputationOutput<StressTestResults>> {
    run_stress_test(ScenarioType::SupplyDisruption, baseline, parameters)
}

pub fn run_covenant_breach_scenario(
    baseline: &StressTestBaseline,
    parameters: &StressTestParameters,
) -> BankabilityResult<ComputationOutput<StressTestResults>> {
    run_stress_test(ScenarioType::CovenantBreach, baseline, parameters)
}

pub fn run_regulatory_scenario(
    baseline: &StressTestBaseline,
    parameters: &StressTestParameters,
) -> BankabilityResult<ComputationOutput<StressTestResults>> {
    run_stress_test(ScenarioType::Regulatory, baseline, parameters)
}

pub fn run_custom_scenario(
    baseline: &StressTestBaseline,
    parameters: &StressTestParameters,
) -> BankabilityResult<ComputationOutput<StressTestResults>> {
    run_stress_test(ScenarioType::Custom, baseline, parameters)
}

/// Dispatch to the evaluator for `scenario_type`. Assumes validated input.
pub fn evaluate(
    scenario_type: ScenarioType,
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
) -> StressTestResults {
    match scenario_type {
        ScenarioType::PriceShock => price_shock::evaluate(baseline, params, config),
        ScenarioType::SupplyDisruption => supply_disruption::evaluate(baseline, params, config),
        ScenarioType::CovenantBreach => covenant_breach::evaluate(baseline, params, config),
        ScenarioType::Regulatory => regulatory::evaluate(baseline, params, config),
        ScenarioType::Custom => custom::evaluate(baseline, params, config),
    }
}

// ---------------------------------------------------------------------------
// Internal logic
// ---------------------------------------------------------------------------

/// Report each failed lender test with its actual value and limit.
pub(crate) fn note_covenant_violations(
    scenario_type: ScenarioType,
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
    warnings: &mut Vec<String>,
) {
    if scenario_type != ScenarioType::CovenantBreach {
        return;
    }
    for check in covenant_breach::violated_covenants(baseline, params, config) {
        warnings.push(format!(
            "Covenant '{}' violated: {} exceeds limit {}",
            check.covenant, check.actual, check.limit
        ));
    }
}

/// Flag parameters the chosen evaluator will not read.
fn note_unused_inputs(
    scenario_type: ScenarioType,
    params: &StressTestParameters,
    warnings: &mut Vec<String>,
) {
    let consumed = scenario_type.parameter_keys();
    for key in params.present_keys() {
        if !consumed.contains(&key) {
            warnings.push(format!(
                "Parameter '{key}' is not used by the {scenario_type} scenario"
            ));
        }
    }

    let components = match scenario_type {
        ScenarioType::Custom => custom::active_components(params),
        _ => Vec::new(),
    };

    let filters_categories = scenario_type == ScenarioType::SupplyDisruption
        || components.contains(&ScenarioType::SupplyDisruption);
    if filters_categories && params.affected_categories.is_some() {
        warnings.push(
            "affected_categories is recorded but does not filter the disrupted volume".into(),
        );
    }

    if scenario_type == ScenarioType::Custom {
        match components.len() {
            0 => warnings.push(
                "No scenario drivers set; the composite result is empty".into(),
            ),
            n if n < 3 => warnings.push(format!(
                "Only {n} of 3 composite components ran; risk score weights are not renormalised"
            )),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
