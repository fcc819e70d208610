use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::StressConfig;
use crate::error::BankabilityError;
use crate::stress_testing::engine;
use crate::stress_testing::model::{
    CovenantStatus, ScenarioType, StressTestBaseline, StressTestResults,
};
use crate::stress_testing::validation::{sanitise_parameters, validate_baseline};
use crate::types::{with_metadata, ComputationOutput};
use crate::BankabilityResult;

use super::catalogue::get_scenario_templates;

/// One template evaluated against the suite baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRun {
    pub name: String,
    pub scenario_type: ScenarioType,
    pub results: StressTestResults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSuiteOutput {
    pub runs: Vec<TemplateRun>,
    /// Template with the most negative financial impact
    pub worst_case: String,
    pub worst_financial_impact: Decimal,
    /// Template with the highest risk score
    pub highest_risk: String,
    pub breach_count: usize,
    pub warning_count: usize,
}

/// Run every catalogue template against `baseline`.
pub fn run_template_suite(
    baseline: &StressTestBaseline,
) -> BankabilityResult<ComputationOutput<TemplateSuiteOutput>> {
    run_template_suite_with_config(baseline, &StressConfig::default())
}

pub fn run_template_suite_with_config(
    baseline: &StressTestBaseline,
    config: &StressConfig,
) -> BankabilityResult<ComputationOutput<TemplateSuiteOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;
    validate_baseline(baseline, config)?;

    let templates = get_scenario_templates();
    let mut runs: Vec<TemplateRun> = Vec::with_capacity(templates.len());

    for template in &templates {
        let mut template_warnings = Vec::new();
        let params =
            sanitise_parameters(baseline, &template.parameters, config, &mut template_warnings)?;
        let results = engine::evaluate(template.scenario_type, baseline, &params, config);
        engine::note_covenant_violations(
            template.scenario_type,
            baseline,
            &params,
            config,
            &mut template_warnings,
        );
        warnings.extend(
            template_warnings
                .into_iter()
                .map(|w| format!("{}: {w}", template.name)),
        );
        runs.push(TemplateRun {
            name: template.name.clone(),
            scenario_type: template.scenario_type,
            results,
        });
    }

    let worst = runs
        .iter()
        .min_by_key(|r| r.results.financial_impact)
        .ok_or_else(|| BankabilityError::invalid("templates", "Template catalogue is empty"))?;
    let highest_risk = runs
        .iter()
        .max_by_key(|r| r.results.risk_score)
        .map(|r| r.name.clone())
        .unwrap_or_default();

    let count_status = |status: CovenantStatus| {
        runs.iter()
            .filter(|r| r.results.covenant_status == status)
            .count()
    };
    let breach_count = count_status(CovenantStatus::Breach);
    let warning_count = count_status(CovenantStatus::Warning);

    tracing::debug!(
        templates = runs.len(),
        worst_case = %worst.name,
        breach_count,
        "template suite evaluated"
    );

    let output = TemplateSuiteOutput {
        worst_case: worst.name.clone(),
        worst_financial_impact: worst.results.financial_impact,
        highest_risk,
        breach_count,
        warning_count,
        runs,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Bankability Stress Template Suite",
        &serde_json::json!({
            "num_templates": templates.len(),
            "baseline": baseline,
        }),
        warnings,
        elapsed,
        output,
    ))
}
