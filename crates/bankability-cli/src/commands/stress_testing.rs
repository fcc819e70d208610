use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use bankability_core::stress_testing::{
    self, PartialBuyerData, ScenarioType, StressTestBaseline, StressTestParameters,
};
use bankability_core::templates;
use bankability_core::StressConfig;

use crate::input;

/// Arguments for a single stress scenario
#[derive(Args)]
pub struct RunArgs {
    /// Scenario type: price_shock, supply_disruption, covenant_breach,
    /// regulatory or custom (unrecognised values run custom)
    #[arg(long, default_value = "custom")]
    pub scenario: String,

    /// Path to JSON request file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the template suite
#[derive(Args)]
pub struct SuiteArgs {
    /// Path to JSON request file; the default baseline is used when omitted
    #[arg(long)]
    pub input: Option<String>,
}

/// Request body: a full baseline, or partial buyer data to build one from.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StressRequest {
    baseline: Option<StressTestBaseline>,
    buyer: Option<PartialBuyerData>,
    parameters: StressTestParameters,
}

impl StressRequest {
    fn resolve_baseline(&self, config: &StressConfig) -> StressTestBaseline {
        match (&self.baseline, &self.buyer) {
            (Some(b), _) => b.clone(),
            (None, Some(buyer)) => {
                stress_testing::generate_default_baseline_with(buyer, &config.baseline_defaults)
            }
            (None, None) => stress_testing::generate_default_baseline_with(
                &PartialBuyerData::default(),
                &config.baseline_defaults,
            ),
        }
    }
}

fn read_request(path: Option<&str>) -> Result<Option<StressRequest>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        Ok(Some(input::file::read_json(path)?))
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(Some(serde_json::from_value(data)?))
    } else {
        Ok(None)
    }
}

pub fn run_scenario(
    args: RunArgs,
    config: &StressConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for a stress scenario")?;
    let scenario = ScenarioType::from(args.scenario.as_str());
    let baseline = request.resolve_baseline(config);
    let result = stress_testing::run_stress_test_with_config(
        scenario,
        &baseline,
        &request.parameters,
        config,
    )?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_suite(
    args: SuiteArgs,
    config: &StressConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(args.input.as_deref())?.unwrap_or_default();
    let baseline = request.resolve_baseline(config);
    let result = templates::run_template_suite_with_config(&baseline, config)?;
    Ok(serde_json::to_value(result)?)
}
