use serde_json::Value;

use bankability_core::templates;

pub fn run_templates() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(templates::get_scenario_templates())?)
}
