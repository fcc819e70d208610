use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::stress_testing::model::{ScenarioType, StressTestParameters};

/// A named parameter preset for one scenario type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTemplate {
    #[serde(rename = "type")]
    pub scenario_type: ScenarioType,
    pub name: String,
    pub description: String,
    pub parameters: StressTestParameters,
}

impl ScenarioTemplate {
    fn new(
        scenario_type: ScenarioType,
        name: &str,
        description: &str,
        parameters: StressTestParameters,
    ) -> Self {
        Self {
            scenario_type,
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

/// Return the standard preset catalogue, in display order.
pub fn get_scenario_templates() -> Vec<ScenarioTemplate> {
    vec![
        ScenarioTemplate::new(
            ScenarioType::PriceShock,
            "Feedstock price spike",
            "30% rise in delivered feedstock prices sustained for a year",
            StressTestParameters {
                price_shock_percentage: Some(dec!(30)),
                duration_months: Some(dec!(12)),
                ..Default::default()
            },
        ),
        ScenarioTemplate::new(
            ScenarioType::PriceShock,
            "Severe short-term price shock",
            "50% price jump over six months, e.g. after a competing offtaker enters the region",
            StressTestParameters {
                price_shock_percentage: Some(dec!(50)),
                duration_months: Some(dec!(6)),
                ..Default::default()
            },
        ),
        ScenarioTemplate::new(
            ScenarioType::SupplyDisruption,
            "Drought-driven residue shortfall",
            "40% of agricultural residue supply lost for a season",
            StressTestParameters {
                supply_reduction_percentage: Some(dec!(40)),
                duration_months: Some(dec!(6)),
                affected_categories: Some(vec!["agricultural_residue".into()]),
                ..Default::default()
            },
        ),
        ScenarioTemplate::new(
            ScenarioType::SupplyDisruption,
            "Key supplier failure",
            "A quarter of volume unavailable for three months while replacement supply is found",
            StressTestParameters {
                supply_reduction_percentage: Some(dec!(25)),
                duration_months: Some(dec!(3)),
                ..Default::default()
            },
        ),
        ScenarioTemplate::new(
            ScenarioType::CovenantBreach,
            "Lender covenant pressure test",
            "Simultaneous price, volume and carbon price moves tested against financing covenants",
            StressTestParameters {
                price_shock_percentage: Some(dec!(20)),
                supply_reduction_percentage: Some(dec!(15)),
                carbon_price_increase: Some(dec!(50)),
                ..Default::default()
            },
        ),
        ScenarioTemplate::new(
            ScenarioType::Regulatory,
            "Carbon intensity threshold tightening",
            "Threshold cut by 10 gCO2e/MJ alongside a 100/t rise in carbon credit prices",
            StressTestParameters {
                regulatory_threshold_change: Some(dec!(-10)),
                carbon_price_increase: Some(dec!(100)),
                ..Default::default()
            },
        ),
        ScenarioTemplate::new(
            ScenarioType::Regulatory,
            "Stricter sustainability criteria",
            "Threshold cut by 15 gCO2e/MJ with no offsetting carbon price movement",
            StressTestParameters {
                regulatory_threshold_change: Some(dec!(-15)),
                carbon_price_increase: Some(dec!(0)),
                ..Default::default()
            },
        ),
        ScenarioTemplate::new(
            ScenarioType::Custom,
            "Perfect storm",
            "Price spike, supply loss and regulatory tightening landing in the same year",
            StressTestParameters {
                price_shock_percentage: Some(dec!(35)),
                supply_reduction_percentage: Some(dec!(30)),
                regulatory_threshold_change: Some(dec!(-10)),
                carbon_price_increase: Some(dec!(75)),
                duration_months: Some(dec!(12)),
                ..Default::default()
            },
        ),
    ]
}
