//! Bankability stress testing for biomass feedstock supply chains.
//!
//! Four independent evaluators (price shock, supply disruption, covenant
//! breach, regulatory change) share one result shape. The custom evaluator
//! composes them and [`engine::run_stress_test`] dispatches on the
//! scenario tag.

pub mod baseline;
pub mod covenant_breach;
pub mod custom;
pub mod engine;
pub mod model;
pub mod price_shock;
pub mod regulatory;
pub mod supply_disruption;
pub mod validation;

pub use baseline::{generate_default_baseline, generate_default_baseline_with, PartialBuyerData};
pub use engine::{
    run_covenant_breach_scenario, run_custom_scenario, run_price_shock_scenario,
    run_regulatory_scenario, run_stress_test, run_stress_test_with_config,
    run_supply_disruption_scenario,
};
pub use model::{
    CovenantStatus, MitigationOption, ScenarioType, SensitivityFactor, StressTestBaseline,
    StressTestParameters, StressTestResults,
};
