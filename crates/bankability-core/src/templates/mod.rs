//! Canned scenario presets and a runner that applies all of them to one
//! baseline.

pub mod catalogue;
pub mod suite;

pub use catalogue::{get_scenario_templates, ScenarioTemplate};
pub use suite::{
    run_template_suite, run_template_suite_with_config, TemplateRun, TemplateSuiteOutput,
};
