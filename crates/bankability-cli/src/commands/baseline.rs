use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bankability_core::stress_testing::{self, PartialBuyerData};
use bankability_core::StressConfig;

/// Arguments for building a default baseline
#[derive(Args)]
pub struct BaselineArgs {
    /// Annual feedstock volume required (tonnes)
    #[arg(long)]
    pub annual_volume: Option<Decimal>,

    /// Current average delivered price per tonne
    #[arg(long)]
    pub average_price: Option<Decimal>,

    /// Share of volume from the largest supplier, as a fraction (e.g. 0.4)
    #[arg(long)]
    pub top_supplier_share: Option<Decimal>,

    /// Number of active suppliers
    #[arg(long)]
    pub supplier_count: Option<u32>,
}

pub fn run_baseline(
    args: BaselineArgs,
    config: &StressConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let partial = PartialBuyerData {
        annual_volume: args.annual_volume,
        average_price: args.average_price,
        top_supplier_share: args.top_supplier_share,
        supplier_count: args.supplier_count,
    };
    let baseline =
        stress_testing::generate_default_baseline_with(&partial, &config.baseline_defaults);
    stress_testing::validation::validate_baseline(&baseline, config)?;
    Ok(serde_json::to_value(baseline)?)
}
