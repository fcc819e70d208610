use serde::{Deserialize, Serialize};

use crate::config::BaselineDefaults;
use crate::types::{Money, Rate, Tonnes};

use super::model::StressTestBaseline;

/// The buyer facts a marketplace profile usually has on hand. Any subset
/// may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialBuyerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_volume: Option<Tonnes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_price: Option<Money>,
    /// Fraction of volume from the largest supplier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_supplier_share: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_count: Option<u32>,
}

/// Build a baseline from sparse buyer data using the standard defaults.
pub fn generate_default_baseline(partial: &PartialBuyerData) -> StressTestBaseline {
    generate_default_baseline_with(partial, &BaselineDefaults::default())
}

/// Build a baseline from sparse buyer data, filling gaps from `defaults`.
///
/// Carbon price and blend mandate are not part of a buyer profile and
/// always come from `defaults`.
pub fn generate_default_baseline_with(
    partial: &PartialBuyerData,
    defaults: &BaselineDefaults,
) -> StressTestBaseline {
    StressTestBaseline {
        annual_volume_required: partial
            .annual_volume
            .unwrap_or(defaults.annual_volume_required),
        current_average_price: partial
            .average_price
            .unwrap_or(defaults.current_average_price),
        carbon_credit_price: defaults.carbon_credit_price,
        fuel_blend_mandate: defaults.fuel_blend_mandate,
        current_supplier_count: partial
            .supplier_count
            .unwrap_or(defaults.current_supplier_count),
        concentration_top_supplier_percentage: partial
            .top_supplier_share
            .unwrap_or(defaults.concentration_top_supplier_percentage),
    }
}
