use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Money, Percent, Rate, Tonnes};

// ---------------------------------------------------------------------------
// Scenario tags
// ---------------------------------------------------------------------------

/// Which evaluator a stress test runs.
///
/// Tags are snake_case strings on the wire. Anything unrecognised parses
/// to `Custom`, so a stale or mistyped tag still produces a composite run
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ScenarioType {
    PriceShock,
    SupplyDisruption,
    CovenantBreach,
    Regulatory,
    Custom,
}

impl ScenarioType {
    pub const ALL: [ScenarioType; 5] = [
        ScenarioType::PriceShock,
        ScenarioType::SupplyDisruption,
        ScenarioType::CovenantBreach,
        ScenarioType::Regulatory,
        ScenarioType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::PriceShock => "price_shock",
            ScenarioType::SupplyDisruption => "supply_disruption",
            ScenarioType::CovenantBreach => "covenant_breach",
            ScenarioType::Regulatory => "regulatory",
            ScenarioType::Custom => "custom",
        }
    }

    /// Parameter keys the evaluator for this tag reads.
    pub fn parameter_keys(&self) -> &'static [&'static str] {
        match self {
            ScenarioType::PriceShock => &["price_shock_percentage", "duration_months"],
            ScenarioType::SupplyDisruption => &[
                "supply_reduction_percentage",
                "duration_months",
                "affected_categories",
            ],
            ScenarioType::CovenantBreach => &[
                "price_shock_percentage",
                "supply_reduction_percentage",
                "carbon_price_increase",
            ],
            ScenarioType::Regulatory => &["regulatory_threshold_change", "carbon_price_increase"],
            ScenarioType::Custom => &StressTestParameters::KEYS,
        }
    }

    pub fn methodology(&self) -> &'static str {
        match self {
            ScenarioType::PriceShock => "Feedstock Price Shock Stress Test",
            ScenarioType::SupplyDisruption => "Supply Disruption Stress Test",
            ScenarioType::CovenantBreach => "Covenant Breach Combined Pressure Test",
            ScenarioType::Regulatory => "Regulatory and Carbon Price Change Stress Test",
            ScenarioType::Custom => "Composite Custom Stress Test",
        }
    }
}

impl From<&str> for ScenarioType {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "price_shock" => ScenarioType::PriceShock,
            "supply_disruption" => ScenarioType::SupplyDisruption,
            "covenant_breach" => ScenarioType::CovenantBreach,
            "regulatory" => ScenarioType::Regulatory,
            _ => ScenarioType::Custom,
        }
    }
}

impl From<String> for ScenarioType {
    fn from(tag: String) -> Self {
        ScenarioType::from(tag.as_str())
    }
}

impl FromStr for ScenarioType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ScenarioType::from(s))
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The buyer's current supply-chain position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestBaseline {
    /// Total yearly feedstock requirement (tonnes)
    pub annual_volume_required: Tonnes,
    /// Average delivered price per tonne
    pub current_average_price: Money,
    /// Price per tCO2e of carbon credits
    pub carbon_credit_price: Money,
    /// Carried for reporting; no evaluator reads it
    pub fuel_blend_mandate: Percent,
    pub current_supplier_count: u32,
    /// Fraction of volume from the largest supplier, in [0, 1]
    pub concentration_top_supplier_percentage: Rate,
}

impl StressTestBaseline {
    /// Annual feedstock spend at the current average price.
    pub fn annual_spend(&self) -> Money {
        self.annual_volume_required * self.current_average_price
    }

    pub fn monthly_volume(&self) -> Tonnes {
        self.annual_volume_required / Decimal::from(12)
    }
}

/// Scenario knobs. Every field is optional; each evaluator substitutes its
/// own defaults for the ones it reads and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressTestParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_shock_percentage: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_reduction_percentage: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_price_increase: Option<Money>,
    /// gCO2e/MJ; negative means a stricter threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulatory_threshold_change: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<Decimal>,
}

impl StressTestParameters {
    pub const KEYS: [&'static str; 6] = [
        "price_shock_percentage",
        "supply_reduction_percentage",
        "affected_categories",
        "carbon_price_increase",
        "regulatory_threshold_change",
        "duration_months",
    ];

    /// Names of the fields that are set, in declaration order.
    pub fn present_keys(&self) -> Vec<&'static str> {
        let flags = [
            self.price_shock_percentage.is_some(),
            self.supply_reduction_percentage.is_some(),
            self.affected_categories.is_some(),
            self.carbon_price_increase.is_some(),
            self.regulatory_threshold_change.is_some(),
            self.duration_months.is_some(),
        ];
        Self::KEYS
            .iter()
            .zip(flags)
            .filter(|(_, set)| *set)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_keys().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Covenant position, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovenantStatus {
    Compliant,
    Warning,
    Breach,
}

impl CovenantStatus {
    /// Two-step ladder: above `breach` is a breach, above `warning` a warning.
    pub fn from_thresholds(value: Decimal, warning: Decimal, breach: Decimal) -> Self {
        if value > breach {
            CovenantStatus::Breach
        } else if value > warning {
            CovenantStatus::Warning
        } else {
            CovenantStatus::Compliant
        }
    }
}

impl fmt::Display for CovenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CovenantStatus::Compliant => "compliant",
            CovenantStatus::Warning => "warning",
            CovenantStatus::Breach => "breach",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationOption {
    pub option: String,
    /// Negative = cost to the buyer
    pub cost_impact: Money,
    pub implementation_time_days: u32,
    /// 0-100
    pub effectiveness_score: Decimal,
}

impl MitigationOption {
    pub(crate) fn new(
        option: &str,
        cost_impact: Money,
        implementation_time_days: u32,
        effectiveness_score: Decimal,
    ) -> Self {
        Self {
            option: option.to_string(),
            cost_impact,
            implementation_time_days,
            effectiveness_score,
        }
    }
}

/// First-order sensitivity of `financial_impact` to one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityFactor {
    pub variable: String,
    pub base_value: Decimal,
    /// d(financial_impact) / d(variable), other inputs held fixed
    pub impact_per_unit: Decimal,
}

impl SensitivityFactor {
    pub(crate) fn new(variable: &str, base_value: Decimal, impact_per_unit: Decimal) -> Self {
        Self {
            variable: variable.to_string(),
            base_value,
            impact_per_unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestResults {
    /// Signed: negative is an adverse cost, positive a net benefit
    pub financial_impact: Money,
    pub supply_gap_tonnes: Tonnes,
    pub alternative_cost_per_tonne: Money,
    /// 0-100
    pub risk_score: Decimal,
    pub covenant_status: CovenantStatus,
    pub mitigation_options: Vec<MitigationOption>,
    pub sensitivity_analysis: Vec<SensitivityFactor>,
}

/// Cap a raw score at 100 and floor it at 0.
pub(crate) fn bounded_score(raw: Decimal) -> Decimal {
    raw.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}
