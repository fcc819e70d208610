//! Frozen engine constants.
//!
//! Every threshold, premium and default the evaluators use lives here so a
//! single `StressConfig` value fully determines the engine's behaviour.
//! The evaluators only ever borrow it; nothing in the crate mutates it.
//! Every section carries `#[serde(default)]`, so a config file only needs
//! the keys it overrides.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BankabilityError;
use crate::types::{Money, Percent, Rate, Tonnes};
use crate::BankabilityResult;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceShockConfig {
    pub default_shock_percentage: Percent,
    pub default_duration_months: Decimal,
    /// Shock (as a rate) above which the covenant moves to warning
    pub warning_threshold: Rate,
    /// Breach fires at `warning_threshold * breach_multiplier`
    pub breach_multiplier: Decimal,
    /// Upper clamp for `price_shock_percentage`
    pub max_shock_percentage: Percent,
}

impl Default for PriceShockConfig {
    fn default() -> Self {
        Self {
            default_shock_percentage: dec!(30),
            default_duration_months: dec!(12),
            warning_threshold: dec!(0.25),
            breach_multiplier: dec!(1.5),
            max_shock_percentage: dec!(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyDisruptionConfig {
    pub default_reduction_percentage: Percent,
    pub default_duration_months: Decimal,
    /// Share of the gap replaced on the spot market; the rest is urgent
    pub spot_share: Rate,
    pub spot_premium: Decimal,
    pub urgent_premium: Decimal,
    pub warning_threshold: Rate,
    pub breach_threshold: Rate,
}

impl Default for SupplyDisruptionConfig {
    fn default() -> Self {
        Self {
            default_reduction_percentage: dec!(25),
            default_duration_months: dec!(6),
            spot_share: dec!(0.60),
            spot_premium: dec!(1.15),
            urgent_premium: dec!(1.35),
            warning_threshold: dec!(0.15),
            breach_threshold: dec!(0.30),
        }
    }
}

impl SupplyDisruptionConfig {
    /// Volume-weighted price multiplier across the spot and urgent tiers.
    pub fn blended_premium(&self) -> Decimal {
        self.spot_share * self.spot_premium + (Decimal::ONE - self.spot_share) * self.urgent_premium
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CovenantBreachConfig {
    pub default_price_shock_percentage: Percent,
    pub default_supply_reduction_percentage: Percent,
    pub default_carbon_price_increase: Money,
    pub concentration_limit: Rate,
    pub price_variance_limit: Rate,
    pub volume_shortfall_limit: Rate,
    /// Fraction of annual volume assumed to generate carbon credits
    pub credit_generating_share: Rate,
}

impl Default for CovenantBreachConfig {
    fn default() -> Self {
        Self {
            default_price_shock_percentage: dec!(20),
            default_supply_reduction_percentage: dec!(15),
            default_carbon_price_increase: dec!(50),
            concentration_limit: dec!(0.40),
            price_variance_limit: dec!(0.25),
            volume_shortfall_limit: dec!(0.15),
            credit_generating_share: dec!(0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatoryConfig {
    /// gCO2e/MJ; negative tightens the threshold
    pub default_threshold_change: Decimal,
    pub default_carbon_price_increase: Money,
    /// Percent of supply pushed out of compliance per unit of tightening
    pub non_compliance_per_unit: Percent,
    /// Price multiplier for compliant substitute feedstock
    pub compliant_premium: Decimal,
    pub credit_generating_share: Rate,
    pub warning_threshold: Percent,
    pub breach_threshold: Percent,
}

impl Default for RegulatoryConfig {
    fn default() -> Self {
        Self {
            default_threshold_change: dec!(-10),
            default_carbon_price_increase: dec!(100),
            non_compliance_per_unit: dec!(2),
            compliant_premium: dec!(1.3),
            credit_generating_share: dec!(0.5),
            warning_threshold: dec!(15),
            breach_threshold: dec!(30),
        }
    }
}

/// Weights are applied as-is; they are not renormalised when a
/// sub-scenario does not run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub price_weight: Decimal,
    pub supply_weight: Decimal,
    pub regulatory_weight: Decimal,
    /// |impact| / annual spend above which the covenant moves to warning
    pub warning_ratio: Rate,
    pub breach_ratio: Rate,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            price_weight: dec!(0.30),
            supply_weight: dec!(0.35),
            regulatory_weight: dec!(0.35),
            warning_ratio: dec!(0.10),
            breach_ratio: dec!(0.25),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineDefaults {
    pub annual_volume_required: Tonnes,
    pub current_average_price: Money,
    pub carbon_credit_price: Money,
    pub fuel_blend_mandate: Percent,
    pub current_supplier_count: u32,
    pub concentration_top_supplier_percentage: Rate,
}

impl Default for BaselineDefaults {
    fn default() -> Self {
        Self {
            annual_volume_required: dec!(10000),
            current_average_price: dec!(850),
            carbon_credit_price: dec!(35),
            fuel_blend_mandate: dec!(7.5),
            current_supplier_count: 3,
            concentration_top_supplier_percentage: dec!(0.40),
        }
    }
}

/// Upper bounds on inputs. Anything above these is rejected at the
/// boundary, which keeps every evaluator product inside `Decimal` range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_annual_volume: Tonnes,
    /// Applies to the feedstock price and the carbon credit price
    pub max_price_per_tonne: Money,
    /// Bound on |carbon_price_increase|
    pub max_carbon_price_move: Money,
    pub max_duration_months: Decimal,
    /// Bound on |regulatory_threshold_change|, gCO2e/MJ
    pub max_threshold_change: Decimal,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_annual_volume: dec!(100000000),
            max_price_per_tonne: dec!(100000),
            max_carbon_price_move: dec!(100000),
            max_duration_months: dec!(120),
            max_threshold_change: dec!(100),
        }
    }
}

// Ceilings a config file may raise the limits to.
const VOLUME_CEILING: Decimal = dec!(10000000000);
const PRICE_CEILING: Decimal = dec!(10000000);
const DURATION_CEILING: Decimal = dec!(1200);
const THRESHOLD_CEILING: Decimal = dec!(1000);
const SHOCK_CEILING: Percent = dec!(10000);
const PREMIUM_CEILING: Decimal = dec!(100);
// Any other tunable (weights, thresholds, ratios)
const TUNABLE_CEILING: Decimal = dec!(1000000);

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub price_shock: PriceShockConfig,
    pub supply_disruption: SupplyDisruptionConfig,
    pub covenant_breach: CovenantBreachConfig,
    pub regulatory: RegulatoryConfig,
    pub composite: CompositeConfig,
    pub baseline_defaults: BaselineDefaults,
    pub limits: LimitsConfig,
}

impl StressConfig {
    /// Reject configurations that would make the evaluators meaningless.
    pub fn validate(&self) -> BankabilityResult<()> {
        let shares = [
            (
                "supply_disruption.spot_share",
                self.supply_disruption.spot_share,
            ),
            (
                "covenant_breach.credit_generating_share",
                self.covenant_breach.credit_generating_share,
            ),
            (
                "regulatory.credit_generating_share",
                self.regulatory.credit_generating_share,
            ),
            (
                "baseline_defaults.concentration_top_supplier_percentage",
                self.baseline_defaults.concentration_top_supplier_percentage,
            ),
        ];
        for (field, value) in shares {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(BankabilityError::invalid(field, "Must be between 0 and 1"));
            }
        }

        let premiums = [
            (
                "supply_disruption.spot_premium",
                self.supply_disruption.spot_premium,
            ),
            (
                "supply_disruption.urgent_premium",
                self.supply_disruption.urgent_premium,
            ),
            (
                "regulatory.compliant_premium",
                self.regulatory.compliant_premium,
            ),
        ];
        for (field, value) in premiums {
            if value < Decimal::ONE || value > PREMIUM_CEILING {
                return Err(BankabilityError::invalid(
                    field,
                    format!("Sourcing premium multiplier must be between 1 and {PREMIUM_CEILING}"),
                ));
            }
        }

        let non_negative = [
            ("composite.price_weight", self.composite.price_weight),
            ("composite.supply_weight", self.composite.supply_weight),
            (
                "composite.regulatory_weight",
                self.composite.regulatory_weight,
            ),
            ("composite.warning_ratio", self.composite.warning_ratio),
            ("composite.breach_ratio", self.composite.breach_ratio),
            (
                "price_shock.warning_threshold",
                self.price_shock.warning_threshold,
            ),
            (
                "price_shock.breach_multiplier",
                self.price_shock.breach_multiplier,
            ),
            (
                "supply_disruption.warning_threshold",
                self.supply_disruption.warning_threshold,
            ),
            (
                "supply_disruption.breach_threshold",
                self.supply_disruption.breach_threshold,
            ),
            (
                "covenant_breach.concentration_limit",
                self.covenant_breach.concentration_limit,
            ),
            (
                "covenant_breach.price_variance_limit",
                self.covenant_breach.price_variance_limit,
            ),
            (
                "covenant_breach.volume_shortfall_limit",
                self.covenant_breach.volume_shortfall_limit,
            ),
            (
                "regulatory.non_compliance_per_unit",
                self.regulatory.non_compliance_per_unit,
            ),
            (
                "regulatory.warning_threshold",
                self.regulatory.warning_threshold,
            ),
            (
                "regulatory.breach_threshold",
                self.regulatory.breach_threshold,
            ),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO || value > TUNABLE_CEILING {
                return Err(BankabilityError::invalid(
                    field,
                    format!("Must be between 0 and {TUNABLE_CEILING}"),
                ));
            }
        }

        self.validate_limits()?;
        self.validate_defaults()?;

        let ladders = [
            (
                "supply_disruption.warning_threshold",
                self.supply_disruption.warning_threshold,
                self.supply_disruption.breach_threshold,
            ),
            (
                "regulatory.warning_threshold",
                self.regulatory.warning_threshold,
                self.regulatory.breach_threshold,
            ),
            (
                "composite.warning_ratio",
                self.composite.warning_ratio,
                self.composite.breach_ratio,
            ),
        ];
        for (field, warning, breach) in ladders {
            if warning > breach {
                return Err(BankabilityError::invalid(
                    field,
                    "Warning threshold must not exceed the breach threshold",
                ));
            }
        }
        if self.price_shock.breach_multiplier < Decimal::ONE {
            return Err(BankabilityError::invalid(
                "price_shock.breach_multiplier",
                "Must be at least 1",
            ));
        }

        Ok(())
    }

    fn validate_limits(&self) -> BankabilityResult<()> {
        let limits = &self.limits;
        let bounded = [
            (
                "limits.max_annual_volume",
                limits.max_annual_volume,
                VOLUME_CEILING,
            ),
            (
                "limits.max_price_per_tonne",
                limits.max_price_per_tonne,
                PRICE_CEILING,
            ),
            (
                "limits.max_carbon_price_move",
                limits.max_carbon_price_move,
                PRICE_CEILING,
            ),
            (
                "limits.max_duration_months",
                limits.max_duration_months,
                DURATION_CEILING,
            ),
            (
                "limits.max_threshold_change",
                limits.max_threshold_change,
                THRESHOLD_CEILING,
            ),
            (
                "price_shock.max_shock_percentage",
                self.price_shock.max_shock_percentage,
                SHOCK_CEILING,
            ),
        ];
        for (field, value, ceiling) in bounded {
            if value < Decimal::ZERO || value > ceiling {
                return Err(BankabilityError::invalid(
                    field,
                    format!("Must be between 0 and {ceiling}"),
                ));
            }
        }
        Ok(())
    }

    /// Defaults feed the evaluators without passing parameter validation,
    /// so they must sit inside the same limits as caller input.
    fn validate_defaults(&self) -> BankabilityResult<()> {
        let limits = &self.limits;
        let hundred = Decimal::ONE_HUNDRED;
        let max_shock = self.price_shock.max_shock_percentage;
        let bounded = [
            (
                "price_shock.default_shock_percentage",
                self.price_shock.default_shock_percentage,
                max_shock,
            ),
            (
                "price_shock.default_duration_months",
                self.price_shock.default_duration_months,
                limits.max_duration_months,
            ),
            (
                "supply_disruption.default_reduction_percentage",
                self.supply_disruption.default_reduction_percentage,
                hundred,
            ),
            (
                "supply_disruption.default_duration_months",
                self.supply_disruption.default_duration_months,
                limits.max_duration_months,
            ),
            (
                "covenant_breach.default_price_shock_percentage",
                self.covenant_breach.default_price_shock_percentage,
                max_shock,
            ),
            (
                "covenant_breach.default_supply_reduction_percentage",
                self.covenant_breach.default_supply_reduction_percentage,
                hundred,
            ),
            (
                "baseline_defaults.annual_volume_required",
                self.baseline_defaults.annual_volume_required,
                limits.max_annual_volume,
            ),
            (
                "baseline_defaults.current_average_price",
                self.baseline_defaults.current_average_price,
                limits.max_price_per_tonne,
            ),
            (
                "baseline_defaults.carbon_credit_price",
                self.baseline_defaults.carbon_credit_price,
                limits.max_price_per_tonne,
            ),
            (
                "baseline_defaults.fuel_blend_mandate",
                self.baseline_defaults.fuel_blend_mandate,
                hundred,
            ),
        ];
        for (field, value, max) in bounded {
            if value < Decimal::ZERO || value > max {
                return Err(BankabilityError::invalid(
                    field,
                    format!("Must be between 0 and {max}"),
                ));
            }
        }

        let magnitudes = [
            (
                "covenant_breach.default_carbon_price_increase",
                self.covenant_breach.default_carbon_price_increase,
                limits.max_carbon_price_move,
            ),
            (
                "regulatory.default_carbon_price_increase",
                self.regulatory.default_carbon_price_increase,
                limits.max_carbon_price_move,
            ),
            (
                "regulatory.default_threshold_change",
                self.regulatory.default_threshold_change,
                limits.max_threshold_change,
            ),
        ];
        for (field, value, max) in magnitudes {
            if value.abs() > max {
                return Err(BankabilityError::invalid(
                    field,
                    format!("Magnitude must not exceed {max}"),
                ));
            }
        }

        if self.baseline_defaults.current_supplier_count == 0 {
            return Err(BankabilityError::invalid(
                "baseline_defaults.current_supplier_count",
                "At least one supplier required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(StressConfig::default().validate().is_ok());
    }

    #[test]
    fn test_blended_premium() {
        // 0.6 * 1.15 + 0.4 * 1.35 = 0.69 + 0.54
        let cfg = SupplyDisruptionConfig::default();
        assert_eq!(cfg.blended_premium(), dec!(1.23));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: StressConfig =
            serde_json::from_str(r#"{"composite": {"breach_ratio": "0.5"}}"#).unwrap();
        assert_eq!(cfg.composite.breach_ratio, dec!(0.5));
        assert_eq!(cfg.composite.warning_ratio, dec!(0.10));
        assert_eq!(cfg.price_shock, PriceShockConfig::default());
    }

    #[test]
    fn test_rejects_spot_share_above_one() {
        let mut cfg = StressConfig::default();
        cfg.supply_disruption.spot_share = dec!(1.2);
        match cfg.validate() {
            Err(BankabilityError::InvalidInput { field, .. }) => {
                assert_eq!(field, "supply_disruption.spot_share")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_discount_premium() {
        let mut cfg = StressConfig::default();
        cfg.regulatory.compliant_premium = dec!(0.9);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_limits_above_ceiling() {
        let mut cfg = StressConfig::default();
        cfg.limits.max_duration_months = dec!(100000000000000000000000000);
        match cfg.validate() {
            Err(BankabilityError::InvalidInput { field, .. }) => {
                assert_eq!(field, "limits.max_duration_months")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_default_outside_limits() {
        let mut cfg = StressConfig::default();
        cfg.price_shock.default_duration_months = dec!(240);
        assert!(cfg.validate().is_err());

        let mut cfg = StressConfig::default();
        cfg.regulatory.default_threshold_change = dec!(-150);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_premium() {
        let mut cfg = StressConfig::default();
        cfg.supply_disruption.urgent_premium = dec!(100000000000000000000);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_threshold_ladder() {
        let mut cfg = StressConfig::default();
        cfg.composite.warning_ratio = dec!(0.30);
        assert!(cfg.validate().is_err());
    }
}
