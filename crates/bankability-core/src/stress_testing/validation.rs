use rust_decimal::Decimal;

use crate::config::StressConfig;
use crate::error::BankabilityError;
use crate::BankabilityResult;

use super::model::{StressTestBaseline, StressTestParameters};

/// Reject baselines the evaluators cannot give a meaningful answer for.
///
/// Values above `config.limits` are rejected, not clamped.
pub fn validate_baseline(
    baseline: &StressTestBaseline,
    config: &StressConfig,
) -> BankabilityResult<()> {
    let limits = &config.limits;
    let bounded = [
        (
            "annual_volume_required",
            baseline.annual_volume_required,
            limits.max_annual_volume,
        ),
        (
            "current_average_price",
            baseline.current_average_price,
            limits.max_price_per_tonne,
        ),
        (
            "carbon_credit_price",
            baseline.carbon_credit_price,
            limits.max_price_per_tonne,
        ),
        (
            "fuel_blend_mandate",
            baseline.fuel_blend_mandate,
            Decimal::ONE_HUNDRED,
        ),
    ];
    for (field, value, max) in bounded {
        if value < Decimal::ZERO {
            return Err(BankabilityError::invalid(
                format!("baseline.{field}"),
                "Must be non-negative",
            ));
        }
        if value > max {
            return Err(BankabilityError::invalid(
                format!("baseline.{field}"),
                format!("{value} exceeds the limit of {max}"),
            ));
        }
    }

    if baseline.current_supplier_count == 0 {
        return Err(BankabilityError::invalid(
            "baseline.current_supplier_count",
            "At least one supplier required",
        ));
    }

    let c = baseline.concentration_top_supplier_percentage;
    if c < Decimal::ZERO || c > Decimal::ONE {
        return Err(BankabilityError::invalid(
            "baseline.concentration_top_supplier_percentage",
            "Must be a fraction between 0 and 1",
        ));
    }

    Ok(())
}

/// Validate scenario parameters against a baseline, clamping percentages
/// into their domains. Each clamp is reported in `warnings`. Durations and
/// carbon or threshold moves beyond `config.limits` are rejected.
pub fn sanitise_parameters(
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
    warnings: &mut Vec<String>,
) -> BankabilityResult<StressTestParameters> {
    let mut clean = params.clone();
    let limits = &config.limits;

    if let Some(d) = params.duration_months {
        if d < Decimal::ZERO {
            return Err(BankabilityError::invalid(
                "parameters.duration_months",
                "Duration cannot be negative",
            ));
        }
        if d > limits.max_duration_months {
            return Err(BankabilityError::invalid(
                "parameters.duration_months",
                format!(
                    "{d} months exceeds the limit of {}",
                    limits.max_duration_months
                ),
            ));
        }
    }

    let magnitudes = [
        (
            "carbon_price_increase",
            params.carbon_price_increase,
            limits.max_carbon_price_move,
        ),
        (
            "regulatory_threshold_change",
            params.regulatory_threshold_change,
            limits.max_threshold_change,
        ),
    ];
    for (field, value, max) in magnitudes {
        if let Some(v) = value {
            if v.abs() > max {
                return Err(BankabilityError::invalid(
                    format!("parameters.{field}"),
                    format!("Magnitude {} exceeds the limit of {max}", v.abs()),
                ));
            }
        }
    }

    if let Some(increase) = params.carbon_price_increase {
        if baseline.carbon_credit_price + increase < Decimal::ZERO {
            return Err(BankabilityError::invalid(
                "parameters.carbon_price_increase",
                format!(
                    "Decrease of {} would take the carbon price ({}) below zero",
                    -increase, baseline.carbon_credit_price
                ),
            ));
        }
    }

    clean.price_shock_percentage = params.price_shock_percentage.map(|s| {
        clamp_percentage(
            "price_shock_percentage",
            s,
            config.price_shock.max_shock_percentage,
            warnings,
        )
    });
    clean.supply_reduction_percentage = params.supply_reduction_percentage.map(|r| {
        clamp_percentage(
            "supply_reduction_percentage",
            r,
            Decimal::ONE_HUNDRED,
            warnings,
        )
    });

    Ok(clean)
}

fn clamp_percentage(
    field: &str,
    value: Decimal,
    max: Decimal,
    warnings: &mut Vec<String>,
) -> Decimal {
    let clamped = value.max(Decimal::ZERO).min(max);
    if clamped != value {
        tracing::warn!(field, %value, %clamped, "percentage parameter clamped");
        warnings.push(format!(
            "{field} of {value} is outside [0, {max}]; clamped to {clamped}"
        ));
    }
    clamped
}
