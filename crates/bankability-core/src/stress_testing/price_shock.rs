use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::StressConfig;

use super::model::{
    bounded_score, CovenantStatus, MitigationOption, SensitivityFactor, StressTestBaseline,
    StressTestParameters, StressTestResults,
};

/// Project the cost of a sustained feedstock price increase.
///
/// Only the months covered by `duration_months` are exposed; the shock is
/// applied to the full monthly volume over that window. The price shock
/// alone never creates a supply gap.
pub fn evaluate(
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
) -> StressTestResults {
    let cfg = &config.price_shock;
    let shock_pct = params
        .price_shock_percentage
        .unwrap_or(cfg.default_shock_percentage);
    let duration = params
        .duration_months
        .unwrap_or(cfg.default_duration_months);

    let price = baseline.current_average_price;
    let shock_rate = shock_pct / dec!(100);
    let shocked_price = price * (Decimal::ONE + shock_rate);
    let affected_volume = baseline.monthly_volume() * duration;
    let financial_impact = -affected_volume * (shocked_price - price);

    let risk_score = bounded_score(
        dec!(50) * shock_rate.min(Decimal::ONE)
            + dec!(30) * (duration / dec!(24)).min(Decimal::ONE)
            + dec!(20) * baseline.concentration_top_supplier_percentage,
    );

    let covenant_status = CovenantStatus::from_thresholds(
        shock_rate,
        cfg.warning_threshold,
        cfg.warning_threshold * cfg.breach_multiplier,
    );

    let mitigation_options = vec![
        MitigationOption::new(
            "Lock in fixed-price forward contracts with existing suppliers",
            financial_impact * dec!(0.30),
            30,
            dec!(75),
        ),
        MitigationOption::new(
            "Diversify supplier base across feedstock regions",
            financial_impact * dec!(0.20),
            90,
            dec!(65),
        ),
        MitigationOption::new(
            "Negotiate long-term offtake agreements with price collars",
            financial_impact * dec!(0.40),
            180,
            dec!(80),
        ),
        // Carrying cost of holding a strategic buffer through the shock
        MitigationOption::new(
            "Build strategic inventory buffer ahead of price rises",
            financial_impact * dec!(0.15),
            14,
            dec!(60),
        ),
    ];

    let monthly_volume = baseline.monthly_volume();
    let sensitivity_analysis = vec![
        SensitivityFactor::new(
            "price_shock_percentage",
            shock_pct,
            -monthly_volume * duration * price / dec!(100),
        ),
        SensitivityFactor::new(
            "duration_months",
            duration,
            -monthly_volume * price * shock_rate,
        ),
        SensitivityFactor::new(
            "annual_volume_required",
            baseline.annual_volume_required,
            -(duration / dec!(12)) * price * shock_rate,
        ),
    ];

    StressTestResults {
        financial_impact,
        supply_gap_tonnes: Decimal::ZERO,
        alternative_cost_per_tonne: shocked_price,
        risk_score,
        covenant_status,
        mitigation_options,
        sensitivity_analysis,
    }
}
