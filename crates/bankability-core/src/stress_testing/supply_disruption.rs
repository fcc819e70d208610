use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::StressConfig;

use super::model::{
    bounded_score, CovenantStatus, MitigationOption, SensitivityFactor, StressTestBaseline,
    StressTestParameters, StressTestResults,
};

/// Project the premium paid to replace lost supply on short notice.
///
/// The shortfall is split between a spot tier and an urgent tier, each
/// with its own price multiplier; the financial impact is the premium
/// over what the same tonnes would have cost at the baseline price.
/// `affected_categories` is accepted but does not filter the volume.
pub fn evaluate(
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
) -> StressTestResults {
    let cfg = &config.supply_disruption;
    let reduction_pct = params
        .supply_reduction_percentage
        .unwrap_or(cfg.default_reduction_percentage);
    let duration = params
        .duration_months
        .unwrap_or(cfg.default_duration_months);

    let price = baseline.current_average_price;
    let reduction_rate = reduction_pct / dec!(100);
    let monthly_volume = baseline.monthly_volume();
    let supply_gap = monthly_volume * reduction_rate * duration;

    let spot_volume = supply_gap * cfg.spot_share;
    let urgent_volume = supply_gap - spot_volume;
    let spot_cost = spot_volume * price * cfg.spot_premium;
    let urgent_cost = urgent_volume * price * cfg.urgent_premium;
    let financial_impact = -(spot_cost + urgent_cost - supply_gap * price);

    let blended_premium = cfg.blended_premium();
    let alternative_cost_per_tonne = price * blended_premium;

    let risk_score = bounded_score(
        dec!(40) * reduction_rate
            + dec!(25) * (duration / dec!(12)).min(Decimal::ONE)
            + dec!(35) * baseline.concentration_top_supplier_percentage,
    );

    let covenant_status = CovenantStatus::from_thresholds(
        reduction_rate,
        cfg.warning_threshold,
        cfg.breach_threshold,
    );

    let mitigation_options = vec![
        MitigationOption::new(
            "Activate pre-qualified backup suppliers",
            financial_impact * dec!(0.30),
            30,
            dec!(85),
        ),
        MitigationOption::new(
            "Source replacement feedstock from international markets",
            financial_impact * dec!(0.45),
            60,
            dec!(70),
        ),
        MitigationOption::new(
            "Temporarily reduce production to match available feedstock",
            financial_impact * dec!(0.60),
            7,
            dec!(40),
        ),
        MitigationOption::new(
            "Draw down existing feedstock inventory",
            financial_impact * dec!(0.10),
            3,
            dec!(90),
        ),
    ];

    let premium_over_base = price * (blended_premium - Decimal::ONE);
    let sensitivity_analysis = vec![
        SensitivityFactor::new(
            "supply_reduction_percentage",
            reduction_pct,
            -monthly_volume * duration / dec!(100) * premium_over_base,
        ),
        SensitivityFactor::new(
            "duration_months",
            duration,
            -monthly_volume * reduction_rate * premium_over_base,
        ),
        SensitivityFactor::new(
            "spot_premium",
            cfg.spot_premium,
            -spot_volume * price,
        ),
    ];

    StressTestResults {
        financial_impact,
        supply_gap_tonnes: supply_gap,
        alternative_cost_per_tonne,
        risk_score,
        covenant_status,
        mitigation_options,
        sensitivity_analysis,
    }
}
