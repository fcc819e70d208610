use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::StressConfig;

use super::model::{
    bounded_score, CovenantStatus, MitigationOption, SensitivityFactor, StressTestBaseline,
    StressTestParameters, StressTestResults,
};

/// Project the effect of a carbon-intensity threshold change combined with
/// a carbon credit price move.
///
/// Every unit of threshold change pushes a fixed share of current supply
/// out of compliance (capped at all of it); that volume must be replaced
/// with compliant feedstock at a premium. The credit price move revalues
/// the credits generated on the credit-generating share of volume.
pub fn evaluate(
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
) -> StressTestResults {
    let cfg = &config.regulatory;
    let threshold_change = params
        .regulatory_threshold_change
        .unwrap_or(cfg.default_threshold_change);
    let carbon_increase = params
        .carbon_price_increase
        .unwrap_or(cfg.default_carbon_price_increase);

    let volume = baseline.annual_volume_required;
    let price = baseline.current_average_price;
    let magnitude = threshold_change.abs();

    let uncapped_pct = magnitude * cfg.non_compliance_per_unit;
    let non_compliant_pct = uncapped_pct.min(dec!(100));
    let non_compliant_volume = volume * non_compliant_pct / dec!(100);
    let switching_markup = price * (cfg.compliant_premium - Decimal::ONE);
    let switching_cost = non_compliant_volume * switching_markup;

    let new_carbon_price = baseline.carbon_credit_price + carbon_increase;
    let carbon_value_change =
        cfg.credit_generating_share * volume * (new_carbon_price - baseline.carbon_credit_price);

    let financial_impact = carbon_value_change - switching_cost;

    let risk_score = bounded_score(
        (magnitude * dec!(5)).min(dec!(50)) + non_compliant_pct * dec!(1.5) + dec!(10),
    );

    let covenant_status = CovenantStatus::from_thresholds(
        non_compliant_pct,
        cfg.warning_threshold,
        cfg.breach_threshold,
    );

    // Ordered from tactical to strategic
    let mitigation_options = vec![
        MitigationOption::new(
            "Hedge carbon exposure with forward credit contracts",
            -switching_cost * dec!(0.05),
            30,
            dec!(55),
        ),
        MitigationOption::new(
            "Qualify certified low-intensity feedstock suppliers",
            -switching_cost * dec!(0.15),
            90,
            dec!(70),
        ),
        MitigationOption::new(
            "Fund supplier traceability and certification programme",
            dec!(-150000),
            180,
            dec!(65),
        ),
        MitigationOption::new(
            "Invest in in-house feedstock pre-processing facility",
            dec!(-2000000),
            540,
            dec!(85),
        ),
    ];

    // Moving the threshold towards zero shrinks the non-compliant share;
    // once the share is capped further tightening has no marginal effect.
    let threshold_per_unit = if uncapped_pct >= dec!(100) {
        Decimal::ZERO
    } else {
        let direction = if threshold_change > Decimal::ZERO {
            Decimal::NEGATIVE_ONE
        } else {
            Decimal::ONE
        };
        direction * volume * cfg.non_compliance_per_unit / dec!(100) * switching_markup
    };

    let sensitivity_analysis = vec![
        SensitivityFactor::new(
            "regulatory_threshold_change",
            threshold_change,
            threshold_per_unit,
        ),
        SensitivityFactor::new(
            "carbon_price_increase",
            carbon_increase,
            cfg.credit_generating_share * volume,
        ),
        SensitivityFactor::new(
            "annual_volume_required",
            volume,
            cfg.credit_generating_share * carbon_increase
                - non_compliant_pct / dec!(100) * switching_markup,
        ),
    ];

    StressTestResults {
        financial_impact,
        supply_gap_tonnes: non_compliant_volume,
        alternative_cost_per_tonne: price * cfg.compliant_premium,
        risk_score,
        covenant_status,
        mitigation_options,
        sensitivity_analysis,
    }
}
