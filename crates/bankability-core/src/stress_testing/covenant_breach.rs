use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::StressConfig;

use super::model::{
    bounded_score, CovenantStatus, MitigationOption, SensitivityFactor, StressTestBaseline,
    StressTestParameters, StressTestResults,
};

/// One lender test in the combined pressure scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovenantCheck {
    pub covenant: String,
    pub actual: Decimal,
    pub limit: Decimal,
    pub violated: bool,
}

/// Evaluate the three lender tests for a stressed position.
pub fn covenant_checks(
    baseline: &StressTestBaseline,
    price_shock_rate: Decimal,
    supply_reduction_rate: Decimal,
    config: &StressConfig,
) -> Vec<CovenantCheck> {
    let cfg = &config.covenant_breach;
    [
        (
            "Top supplier concentration",
            baseline.concentration_top_supplier_percentage,
            cfg.concentration_limit,
        ),
        ("Feedstock price variance", price_shock_rate, cfg.price_variance_limit),
        ("Volume shortfall", supply_reduction_rate, cfg.volume_shortfall_limit),
    ]
    .into_iter()
    .map(|(covenant, actual, limit)| CovenantCheck {
        covenant: covenant.to_string(),
        actual,
        limit,
        violated: actual > limit,
    })
    .collect()
}

/// Rule-based status: two or more violations is a breach, one a warning.
pub fn status_from_checks(checks: &[CovenantCheck]) -> CovenantStatus {
    match checks.iter().filter(|c| c.violated).count() {
        0 => CovenantStatus::Compliant,
        1 => CovenantStatus::Warning,
        _ => CovenantStatus::Breach,
    }
}

/// Price shock, supply reduction and carbon move after defaults apply.
fn resolve(params: &StressTestParameters, config: &StressConfig) -> (Decimal, Decimal, Decimal) {
    let cfg = &config.covenant_breach;
    (
        params
            .price_shock_percentage
            .unwrap_or(cfg.default_price_shock_percentage),
        params
            .supply_reduction_percentage
            .unwrap_or(cfg.default_supply_reduction_percentage),
        params
            .carbon_price_increase
            .unwrap_or(cfg.default_carbon_price_increase),
    )
}

/// The lender tests a run of this scenario fails.
pub fn violated_covenants(
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
) -> Vec<CovenantCheck> {
    let (price_pct, supply_pct, _) = resolve(params, config);
    covenant_checks(
        baseline,
        price_pct / dec!(100),
        supply_pct / dec!(100),
        config,
    )
    .into_iter()
    .filter(|c| c.violated)
    .collect()
}

/// Apply a price shock, a supply shortfall and a carbon price rise together
/// on annual figures. Carbon credits on the credit-generating share of
/// volume partly offset the cost pressure.
pub fn evaluate(
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
) -> StressTestResults {
    let cfg = &config.covenant_breach;
    let (price_pct, supply_pct, carbon_increase) = resolve(params, config);

    let volume = baseline.annual_volume_required;
    let price = baseline.current_average_price;
    let price_rate = price_pct / dec!(100);
    let supply_rate = supply_pct / dec!(100);
    let sourcing_markup = config.supply_disruption.blended_premium() - Decimal::ONE;

    let price_impact = volume * price * price_rate;
    let supply_gap = volume * supply_rate;
    let supply_impact = supply_gap * price * sourcing_markup;
    let carbon_impact = cfg.credit_generating_share * volume * carbon_increase;
    let financial_impact = -(price_impact + supply_impact) + carbon_impact;

    let checks = covenant_checks(baseline, price_rate, supply_rate, config);
    let covenant_status = status_from_checks(&checks);

    let risk_score = bounded_score(
        dec!(30)
            + dec!(25) * price_rate
            + dec!(25) * supply_rate
            + dec!(20) * baseline.concentration_top_supplier_percentage,
    );

    // Remediation actions carry fixed legal/financing costs
    let mitigation_options = vec![
        MitigationOption::new(
            "Request covenant waiver or amendment from lenders",
            dec!(-50000),
            30,
            dec!(70),
        ),
        MitigationOption::new(
            "Arrange standby liquidity facility",
            dec!(-100000),
            45,
            dec!(80),
        ),
        MitigationOption::new(
            "Contract additional suppliers to cut top-supplier concentration",
            dec!(-75000),
            120,
            dec!(75),
        ),
        MitigationOption::new(
            "Sponsor equity cure to restore covenant headroom",
            dec!(-250000),
            60,
            dec!(90),
        ),
    ];

    let sensitivity_analysis = vec![
        SensitivityFactor::new(
            "price_shock_percentage",
            price_pct,
            -volume * price / dec!(100),
        ),
        SensitivityFactor::new(
            "supply_reduction_percentage",
            supply_pct,
            -volume / dec!(100) * price * sourcing_markup,
        ),
        SensitivityFactor::new(
            "carbon_price_increase",
            carbon_increase,
            cfg.credit_generating_share * volume,
        ),
    ];

    StressTestResults {
        financial_impact,
        supply_gap_tonnes: supply_gap,
        alternative_cost_per_tonne: price * (Decimal::ONE + price_rate),
        risk_score,
        covenant_status,
        mitigation_options,
        sensitivity_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> StressTestBaseline {
        StressTestBaseline {
            annual_volume_required: dec!(12000),
            current_average_price: dec!(100),
            carbon_credit_price: dec!(35),
            fuel_blend_mandate: dec!(7.5),
            current_supplier_count: 3,
            concentration_top_supplier_percentage: dec!(0.40),
        }
    }

    fn run_with(baseline: &StressTestBaseline, params: &StressTestParameters) -> StressTestResults {
        evaluate(baseline, params, &StressConfig::default())
    }

    #[test]
    fn test_default_pressure_components() {
        let r = run_with(&baseline(), &StressTestParameters::default());
        // price 240,000 + supply 1,800 t * 23 = 41,400, offset by 0.5 * 12,000 * 50
        assert_eq!(r.financial_impact, dec!(18600));
        assert_eq!(r.supply_gap_tonnes, dec!(1800));
        assert_eq!(r.alternative_cost_per_tonne, dec!(120));
    }

    #[test]
    fn test_default_is_compliant_at_limits() {
        // Every check sits exactly on its limit, and limits are strict
        let r = run_with(&baseline(), &StressTestParameters::default());
        assert_eq!(r.covenant_status, CovenantStatus::Compliant);
    }

    #[test]
    fn test_risk_score() {
        // 30 + 25*0.2 + 25*0.15 + 20*0.4
        let r = run_with(&baseline(), &StressTestParameters::default());
        assert_eq!(r.risk_score, dec!(46.75));
    }

    #[test]
    fn test_single_violation_is_warning() {
        let mut b = baseline();
        b.concentration_top_supplier_percentage = dec!(0.55);
        let r = run_with(&b, &StressTestParameters::default());
        assert_eq!(r.covenant_status, CovenantStatus::Warning);
    }

    #[test]
    fn test_two_violations_is_breach() {
        let mut b = baseline();
        b.concentration_top_supplier_percentage = dec!(0.55);
        let params = StressTestParameters {
            price_shock_percentage: Some(dec!(30)),
            ..Default::default()
        };
        let r = run_with(&b, &params);
        assert_eq!(r.covenant_status, CovenantStatus::Breach);
    }

    #[test]
    fn test_checks_report_actuals() {
        let checks = covenant_checks(&baseline(), dec!(0.30), dec!(0.20), &StressConfig::default());
        assert_eq!(checks.len(), 3);
        assert!(!checks[0].violated);
        assert!(checks[1].violated);
        assert!(checks[2].violated);
        assert_eq!(status_from_checks(&checks), CovenantStatus::Breach);
    }

    #[test]
    fn test_violated_covenants_lists_only_failures() {
        let mut b = baseline();
        b.concentration_top_supplier_percentage = dec!(0.55);
        let params = StressTestParameters::default();
        let failed = violated_covenants(&b, &params, &StressConfig::default());
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].covenant, "Top supplier concentration");
        assert_eq!(failed[0].actual, dec!(0.55));
        assert_eq!(failed[0].limit, dec!(0.40));
    }

    #[test]
    fn test_fixed_cost_mitigations() {
        let small = run_with(&baseline(), &StressTestParameters::default());
        let mut big_baseline = baseline();
        big_baseline.annual_volume_required = dec!(500000);
        let big = run_with(&big_baseline, &StressTestParameters::default());
        assert_eq!(small.mitigation_options, big.mitigation_options);
        assert_eq!(small.mitigation_options[0].cost_impact, dec!(-50000));
        assert_eq!(small.mitigation_options[1].cost_impact, dec!(-100000));
    }

    #[test]
    fn test_carbon_sensitivity() {
        let r = run_with(&baseline(), &StressTestParameters::default());
        let carbon = &r.sensitivity_analysis[2];
        assert_eq!(carbon.variable, "carbon_price_increase");
        assert_eq!(carbon.base_value, dec!(50));
        assert_eq!(carbon.impact_per_unit, dec!(6000));
    }
}
