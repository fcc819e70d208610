use rust_decimal::Decimal;

use crate::config::StressConfig;

use super::model::{
    bounded_score, CovenantStatus, ScenarioType, StressTestBaseline, StressTestParameters,
    StressTestResults,
};
use super::{price_shock, regulatory, supply_disruption};

/// Sub-scenarios a custom run will fire, in run order. Each maps 1:1 to a
/// driver parameter being present.
pub fn active_components(params: &StressTestParameters) -> Vec<ScenarioType> {
    let mut components = Vec::with_capacity(3);
    if params.price_shock_percentage.is_some() {
        components.push(ScenarioType::PriceShock);
    }
    if params.supply_reduction_percentage.is_some() {
        components.push(ScenarioType::SupplyDisruption);
    }
    if params.carbon_price_increase.is_some() || params.regulatory_threshold_change.is_some() {
        components.push(ScenarioType::Regulatory);
    }
    components
}

/// Run whichever sub-scenarios have their drivers set and aggregate them.
///
/// The weighted risk score is not renormalised when a component is
/// skipped, so a partial composite scores lower than any full one with the
/// same component scores. The covenant status is derived afresh from the
/// aggregate impact relative to annual spend.
pub fn evaluate(
    baseline: &StressTestBaseline,
    params: &StressTestParameters,
    config: &StressConfig,
) -> StressTestResults {
    let weights = &config.composite;

    let mut financial_impact = Decimal::ZERO;
    let mut supply_gap_tonnes = Decimal::ZERO;
    let mut weighted_risk = Decimal::ZERO;
    let mut alternative_cost: Option<Decimal> = None;
    let mut mitigation_options = Vec::new();
    let mut sensitivity_analysis = Vec::new();

    for component in active_components(params) {
        let (sub, weight) = match component {
            ScenarioType::PriceShock => (
                price_shock::evaluate(baseline, params, config),
                weights.price_weight,
            ),
            ScenarioType::SupplyDisruption => (
                supply_disruption::evaluate(baseline, params, config),
                weights.supply_weight,
            ),
            _ => (
                regulatory::evaluate(baseline, params, config),
                weights.regulatory_weight,
            ),
        };

        financial_impact += sub.financial_impact;
        supply_gap_tonnes += sub.supply_gap_tonnes;
        weighted_risk += sub.risk_score * weight;
        alternative_cost = Some(match alternative_cost {
            Some(current) => current.max(sub.alternative_cost_per_tonne),
            None => sub.alternative_cost_per_tonne,
        });
        mitigation_options.extend(sub.mitigation_options.into_iter().take(2));
        sensitivity_analysis.extend(sub.sensitivity_analysis);
    }

    let annual_spend = baseline.annual_spend();
    let covenant_status = if annual_spend.is_zero() {
        CovenantStatus::Compliant
    } else {
        CovenantStatus::from_thresholds(
            financial_impact.abs() / annual_spend,
            weights.warning_ratio,
            weights.breach_ratio,
        )
    };

    StressTestResults {
        financial_impact,
        supply_gap_tonnes,
        alternative_cost_per_tonne: alternative_cost.unwrap_or(baseline.current_average_price),
        risk_score: bounded_score(weighted_risk),
        covenant_status,
        mitigation_options,
        sensitivity_analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

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

    fn run(params: &StressTestParameters) -> StressTestResults {
        evaluate(&baseline(), params, &StressConfig::default())
    }

    #[test]
    fn test_no_drivers_runs_nothing() {
        let r = run(&StressTestParameters::default());
        assert_eq!(r.financial_impact, Decimal::ZERO);
        assert_eq!(r.risk_score, Decimal::ZERO);
        assert_eq!(r.covenant_status, CovenantStatus::Compliant);
        assert_eq!(r.alternative_cost_per_tonne, dec!(100));
        assert!(r.mitigation_options.is_empty());
        assert!(r.sensitivity_analysis.is_empty());
    }

    #[test]
    fn test_duration_alone_is_not_a_driver() {
        let params = StressTestParameters {
            duration_months: Some(dec!(12)),
            affected_categories: Some(vec!["straw".into()]),
            ..Default::default()
        };
        assert!(active_components(&params).is_empty());
    }

    #[test]
    fn test_threshold_or_carbon_fires_regulatory() {
        let carbon_only = StressTestParameters {
            carbon_price_increase: Some(dec!(20)),
            ..Default::default()
        };
        assert_eq!(active_components(&carbon_only), vec![ScenarioType::Regulatory]);
        let threshold_only = StressTestParameters {
            regulatory_threshold_change: Some(dec!(-5)),
            ..Default::default()
        };
        assert_eq!(
            active_components(&threshold_only),
            vec![ScenarioType::Regulatory]
        );
    }

    #[test]
    fn test_price_only_matches_price_shock() {
        let params = StressTestParameters {
            price_shock_percentage: Some(dec!(30)),
            duration_months: Some(dec!(12)),
            ..Default::default()
        };
        let composite = run(&params);
        let single = price_shock::evaluate(&baseline(), &params, &StressConfig::default());
        assert_eq!(composite.financial_impact, single.financial_impact);
        assert_eq!(composite.supply_gap_tonnes, Decimal::ZERO);
        assert_eq!(composite.mitigation_options.len(), 2);
        assert_eq!(composite.sensitivity_analysis, single.sensitivity_analysis);
    }

    #[test]
    fn test_weights_not_renormalised_for_single_component() {
        // Known quirk: a lone price shock only contributes 30% of its score
        let params = StressTestParameters {
            price_shock_percentage: Some(dec!(30)),
            duration_months: Some(dec!(12)),
            ..Default::default()
        };
        let r = run(&params);
        // price shock score 38 * 0.30
        assert_eq!(r.risk_score, dec!(11.4));
    }

    #[test]
    fn test_all_three_components_aggregate() {
        let params = StressTestParameters {
            price_shock_percentage: Some(dec!(30)),
            supply_reduction_percentage: Some(dec!(25)),
            regulatory_threshold_change: Some(dec!(-5)),
            carbon_price_increase: Some(Decimal::ZERO),
            duration_months: Some(dec!(6)),
            ..Default::default()
        };
        let r = run(&params);
        // price: -1,000 * 6 * 30 = -180,000
        // supply: -(1,500 t * 23) = -34,500
        // regulatory: -36,000
        assert_eq!(r.financial_impact, dec!(-250500));
        // supply gap 1,500 + non-compliant 1,200
        assert_eq!(r.supply_gap_tonnes, dec!(2700));
        assert_eq!(r.mitigation_options.len(), 6);
        assert_eq!(r.sensitivity_analysis.len(), 9);
        // Highest alternative: 130 from price shock and regulatory
        assert_eq!(r.alternative_cost_per_tonne, dec!(130));
    }

    #[test]
    fn test_covenant_from_impact_ratio() {
        // 180,000 / 1,200,000 = 0.15 -> warning
        let params = StressTestParameters {
            price_shock_percentage: Some(dec!(30)),
            duration_months: Some(dec!(6)),
            ..Default::default()
        };
        assert_eq!(run(&params).covenant_status, CovenantStatus::Warning);

        // 360,000 / 1,200,000 = 0.30 -> breach, even though the price shock
        // evaluator alone would only warn
        let params = StressTestParameters {
            price_shock_percentage: Some(dec!(30)),
            duration_months: Some(dec!(12)),
            ..Default::default()
        };
        assert_eq!(run(&params).covenant_status, CovenantStatus::Breach);
    }

    #[test]
    fn test_zero_spend_is_compliant() {
        let mut b = baseline();
        b.current_average_price = Decimal::ZERO;
        let params = StressTestParameters {
            regulatory_threshold_change: Some(dec!(-10)),
            carbon_price_increase: Some(dec!(100)),
            ..Default::default()
        };
        let r = evaluate(&b, &params, &StressConfig::default());
        assert_eq!(r.covenant_status, CovenantStatus::Compliant);
    }
}
