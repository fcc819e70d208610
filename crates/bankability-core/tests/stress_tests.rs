use bankability_core::stress_testing::{
    generate_default_baseline, run_custom_scenario, run_price_shock_scenario, run_stress_test,
    CovenantStatus, PartialBuyerData, ScenarioType, StressTestBaseline, StressTestParameters,
};
use bankability_core::templates::get_scenario_templates;
use bankability_core::{BankabilityError, StressConfig};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn pellet_buyer() -> StressTestBaseline {
    // Mid-size pellet boiler operator: 12kt/yr at 100/t, three suppliers
    StressTestBaseline {
        annual_volume_required: dec!(12000),
        current_average_price: dec!(100),
        carbon_credit_price: dec!(35),
        fuel_blend_mandate: dec!(7.5),
        current_supplier_count: 3,
        concentration_top_supplier_percentage: dec!(0.40),
    }
}

fn shock(pct: Decimal, months: Decimal) -> StressTestParameters {
    StressTestParameters {
        price_shock_percentage: Some(pct),
        duration_months: Some(months),
        ..Default::default()
    }
}

// ===========================================================================
// Default-parameter bounds
// ===========================================================================

#[test]
fn test_defaults_produce_bounded_results_for_every_type() {
    let baselines = [
        pellet_buyer(),
        generate_default_baseline(&PartialBuyerData::default()),
        StressTestBaseline {
            concentration_top_supplier_percentage: Decimal::ONE,
            current_supplier_count: 1,
            ..pellet_buyer()
        },
    ];
    for b in &baselines {
        for t in ScenarioType::ALL {
            let out = run_stress_test(t, b, &StressTestParameters::default()).unwrap();
            let r = &out.result;
            assert!(
                r.risk_score >= Decimal::ZERO && r.risk_score <= dec!(100),
                "{t}: risk score {} out of range",
                r.risk_score
            );
            assert!(r.supply_gap_tonnes >= Decimal::ZERO);
        }
    }
}

// ===========================================================================
// Price shock
// ===========================================================================

#[test]
fn test_price_shock_determinism() {
    let out = run_price_shock_scenario(&pellet_buyer(), &shock(dec!(30), dec!(12))).unwrap();
    assert_eq!(out.result.financial_impact, dec!(-360000));

    let again = run_price_shock_scenario(&pellet_buyer(), &shock(dec!(30), dec!(12))).unwrap();
    assert_eq!(out.result, again.result);
}

#[test]
fn test_zero_shock_is_free_for_any_duration() {
    for months in [dec!(0), dec!(1), dec!(6), dec!(12), dec!(36)] {
        let out = run_price_shock_scenario(&pellet_buyer(), &shock(Decimal::ZERO, months)).unwrap();
        assert_eq!(out.result.financial_impact, Decimal::ZERO);
    }
}

#[test]
fn test_covenant_severity_monotonic_in_shock() {
    let mut previous = CovenantStatus::Compliant;
    let mut pct = Decimal::ZERO;
    while pct <= dec!(100) {
        let status = run_price_shock_scenario(&pellet_buyer(), &shock(pct, dec!(12)))
            .unwrap()
            .result
            .covenant_status;
        assert!(status >= previous, "severity dropped at {pct}%");
        previous = status;
        pct += dec!(2.5);
    }
    assert_eq!(previous, CovenantStatus::Breach);
}

// ===========================================================================
// Composite
// ===========================================================================

#[test]
fn test_composite_with_only_price_driver_matches_price_shock() {
    let params = shock(dec!(30), dec!(12));
    let composite = run_custom_scenario(&pellet_buyer(), &params).unwrap();
    let single = run_price_shock_scenario(&pellet_buyer(), &params).unwrap();
    assert_eq!(
        composite.result.financial_impact,
        single.result.financial_impact
    );
}

#[test]
fn test_composite_risk_weights_not_renormalised() {
    // Known quirk: with only the price component firing, the composite
    // score is 30% of the price shock score rather than all of it.
    let params = shock(dec!(30), dec!(12));
    let composite = run_custom_scenario(&pellet_buyer(), &params).unwrap();
    let single = run_price_shock_scenario(&pellet_buyer(), &params).unwrap();
    assert_eq!(
        composite.result.risk_score,
        single.result.risk_score * dec!(0.30)
    );
    assert!(composite
        .warnings
        .iter()
        .any(|w| w.contains("not renormalised")));
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_negative_duration_is_a_validation_error() {
    let err = run_price_shock_scenario(&pellet_buyer(), &shock(dec!(30), dec!(-6))).unwrap_err();
    match err {
        BankabilityError::InvalidInput { field, .. } => {
            assert_eq!(field, "parameters.duration_months")
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_negative_volume_is_a_validation_error() {
    let b = StressTestBaseline {
        annual_volume_required: dec!(-12000),
        ..pellet_buyer()
    };
    for t in ScenarioType::ALL {
        assert!(run_stress_test(t, &b, &StressTestParameters::default()).is_err());
    }
}

#[test]
fn test_oversized_baseline_is_rejected_not_overflowed() {
    let b = StressTestBaseline {
        annual_volume_required: Decimal::from_scientific("1e15").unwrap(),
        current_average_price: Decimal::from_scientific("1e14").unwrap(),
        ..pellet_buyer()
    };
    let params = StressTestParameters {
        price_shock_percentage: Some(dec!(30)),
        ..Default::default()
    };
    let err = run_stress_test(ScenarioType::Custom, &b, &params).unwrap_err();
    match err {
        BankabilityError::InvalidInput { field, .. } => {
            assert_eq!(field, "baseline.annual_volume_required")
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_huge_duration_is_rejected_not_overflowed() {
    let params = shock(dec!(30), Decimal::from_scientific("1e26").unwrap());
    let err = run_stress_test(ScenarioType::PriceShock, &pellet_buyer(), &params).unwrap_err();
    match err {
        BankabilityError::InvalidInput { field, .. } => {
            assert_eq!(field, "parameters.duration_months")
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_inputs_at_every_limit_still_evaluate() {
    let config = StressConfig::default();
    let limits = &config.limits;
    let b = StressTestBaseline {
        annual_volume_required: limits.max_annual_volume,
        current_average_price: limits.max_price_per_tonne,
        carbon_credit_price: limits.max_price_per_tonne,
        fuel_blend_mandate: dec!(100),
        current_supplier_count: u32::MAX,
        concentration_top_supplier_percentage: Decimal::ONE,
    };
    let params = StressTestParameters {
        price_shock_percentage: Some(config.price_shock.max_shock_percentage),
        supply_reduction_percentage: Some(dec!(100)),
        affected_categories: None,
        carbon_price_increase: Some(limits.max_carbon_price_move),
        regulatory_threshold_change: Some(-limits.max_threshold_change),
        duration_months: Some(limits.max_duration_months),
    };
    for t in ScenarioType::ALL {
        let out = run_stress_test(t, &b, &params).unwrap();
        assert!(out.result.risk_score <= dec!(100));
        assert!(out.warnings.iter().all(|w| !w.contains("clamped")));
    }
}

// ===========================================================================
// Templates
// ===========================================================================

#[test]
fn test_template_catalogue_integrity() {
    let templates = get_scenario_templates();
    assert!(!templates.is_empty());
    for t in &templates {
        assert!(ScenarioType::ALL.contains(&t.scenario_type));
        let keys = t.parameters.present_keys();
        assert!(!keys.is_empty());
        assert!(keys
            .iter()
            .all(|k| t.scenario_type.parameter_keys().contains(k)));
    }
}

#[test]
fn test_every_template_runs_cleanly_on_default_baseline() {
    let b = generate_default_baseline(&PartialBuyerData::default());
    for t in get_scenario_templates() {
        let out = run_stress_test(t.scenario_type, &b, &t.parameters).unwrap();
        assert!(
            out.warnings.iter().all(|w| !w.contains("clamped")),
            "{}: {:?}",
            t.name,
            out.warnings
        );
    }
}

// ===========================================================================
// Serialisation boundary
// ===========================================================================

#[test]
fn test_request_from_json() {
    let baseline: StressTestBaseline = serde_json::from_str(
        r#"{
            "annual_volume_required": "12000",
            "current_average_price": 100,
            "carbon_credit_price": "35",
            "fuel_blend_mandate": "7.5",
            "current_supplier_count": 3,
            "concentration_top_supplier_percentage": "0.4"
        }"#,
    )
    .unwrap();
    let params: StressTestParameters =
        serde_json::from_str(r#"{"price_shock_percentage": "30"}"#).unwrap();
    let scenario: ScenarioType = serde_json::from_str(r#""price_shock""#).unwrap();

    let out = run_stress_test(scenario, &baseline, &params).unwrap();
    assert_eq!(out.result.financial_impact, dec!(-360000));

    let v = serde_json::to_value(&out).unwrap();
    assert_eq!(v["result"]["covenant_status"], "warning");
    assert_eq!(v["result"]["mitigation_options"].as_array().unwrap().len(), 4);
}
