#![cfg(all(feature = "scenarios", feature = "risk_profile", feature = "goals", feature = "portfolio"))]

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sip_planner_core::goals::{self, GoalInput, GoalKind};
use sip_planner_core::lump_sum::LumpSumInput;
use sip_planner_core::risk_profile::allocation::{self, AllocationInput};
use sip_planner_core::risk_profile::questionnaire::{self, RiskAnswers};
use sip_planner_core::risk_profile::RiskProfile;
use sip_planner_core::scenarios::{self, Scenario, ScenarioKind, ScenariosInput};
use sip_planner_core::sip::annuity::SipInput;

// ===========================================================================
// Questionnaire -> allocation
// ===========================================================================

#[test]
fn test_profile_feeds_allocation() {
    let answers = RiskAnswers {
        age: 0,
        horizon: 3,
        income_stability: 2,
        experience: 2,
        loss_reaction: 3,
        objective: 3,
    };
    let profile = questionnaire::assess_risk_profile(&answers).unwrap().result;
    assert_eq!(profile.profile, RiskProfile::Aggressive);

    let rec = allocation::recommend_allocation(&AllocationInput {
        profile: profile.profile,
        age: Some(25),
        horizon_years: Some(20),
        monthly_investment: Some(dec!(20000)),
    })
    .unwrap()
    .result;
    // Equity already sits at the age-25 cap of 75%, so no long-horizon shift
    assert_eq!(rec.recommended_allocation.equity, dec!(75));
    assert!(rec.adjustments.is_empty());
    assert_eq!(rec.recommended_allocation.total(), dec!(100));
    let split = rec.monthly_split.unwrap();
    assert_eq!(split.equity + split.debt + split.gold + split.cash, dec!(20000));
}

#[test]
fn test_allocation_json_round_trip_keeps_profile() {
    let json = r#"{"profile":"Conservative"}"#;
    let input: AllocationInput = serde_json::from_str(json).unwrap();
    let out = allocation::recommend_allocation(&input).unwrap().result;
    assert_eq!(out.profile, RiskProfile::Conservative);
    assert_eq!(out.recommended_allocation.debt, dec!(50));
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_scenarios_mixed() {
    let input = ScenariosInput {
        scenarios: vec![
            Scenario {
                name: "monthly".into(),
                kind: ScenarioKind::Sip(SipInput {
                    monthly_contribution: dec!(5000),
                    years: 10,
                    annual_return_pct: dec!(12),
                }),
            },
            Scenario {
                name: "upfront".into(),
                kind: ScenarioKind::LumpSum(LumpSumInput {
                    principal: dec!(100000),
                    years: 5,
                    annual_return_pct: dec!(10),
                }),
            },
        ],
    };
    let out = scenarios::run_scenarios(&input).unwrap().result;
    assert_eq!(out.results.len(), 2);
    assert_eq!(out.summary.best_scenario, "monthly");
    assert_eq!(out.summary.worst_scenario, "upfront");
    assert_eq!(out.summary.total_maturity_value, dec!(1322746.38));
}

// ===========================================================================
// Goals
// ===========================================================================

#[test]
fn test_retirement_goal() {
    let out = goals::plan_goal(&GoalInput {
        kind: GoalKind::Retirement,
        name: Some("Retire at 60".into()),
        target_today: dec!(10000000),
        years: 25,
        expected_return_pct: dec!(12),
        inflation_pct: None,
        current_savings: Some(dec!(500000)),
    })
    .unwrap()
    .result;
    assert_eq!(out.goal, "Retire at 60");
    assert_eq!(out.inflation_pct, dec!(6));
    assert!(out.required_monthly_sip > Decimal::ZERO);
    assert!(out.required_lump_sum_today > Decimal::ZERO);
    assert!(out.inflation_adjusted_target > dec!(10000000));
}
