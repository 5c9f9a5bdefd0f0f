use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlannerError;
use crate::lump_sum;
use crate::sip::annuity::{return_assumption_warnings, validate_positive, validate_return_pct, validate_years};
use crate::sip::inverse::required_contribution;
use crate::time_value::monthly_rate_from_annual_pct;
use crate::types::*;
use crate::PlannerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Retirement,
    Education,
    Home,
    Wedding,
    Emergency,
    Vacation,
    Custom,
}

impl GoalKind {
    /// Typical cost inflation for the goal, in percent a year.
    pub fn default_inflation_pct(&self) -> Percent {
        match self {
            GoalKind::Education => dec!(10),
            GoalKind::Home => dec!(7),
            GoalKind::Retirement
            | GoalKind::Wedding
            | GoalKind::Emergency
            | GoalKind::Vacation
            | GoalKind::Custom => dec!(6),
        }
    }

    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            GoalKind::Retirement => &[
                "Start early; the last decade of compounding does most of the work",
                "Shift gradually from equity to debt in the final 5 years",
                "Account for healthcare costs rising faster than general inflation",
            ],
            GoalKind::Education => &[
                "Education costs have historically outpaced general inflation",
                "Move the corpus to debt funds 2-3 years before admission",
            ],
            GoalKind::Home => &[
                "Plan the down payment separately from the loan EMI",
                "Park the corpus in low-volatility funds as the purchase date nears",
            ],
            GoalKind::Wedding => &[
                "Keep the horizon realistic and review the budget every year",
            ],
            GoalKind::Emergency => &[
                "Target 6 months of expenses",
                "Use liquid funds or sweep deposits; avoid equity for this goal",
            ],
            GoalKind::Vacation => &[
                "Short goals suit recurring deposits or liquid funds",
            ],
            GoalKind::Custom => &["Review the target and return assumptions every year"],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalInput {
    pub kind: GoalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cost of the goal in today's money
    pub target_today: Money,
    pub years: u32,
    pub expected_return_pct: Percent,
    /// Overrides the goal's default inflation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_pct: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_savings: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPlanOutput {
    pub goal: String,
    pub inflation_pct: Percent,
    pub inflation_adjusted_target: Money,
    pub current_savings_future_value: Money,
    pub shortfall: Money,
    pub required_monthly_sip: Money,
    pub required_lump_sum_today: Money,
    pub total_sip_investment: Money,
    pub funded: bool,
    pub tips: Vec<String>,
}

/// Plan a financial goal: inflate the target, credit existing savings, and
/// solve the shortfall as both a monthly SIP and a lump sum invested today.
pub fn plan_goal(input: &GoalInput) -> PlannerResult<ComputationOutput<GoalPlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_positive("target_today", input.target_today)?;
    validate_years("years", input.years)?;
    validate_return_pct("expected_return_pct", input.expected_return_pct)?;
    return_assumption_warnings(input.expected_return_pct, &mut warnings);

    let inflation_pct = input
        .inflation_pct
        .unwrap_or_else(|| input.kind.default_inflation_pct());
    if inflation_pct < Decimal::ZERO || inflation_pct > dec!(50) {
        return Err(PlannerError::invalid("inflation_pct", "Inflation must be between 0% and 50%"));
    }
    let savings = input.current_savings.unwrap_or(Decimal::ZERO);
    if savings < Decimal::ZERO {
        return Err(PlannerError::invalid("current_savings", "Current savings cannot be negative"));
    }
    if inflation_pct >= input.expected_return_pct {
        warnings.push("Expected return does not beat inflation; the goal loses real value".into());
    }

    let target = lump_sum::future_value(input.target_today, input.years, inflation_pct)?;
    let savings_fv = lump_sum::future_value(savings, input.years, input.expected_return_pct)?;
    let shortfall = target - savings_fv;

    let (sip, lump, funded) = if shortfall <= Decimal::ZERO {
        warnings.push("Current savings already cover the goal".into());
        (Decimal::ZERO, Decimal::ZERO, true)
    } else {
        let months = input.years * 12;
        let sip = required_contribution(
            shortfall,
            months,
            monthly_rate_from_annual_pct(input.expected_return_pct),
        )?;
        let lump = lump_sum::required_principal(shortfall, input.years, input.expected_return_pct)?;
        (sip, lump, false)
    };

    let goal = input
        .name
        .clone()
        .unwrap_or_else(|| format!("{:?}", input.kind));
    log::debug!("goal '{goal}': target {target}, shortfall {shortfall}, sip {sip}");

    let output = GoalPlanOutput {
        goal,
        inflation_pct,
        inflation_adjusted_target: round_money(target),
        current_savings_future_value: round_money(savings_fv),
        shortfall: round_money(shortfall.max(Decimal::ZERO)),
        required_monthly_sip: round_money(sip),
        required_lump_sum_today: round_money(lump),
        total_sip_investment: round_money(sip * Decimal::from(input.years * 12)),
        funded,
        tips: input.kind.tips().iter().map(|s| s.to_string()).collect(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Goal plan (inflated target, SIP and lump-sum requirements)",
        &serde_json::json!({
            "kind": input.kind,
            "years": input.years,
            "expected_return_pct": input.expected_return_pct.to_string(),
            "inflation_pct": inflation_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(kind: GoalKind) -> GoalInput {
        GoalInput {
            kind,
            name: None,
            target_today: dec!(1000000),
            years: 10,
            expected_return_pct: dec!(12),
            inflation_pct: None,
            current_savings: None,
        }
    }

    #[test]
    fn test_zero_inflation_matches_required_sip() {
        let mut input = goal(GoalKind::Custom);
        input.target_today = dec!(1161695.38);
        input.inflation_pct = Some(Decimal::ZERO);
        let out = plan_goal(&input).unwrap().result;
        assert_eq!(out.inflation_adjusted_target, dec!(1161695.38));
        assert!((out.required_monthly_sip - dec!(5000)).abs() <= dec!(0.01));
        assert!(!out.funded);
    }

    #[test]
    fn test_default_inflation_is_applied() {
        let out = plan_goal(&goal(GoalKind::Education)).unwrap().result;
        assert_eq!(out.inflation_pct, dec!(10));
        // 1,000,000 * 1.1^10
        assert_eq!(out.inflation_adjusted_target, dec!(2593742.46));
    }

    #[test]
    fn test_lump_sum_requirement_discounts_shortfall() {
        let mut input = goal(GoalKind::Custom);
        input.inflation_pct = Some(dec!(10));
        input.expected_return_pct = dec!(10);
        input.years = 5;
        let out = plan_goal(&input).unwrap().result;
        // Inflation equals return, so today's lump sum equals today's cost
        assert_eq!(out.required_lump_sum_today, dec!(1000000));
    }

    #[test]
    fn test_existing_savings_reduce_requirement() {
        let base = plan_goal(&goal(GoalKind::Home)).unwrap().result;
        let mut input = goal(GoalKind::Home);
        input.current_savings = Some(dec!(200000));
        let with_savings = plan_goal(&input).unwrap().result;
        assert!(with_savings.required_monthly_sip < base.required_monthly_sip);
        assert!(with_savings.shortfall < base.shortfall);
    }

    #[test]
    fn test_already_funded() {
        let mut input = goal(GoalKind::Vacation);
        input.current_savings = Some(dec!(5000000));
        let out = plan_goal(&input).unwrap();
        assert!(out.result.funded);
        assert_eq!(out.result.required_monthly_sip, Decimal::ZERO);
        assert_eq!(out.result.shortfall, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("already cover")));
    }

    #[test]
    fn test_zero_return_warns_about_inflation() {
        let mut input = goal(GoalKind::Education);
        input.expected_return_pct = Decimal::ZERO;
        let out = plan_goal(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("does not beat inflation")));
        // With no growth the SIP simply spreads the inflated target over the months
        assert_eq!(out.result.required_monthly_sip, dec!(21614.52));
    }

    #[test]
    fn test_invalid_inflation_rejected() {
        let mut input = goal(GoalKind::Custom);
        input.inflation_pct = Some(dec!(-1));
        assert!(plan_goal(&input).is_err());
    }

    #[test]
    fn test_every_goal_has_tips() {
        for kind in [
            GoalKind::Retirement,
            GoalKind::Education,
            GoalKind::Home,
            GoalKind::Wedding,
            GoalKind::Emergency,
            GoalKind::Vacation,
            GoalKind::Custom,
        ] {
            assert!(!kind.tips().is_empty());
        }
    }
}
