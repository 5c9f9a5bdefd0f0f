use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::error::PlannerError;
use crate::lump_sum::{self, LumpSumInput, Strategy};
use crate::sip::annuity::{self, SipInput};
use crate::types::*;
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioKind {
    Sip(SipInput),
    LumpSum(LumpSumInput),
}

/// A named what-if scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub kind: ScenarioKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosInput {
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub strategy: Strategy,
    pub total_invested: Money,
    pub maturity_value: Money,
    pub returns: Money,
    pub return_percentage: Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario_count: usize,
    pub total_invested: Money,
    pub total_maturity_value: Money,
    pub total_returns: Money,
    pub overall_return_percentage: Percent,
    pub best_scenario: String,
    pub worst_scenario: String,
    pub distribution: Vec<ReturnBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosOutput {
    pub results: Vec<ScenarioResult>,
    pub summary: ScenarioSummary,
}

/// Upper bounds (exclusive) of the return-percentage buckets; the last
/// bucket is open-ended.
const BUCKETS: [(&str, Option<Decimal>); 4] = [
    ("< 25%", Some(dec!(25))),
    ("25-50%", Some(dec!(50))),
    ("50-100%", Some(dec!(100))),
    (">= 100%", None),
];

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate one scenario in isolation.
pub fn evaluate_scenario(scenario: &Scenario) -> PlannerResult<ScenarioResult> {
    match &scenario.kind {
        ScenarioKind::Sip(input) => {
            let out = annuity::calculate_sip(input)?.result;
            Ok(ScenarioResult {
                name: scenario.name.clone(),
                strategy: Strategy::Sip,
                total_invested: out.total_invested,
                maturity_value: out.maturity_value,
                returns: out.returns,
                return_percentage: out.return_percentage,
            })
        }
        ScenarioKind::LumpSum(input) => {
            let out = lump_sum::calculate_lump_sum(input)?.result;
            Ok(ScenarioResult {
                name: scenario.name.clone(),
                strategy: Strategy::LumpSum,
                total_invested: out.principal,
                maturity_value: out.maturity_value,
                returns: out.returns,
                return_percentage: out.return_percentage,
            })
        }
    }
}

fn bucket_index(return_pct: Percent) -> usize {
    BUCKETS
        .iter()
        .position(|(_, upper)| upper.map_or(true, |u| return_pct < u))
        .unwrap_or(BUCKETS.len() - 1)
}

/// Reduce evaluated results into totals, extremes and a return distribution.
/// Ties for best and worst resolve to the earliest scenario.
pub fn summarise(results: &[ScenarioResult]) -> PlannerResult<ScenarioSummary> {
    let first = results
        .first()
        .ok_or_else(|| PlannerError::InsufficientData("At least one scenario is required".into()))?;

    let mut best = first;
    let mut worst = first;
    let mut counts = [0usize; BUCKETS.len()];
    let mut total_invested = Decimal::ZERO;
    let mut total_maturity = Decimal::ZERO;

    for r in results {
        if r.return_percentage > best.return_percentage {
            best = r;
        }
        if r.return_percentage < worst.return_percentage {
            worst = r;
        }
        counts[bucket_index(r.return_percentage)] += 1;
        total_invested += r.total_invested;
        total_maturity += r.maturity_value;
    }

    let total_returns = total_maturity - total_invested;
    Ok(ScenarioSummary {
        scenario_count: results.len(),
        total_invested,
        total_maturity_value: total_maturity,
        total_returns,
        overall_return_percentage: round_percent(return_percentage(total_returns, total_invested)),
        best_scenario: best.name.clone(),
        worst_scenario: worst.name.clone(),
        distribution: BUCKETS
            .iter()
            .zip(counts)
            .map(|((label, _), count)| ReturnBucket {
                label: (*label).to_string(),
                count,
            })
            .collect(),
    })
}

/// Evaluate every scenario independently and summarise the set.
pub fn run_scenarios(input: &ScenariosInput) -> PlannerResult<ComputationOutput<ScenariosOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.scenarios.is_empty() {
        return Err(PlannerError::InsufficientData("At least one scenario is required".into()));
    }

    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(input.scenarios.len());
    for (i, scenario) in input.scenarios.iter().enumerate() {
        if scenario.name.trim().is_empty() {
            return Err(PlannerError::invalid(
                &format!("scenarios[{i}].name"),
                "Scenario name cannot be empty",
            ));
        }
        if !seen.insert(scenario.name.as_str()) {
            warnings.push(format!("Duplicate scenario name '{}'", scenario.name));
        }
        let result = evaluate_scenario(scenario)
            .map_err(|e| e.in_context(&format!("scenarios[{i}] ({})", scenario.name)))?;
        results.push(result);
    }

    let summary = summarise(&results)?;
    log::debug!(
        "scenarios: {} evaluated, best '{}', worst '{}'",
        summary.scenario_count,
        summary.best_scenario,
        summary.worst_scenario
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-scenario aggregation (independent evaluation, summary reductions)",
        &serde_json::json!({
            "scenario_count": input.scenarios.len(),
            "ranking": "return_percentage",
            "tie_break": "first in input order",
        }),
        warnings,
        elapsed,
        ScenariosOutput { results, summary },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sip(name: &str, amount: Decimal, years: u32, pct: Decimal) -> Scenario {
        Scenario {
            name: name.into(),
            kind: ScenarioKind::Sip(SipInput {
                monthly_contribution: amount,
                years,
                annual_return_pct: pct,
            }),
        }
    }

    fn lump(name: &str, amount: Decimal, years: u32, pct: Decimal) -> Scenario {
        Scenario {
            name: name.into(),
            kind: ScenarioKind::LumpSum(LumpSumInput {
                principal: amount,
                years,
                annual_return_pct: pct,
            }),
        }
    }

    #[test]
    fn test_results_parallel_to_input() {
        let input = ScenariosInput {
            scenarios: vec![
                sip("a", dec!(5000), 10, dec!(12)),
                lump("b", dec!(100000), 5, dec!(10)),
                sip("c", dec!(1000), 1, Decimal::ZERO),
            ],
        };
        let out = run_scenarios(&input).unwrap().result;
        let names: Vec<&str> = out.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(out.results[1].maturity_value, dec!(161051.00));
        assert_eq!(out.results[2].maturity_value, dec!(12000));
    }

    #[test]
    fn test_summary_totals_and_extremes() {
        let input = ScenariosInput {
            scenarios: vec![
                sip("growth", dec!(5000), 10, dec!(12)),
                lump("one-off", dec!(100000), 5, dec!(10)),
                sip("cash", dec!(1000), 1, Decimal::ZERO),
            ],
        };
        let out = run_scenarios(&input).unwrap().result;
        let s = &out.summary;
        assert_eq!(s.scenario_count, 3);
        assert_eq!(s.total_invested, dec!(712000));
        assert_eq!(s.best_scenario, "growth");
        assert_eq!(s.worst_scenario, "cash");
        assert_eq!(
            s.total_maturity_value,
            out.results.iter().map(|r| r.maturity_value).sum::<Decimal>()
        );
    }

    #[test]
    fn test_distribution_buckets() {
        let input = ScenariosInput {
            scenarios: vec![
                sip("flat", dec!(1000), 1, Decimal::ZERO),
                lump("five", dec!(100000), 5, dec!(10)),
                sip("ten", dec!(5000), 10, dec!(12)),
                lump("doubler", dec!(1000), 10, dec!(10)),
            ],
        };
        let out = run_scenarios(&input).unwrap().result;
        let counts: Vec<usize> = out.summary.distribution.iter().map(|b| b.count).collect();
        // 0%, 61.05%, 93.62%, 159.37%
        assert_eq!(counts, vec![1, 0, 2, 1]);
    }

    #[test]
    fn test_ties_resolve_to_first() {
        let input = ScenariosInput {
            scenarios: vec![
                sip("first", dec!(1000), 5, dec!(8)),
                sip("second", dec!(2000), 5, dec!(8)),
            ],
        };
        let out = run_scenarios(&input).unwrap().result;
        assert_eq!(out.summary.best_scenario, "first");
        assert_eq!(out.summary.worst_scenario, "first");
    }

    #[test]
    fn test_empty_rejected() {
        let input = ScenariosInput { scenarios: vec![] };
        assert!(matches!(
            run_scenarios(&input),
            Err(PlannerError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_invalid_scenario_names_position() {
        let input = ScenariosInput {
            scenarios: vec![
                sip("ok", dec!(1000), 5, dec!(8)),
                sip("bad", Decimal::ZERO, 5, dec!(8)),
            ],
        };
        let err = run_scenarios(&input).unwrap_err();
        assert!(err.to_string().contains("scenarios[1] (bad)"));
    }

    #[test]
    fn test_overflow_in_scenario_stays_overflow() {
        let input = ScenariosInput {
            scenarios: vec![
                sip("ok", dec!(1000), 5, dec!(8)),
                sip("huge", dec!(10000000000000000000000000000), 100, Decimal::ZERO),
            ],
        };
        match run_scenarios(&input).unwrap_err() {
            PlannerError::Overflow { context } => assert!(context.starts_with("scenarios[1] (huge)")),
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn test_invalid_scenario_keeps_field() {
        let input = ScenariosInput {
            scenarios: vec![sip("bad", dec!(1000), 0, dec!(8))],
        };
        match run_scenarios(&input).unwrap_err() {
            PlannerError::InvalidInput { field, .. } => assert_eq!(field, "scenarios[0] (bad).years"),
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn test_duplicate_names_warn() {
        let input = ScenariosInput {
            scenarios: vec![
                sip("same", dec!(1000), 5, dec!(8)),
                lump("same", dec!(1000), 5, dec!(8)),
            ],
        };
        let out = run_scenarios(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_scenario_json_shape() {
        let json = r#"{"name":"x","kind":{"type":"lump_sum","principal":"100000","years":5,"annual_return_pct":"10"}}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        let r = evaluate_scenario(&scenario).unwrap();
        assert_eq!(r.strategy, Strategy::LumpSum);
        assert_eq!(r.maturity_value, dec!(161051.00));
    }
}
