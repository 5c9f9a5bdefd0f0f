use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::PlannerError;
use crate::types::*;
use crate::PlannerResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,
    pub asset_class: String,
    pub invested: Money,
    pub current_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassSummary {
    pub invested: Money,
    pub current_value: Money,
    pub gain: Money,
    /// Share of the portfolio's current value
    pub weight_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingReturn {
    pub name: String,
    pub gain: Money,
    pub gain_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub holding_count: usize,
    pub total_invested: Money,
    pub total_current_value: Money,
    pub total_gain: Money,
    pub total_gain_pct: Percent,
    pub by_asset_class: BTreeMap<String, AssetClassSummary>,
    pub best_holding: HoldingReturn,
    pub worst_holding: HoldingReturn,
}

fn holding_return(h: &Holding) -> HoldingReturn {
    let gain = h.current_value - h.invested;
    HoldingReturn {
        name: h.name.clone(),
        gain: round_money(gain),
        gain_pct: round_percent(return_percentage(gain, h.invested)),
    }
}

/// Aggregate holdings into totals and an asset-class breakdown.
pub fn summarise_portfolio(
    input: &PortfolioInput,
) -> PlannerResult<ComputationOutput<PortfolioSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.holdings.is_empty() {
        return Err(PlannerError::InsufficientData("Portfolio has no holdings".into()));
    }
    for (i, h) in input.holdings.iter().enumerate() {
        if h.invested < Decimal::ZERO {
            return Err(PlannerError::invalid(
                &format!("holdings[{i}].invested"),
                "Invested amount cannot be negative",
            ));
        }
        if h.current_value < Decimal::ZERO {
            return Err(PlannerError::invalid(
                &format!("holdings[{i}].current_value"),
                "Current value cannot be negative",
            ));
        }
        if h.invested.is_zero() {
            warnings.push(format!("Holding '{}' has no invested amount; its return is reported as 0%", h.name));
        }
    }

    let total_invested: Money = input.holdings.iter().map(|h| h.invested).sum();
    let total_value: Money = input.holdings.iter().map(|h| h.current_value).sum();
    let total_gain = total_value - total_invested;

    let mut by_class: BTreeMap<String, AssetClassSummary> = BTreeMap::new();
    for h in &input.holdings {
        let entry = by_class
            .entry(h.asset_class.clone())
            .or_insert_with(|| AssetClassSummary {
                invested: Decimal::ZERO,
                current_value: Decimal::ZERO,
                gain: Decimal::ZERO,
                weight_pct: Decimal::ZERO,
            });
        entry.invested += h.invested;
        entry.current_value += h.current_value;
        entry.gain += h.current_value - h.invested;
    }
    for summary in by_class.values_mut() {
        summary.weight_pct = if total_value.is_zero() {
            Decimal::ZERO
        } else {
            round_percent(summary.current_value / total_value * dec!(100))
        };
    }

    let returns: Vec<HoldingReturn> = input.holdings.iter().map(holding_return).collect();
    let mut best = &returns[0];
    let mut worst = &returns[0];
    for r in &returns[1..] {
        if r.gain_pct > best.gain_pct {
            best = r;
        }
        if r.gain_pct < worst.gain_pct {
            worst = r;
        }
    }

    let output = PortfolioSummary {
        holding_count: input.holdings.len(),
        total_invested: round_money(total_invested),
        total_current_value: round_money(total_value),
        total_gain: round_money(total_gain),
        total_gain_pct: round_percent(return_percentage(total_gain, total_invested)),
        best_holding: best.clone(),
        worst_holding: worst.clone(),
        by_asset_class: by_class,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio aggregation (totals and asset-class weights by current value)",
        &serde_json::json!({ "holdings": input.holdings.len() }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn holding(name: &str, class: &str, invested: Decimal, value: Decimal) -> Holding {
        Holding {
            name: name.into(),
            asset_class: class.into(),
            invested,
            current_value: value,
        }
    }

    fn sample() -> PortfolioInput {
        PortfolioInput {
            holdings: vec![
                holding("Index fund", "equity", dec!(100000), dec!(150000)),
                holding("Small cap", "equity", dec!(50000), dec!(40000)),
                holding("Bond fund", "debt", dec!(80000), dec!(88000)),
                holding("Gold ETF", "gold", dec!(20000), dec!(22000)),
            ],
        }
    }

    #[test]
    fn test_totals() {
        let out = summarise_portfolio(&sample()).unwrap().result;
        assert_eq!(out.total_invested, dec!(250000));
        assert_eq!(out.total_current_value, dec!(300000));
        assert_eq!(out.total_gain, dec!(50000));
        assert_eq!(out.total_gain_pct, dec!(20));
    }

    #[test]
    fn test_asset_class_breakdown() {
        let out = summarise_portfolio(&sample()).unwrap().result;
        let equity = &out.by_asset_class["equity"];
        assert_eq!(
            equity,
            &AssetClassSummary {
                invested: dec!(150000),
                current_value: dec!(190000),
                gain: dec!(40000),
                weight_pct: dec!(63.33),
            }
        );
        let classes: Vec<&str> = out.by_asset_class.keys().map(|k| k.as_str()).collect();
        assert_eq!(classes, vec!["debt", "equity", "gold"]);
    }

    #[test]
    fn test_best_and_worst() {
        let out = summarise_portfolio(&sample()).unwrap().result;
        assert_eq!(out.best_holding.name, "Index fund");
        assert_eq!(out.worst_holding.name, "Small cap");
        assert_eq!(out.worst_holding.gain_pct, dec!(-20));
    }

    #[test]
    fn test_empty_rejected() {
        let input = PortfolioInput { holdings: vec![] };
        assert!(matches!(
            summarise_portfolio(&input),
            Err(PlannerError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_negative_value_rejected() {
        let mut input = sample();
        input.holdings[2].current_value = dec!(-1);
        let err = summarise_portfolio(&input).unwrap_err();
        assert!(err.to_string().contains("holdings[2].current_value"));
    }
}
