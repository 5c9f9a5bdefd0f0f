use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::RiskProfile;
use crate::error::PlannerError;
use crate::types::*;
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Portfolio split across asset classes, in percent of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub equity: Percent,
    pub debt: Percent,
    pub gold: Percent,
    pub cash: Percent,
}

/// Expected annual return per asset class, in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssetReturns {
    pub equity: Percent,
    pub debt: Percent,
    pub gold: Percent,
    pub cash: Percent,
}

/// Personal circumstances applied on top of a profile's base allocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AllocationAdjustment {
    pub age: u32,
    pub horizon_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationInput {
    pub profile: RiskProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<u32>,
    /// When given, the monthly amount is split across asset classes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_investment: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySplit {
    pub equity: Money,
    pub debt: Money,
    pub gold: Money,
    pub cash: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutput {
    pub profile: RiskProfile,
    pub base_allocation: Allocation,
    pub recommended_allocation: Allocation,
    pub expected_return_pct: Percent,
    pub adjustments: Vec<String>,
    pub instruments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_split: Option<MonthlySplit>,
}

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

pub const EXPECTED_RETURNS: AssetReturns = AssetReturns {
    equity: dec!(12),
    debt: dec!(7),
    gold: dec!(8),
    cash: dec!(4),
};

const CONSERVATIVE: Allocation = Allocation {
    equity: dec!(30),
    debt: dec!(50),
    gold: dec!(10),
    cash: dec!(10),
};

const MODERATE: Allocation = Allocation {
    equity: dec!(55),
    debt: dec!(30),
    gold: dec!(10),
    cash: dec!(5),
};

const AGGRESSIVE: Allocation = Allocation {
    equity: dec!(75),
    debt: dec!(15),
    gold: dec!(5),
    cash: dec!(5),
};

const CONSERVATIVE_INSTRUMENTS: &[&str] = &[
    "Short-duration and banking PSU debt funds",
    "Government bonds and fixed deposits",
    "Large-cap index fund for the equity portion",
    "Gold ETF or sovereign gold bonds",
];

const MODERATE_INSTRUMENTS: &[&str] = &[
    "Nifty 50 / large-cap index funds",
    "Flexi-cap or balanced advantage funds",
    "Corporate bond funds",
    "Gold ETF or sovereign gold bonds",
];

const AGGRESSIVE_INSTRUMENTS: &[&str] = &[
    "Mid-cap and small-cap funds",
    "Flexi-cap funds",
    "International equity fund of funds",
    "Dynamic bond funds for the debt portion",
];

/// Minimum equity share kept after the age cap.
const EQUITY_FLOOR: Decimal = dec!(10);
/// Equity moved to debt when the horizon is short.
const SHORT_HORIZON_SHIFT: Decimal = dec!(20);
/// Equity added from debt for young, long-horizon investors.
const LONG_HORIZON_SHIFT: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Allocation logic
// ---------------------------------------------------------------------------

impl Allocation {
    pub fn total(&self) -> Percent {
        self.equity + self.debt + self.gold + self.cash
    }

    /// Weighted expected return of the allocation, in percent.
    pub fn expected_return_pct(&self, returns: &AssetReturns) -> Percent {
        (self.equity * returns.equity
            + self.debt * returns.debt
            + self.gold * returns.gold
            + self.cash * returns.cash)
            / dec!(100)
    }

    fn split(&self, amount: Money) -> MonthlySplit {
        let share = |pct: Percent| round_money(amount * pct / dec!(100));
        MonthlySplit {
            equity: share(self.equity),
            debt: share(self.debt),
            gold: share(self.gold),
            cash: share(self.cash),
        }
    }
}

/// Static base allocation for a profile.
pub fn base_allocation(profile: RiskProfile) -> &'static Allocation {
    match profile {
        RiskProfile::Conservative => &CONSERVATIVE,
        RiskProfile::Moderate => &MODERATE,
        RiskProfile::Aggressive => &AGGRESSIVE,
    }
}

pub fn instruments(profile: RiskProfile) -> &'static [&'static str] {
    match profile {
        RiskProfile::Conservative => CONSERVATIVE_INSTRUMENTS,
        RiskProfile::Moderate => MODERATE_INSTRUMENTS,
        RiskProfile::Aggressive => AGGRESSIVE_INSTRUMENTS,
    }
}

/// Adjust a base allocation for age and horizon. Returns a new allocation and
/// a note per rule applied; `base` is never modified. Points only move
/// between equity and debt, so the total is preserved.
pub fn optimize_allocation(
    base: &Allocation,
    adjustment: &AllocationAdjustment,
) -> (Allocation, Vec<String>) {
    let mut next = *base;
    let mut notes = Vec::new();

    let cap = (dec!(100) - Decimal::from(adjustment.age)).max(EQUITY_FLOOR);
    if next.equity > cap {
        let excess = next.equity - cap;
        next.equity -= excess;
        next.debt += excess;
        notes.push(format!("Equity capped at {cap}% for age {}", adjustment.age));
    }

    if adjustment.horizon_years < 3 {
        let shift = SHORT_HORIZON_SHIFT.min(next.equity);
        if shift > Decimal::ZERO {
            next.equity -= shift;
            next.debt += shift;
            notes.push(format!("Moved {shift}% from equity to debt for a horizon under 3 years"));
        }
    } else if adjustment.horizon_years >= 10 && adjustment.age < 40 {
        let room = (cap - next.equity).max(Decimal::ZERO);
        let shift = LONG_HORIZON_SHIFT.min(next.debt).min(room);
        if shift > Decimal::ZERO {
            next.equity += shift;
            next.debt -= shift;
            notes.push(format!("Moved {shift}% from debt to equity for a long horizon"));
        }
    }

    (next, notes)
}

/// Recommend an allocation for a risk profile, optionally personalised.
pub fn recommend_allocation(
    input: &AllocationInput,
) -> PlannerResult<ComputationOutput<AllocationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(age) = input.age {
        if age == 0 || age > 120 {
            return Err(PlannerError::invalid("age", "Age must be between 1 and 120"));
        }
    }
    if let Some(amount) = input.monthly_investment {
        if amount <= Decimal::ZERO {
            return Err(PlannerError::invalid("monthly_investment", "monthly_investment must be > 0"));
        }
    }

    let base = *base_allocation(input.profile);
    let (recommended, adjustments) = match (input.age, input.horizon_years) {
        (Some(age), Some(horizon_years)) => {
            optimize_allocation(&base, &AllocationAdjustment { age, horizon_years })
        }
        (None, None) => (base, Vec::new()),
        _ => {
            warnings.push("Both age and horizon_years are needed to personalise; base allocation used".into());
            (base, Vec::new())
        }
    };

    let output = AllocationOutput {
        profile: input.profile,
        base_allocation: base,
        recommended_allocation: recommended,
        expected_return_pct: round_percent(recommended.expected_return_pct(&EXPECTED_RETURNS)),
        adjustments,
        instruments: instruments(input.profile).iter().map(|s| s.to_string()).collect(),
        monthly_split: input.monthly_investment.map(|m| recommended.split(m)),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Static allocation by risk profile with age/horizon adjustment",
        &serde_json::json!({
            "profile": input.profile.to_string(),
            "expected_returns_pct": EXPECTED_RETURNS,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tables_sum_to_100() {
        for p in [RiskProfile::Conservative, RiskProfile::Moderate, RiskProfile::Aggressive] {
            assert_eq!(base_allocation(p).total(), dec!(100), "{p}");
        }
    }

    #[test]
    fn test_expected_return_blend() {
        // 0.75*12 + 0.15*7 + 0.05*8 + 0.05*4 = 10.65
        assert_eq!(AGGRESSIVE.expected_return_pct(&EXPECTED_RETURNS), dec!(10.65));
    }

    #[test]
    fn test_optimize_does_not_mutate_base() {
        let base = *base_allocation(RiskProfile::Aggressive);
        let before = base;
        let (next, _) = optimize_allocation(&base, &AllocationAdjustment { age: 60, horizon_years: 2 });
        assert_eq!(base, before);
        assert_ne!(next, base);
        assert_eq!(*base_allocation(RiskProfile::Aggressive), AGGRESSIVE);
    }

    #[test]
    fn test_age_cap_and_short_horizon() {
        let (next, notes) = optimize_allocation(
            &AGGRESSIVE,
            &AllocationAdjustment { age: 60, horizon_years: 2 },
        );
        // cap 40 -> equity 40, then -20 -> 20
        assert_eq!(next.equity, dec!(20));
        assert_eq!(next.debt, dec!(70));
        assert_eq!(next.total(), dec!(100));
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_young_long_horizon_adds_equity() {
        let (next, notes) = optimize_allocation(
            &MODERATE,
            &AllocationAdjustment { age: 28, horizon_years: 15 },
        );
        assert_eq!(next.equity, dec!(65));
        assert_eq!(next.debt, dec!(20));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_equity_floor_for_very_old() {
        let (next, _) = optimize_allocation(
            &CONSERVATIVE,
            &AllocationAdjustment { age: 95, horizon_years: 5 },
        );
        assert_eq!(next.equity, dec!(10));
        assert_eq!(next.total(), dec!(100));
    }

    #[test]
    fn test_optimize_always_sums_to_100() {
        for base in [CONSERVATIVE, MODERATE, AGGRESSIVE] {
            for age in [18, 30, 45, 70, 100] {
                for horizon_years in [0, 2, 5, 10, 30] {
                    let (next, _) = optimize_allocation(&base, &AllocationAdjustment { age, horizon_years });
                    assert_eq!(next.total(), dec!(100));
                    assert!(next.equity >= Decimal::ZERO && next.debt >= Decimal::ZERO);
                }
            }
        }
    }

    #[test]
    fn test_recommend_with_monthly_split() {
        let input = AllocationInput {
            profile: RiskProfile::Moderate,
            age: None,
            horizon_years: None,
            monthly_investment: Some(dec!(10000)),
        };
        let out = recommend_allocation(&input).unwrap().result;
        let split = out.monthly_split.unwrap();
        assert_eq!(split.equity, dec!(5500));
        assert_eq!(split.cash, dec!(500));
        assert_eq!(out.recommended_allocation, MODERATE);
        assert_eq!(out.instruments.len(), 4);
    }

    #[test]
    fn test_partial_personalisation_warns() {
        let input = AllocationInput {
            profile: RiskProfile::Moderate,
            age: Some(30),
            horizon_years: None,
            monthly_investment: None,
        };
        let out = recommend_allocation(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.recommended_allocation, MODERATE);
    }
}
