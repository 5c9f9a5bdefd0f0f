use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::PlannerError;
use crate::types::*;
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy)]
pub struct AnswerOption {
    pub label: &'static str,
    pub points: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub weight: u32,
    pub options: &'static [AnswerOption],
}

const fn opt(label: &'static str, points: u32) -> AnswerOption {
    AnswerOption { label, points }
}

pub static QUESTIONS: [Question; 6] = [
    Question {
        id: "age",
        prompt: "What is your age?",
        weight: 2,
        options: &[opt("Under 30", 4), opt("30 to 45", 3), opt("45 to 60", 2), opt("Over 60", 1)],
    },
    Question {
        id: "horizon",
        prompt: "How long do you plan to stay invested?",
        weight: 3,
        options: &[
            opt("Less than 3 years", 1),
            opt("3 to 5 years", 2),
            opt("5 to 10 years", 3),
            opt("More than 10 years", 4),
        ],
    },
    Question {
        id: "income_stability",
        prompt: "How stable is your income?",
        weight: 2,
        options: &[
            opt("Irregular", 1),
            opt("Somewhat stable", 2),
            opt("Stable", 3),
            opt("Very stable with surplus", 4),
        ],
    },
    Question {
        id: "experience",
        prompt: "How much investing experience do you have?",
        weight: 1,
        options: &[
            opt("None", 1),
            opt("Deposits and bonds only", 2),
            opt("Some mutual funds or shares", 3),
            opt("Actively manage equities", 4),
        ],
    },
    Question {
        id: "loss_reaction",
        prompt: "Your portfolio falls 20% in a month. What do you do?",
        weight: 3,
        options: &[
            opt("Sell everything", 1),
            opt("Sell some", 2),
            opt("Hold", 3),
            opt("Buy more", 4),
        ],
    },
    Question {
        id: "objective",
        prompt: "What is your primary objective?",
        weight: 2,
        options: &[
            opt("Protect capital", 1),
            opt("Regular income", 2),
            opt("Balanced growth", 3),
            opt("Maximum growth", 4),
        ],
    },
];

/// Score percentage below which a profile is Conservative.
pub const CONSERVATIVE_BELOW: Decimal = dec!(40);
/// Score percentage below which a profile is Moderate.
pub const MODERATE_BELOW: Decimal = dec!(70);

impl RiskProfile {
    pub fn from_score_pct(score_pct: Percent) -> Self {
        if score_pct < CONSERVATIVE_BELOW {
            RiskProfile::Conservative
        } else if score_pct < MODERATE_BELOW {
            RiskProfile::Moderate
        } else {
            RiskProfile::Aggressive
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => {
                "Capital preservation first. Prefers stable, predictable returns and accepts lower growth."
            }
            RiskProfile::Moderate => {
                "Balances growth and stability. Accepts short-term swings for better long-term returns."
            }
            RiskProfile::Aggressive => {
                "Seeks maximum long-term growth. Comfortable with significant short-term volatility."
            }
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Option index chosen for each question (0-based, in table order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnswers {
    pub age: usize,
    pub horizon: usize,
    pub income_stability: usize,
    pub experience: usize,
    pub loss_reaction: usize,
    pub objective: usize,
}

impl RiskAnswers {
    fn by_question(&self, id: &str) -> Option<usize> {
        match id {
            "age" => Some(self.age),
            "horizon" => Some(self.horizon),
            "income_stability" => Some(self.income_stability),
            "experience" => Some(self.experience),
            "loss_reaction" => Some(self.loss_reaction),
            "objective" => Some(self.objective),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionScore {
    pub question: String,
    pub answer: String,
    pub points: u32,
    pub weight: u32,
    pub weighted_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfileOutput {
    pub score: u32,
    pub max_score: u32,
    pub score_pct: Percent,
    pub profile: RiskProfile,
    pub description: String,
    pub breakdown: Vec<QuestionScore>,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Highest achievable weighted score for a question table.
pub fn max_score(questions: &[Question]) -> u32 {
    questions
        .iter()
        .map(|q| q.weight * q.options.iter().map(|o| o.points).max().unwrap_or(0))
        .sum()
}

/// Weighted-sum score of a set of answers against a question table.
pub fn score_answers(
    questions: &[Question],
    answers: &RiskAnswers,
) -> PlannerResult<Vec<QuestionScore>> {
    questions
        .iter()
        .map(|q| {
            let index = answers.by_question(q.id).ok_or_else(|| {
                PlannerError::InsufficientData(format!("No answer for question '{}'", q.id))
            })?;
            let option = q.options.get(index).ok_or_else(|| {
                PlannerError::invalid(
                    q.id,
                    format!("Answer {index} is out of range (0..{})", q.options.len()),
                )
            })?;
            Ok(QuestionScore {
                question: q.prompt.to_string(),
                answer: option.label.to_string(),
                points: option.points,
                weight: q.weight,
                weighted_points: option.points * q.weight,
            })
        })
        .collect()
}

/// Score the questionnaire and map it to a risk profile.
pub fn assess_risk_profile(
    answers: &RiskAnswers,
) -> PlannerResult<ComputationOutput<RiskProfileOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let breakdown = score_answers(&QUESTIONS, answers)?;
    let score: u32 = breakdown.iter().map(|s| s.weighted_points).sum();
    let max = max_score(&QUESTIONS);
    let score_pct = if max == 0 {
        Decimal::ZERO
    } else {
        round_percent(Decimal::from(score) / Decimal::from(max) * dec!(100))
    };
    let profile = RiskProfile::from_score_pct(score_pct);

    if answers.horizon == 0 && profile == RiskProfile::Aggressive {
        warnings.push("Aggressive profile with a horizon under 3 years; consider a lower-risk allocation".into());
    }

    log::debug!("risk profile: score {score}/{max} ({score_pct}%) -> {profile}");

    let output = RiskProfileOutput {
        score,
        max_score: max,
        score_pct,
        profile,
        description: profile.description().to_string(),
        breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Risk profile (weighted questionnaire score in three bands)",
        &serde_json::json!({
            "conservative_below_pct": CONSERVATIVE_BELOW.to_string(),
            "moderate_below_pct": MODERATE_BELOW.to_string(),
            "questions": QUESTIONS.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
