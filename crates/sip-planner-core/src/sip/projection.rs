use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::annuity::{
    evaluate, return_assumption_warnings, validate_positive, validate_return_pct, AnnuityParameters,
};
use super::MAX_PERIOD_MONTHS;
use crate::error::PlannerError;
use crate::time_value::monthly_rate_from_annual_pct;
use crate::types::*;
use crate::PlannerResult;

/// Input for a chart-ready SIP projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub monthly_contribution: Money,
    pub period_months: u32,
    pub annual_return_pct: Percent,
    /// Spacing between samples, in months (12 = yearly points)
    pub interval_months: u32,
    /// Optional first contribution date; each point then carries a date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// One sample of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub invested: Money,
    pub value: Money,
    pub gain: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub interval_months: u32,
    pub total_months: u32,
    pub points: Vec<ProjectionPoint>,
}

/// Month counts sampled for a horizon: every multiple of `interval` up to
/// `total`, then `total` itself when it is not already a multiple.
pub fn sample_months(total: u32, interval: u32) -> PlannerResult<Vec<u32>> {
    if interval == 0 {
        return Err(PlannerError::invalid("interval_months", "Sampling interval must be at least 1 month"));
    }
    let mut months: Vec<u32> = (1..=total / interval).map(|k| k * interval).collect();
    if total % interval != 0 {
        months.push(total);
    }
    Ok(months)
}

fn label_for(month: u32) -> String {
    if month % 12 == 0 {
        format!("Year {}", month / 12)
    } else {
        format!("Month {month}")
    }
}

/// Sample an annuity at regular intervals. Every point is evaluated from the
/// closed form at its own month count, never accumulated from the previous
/// point.
pub fn sample_projection(
    params: &AnnuityParameters,
    interval_months: u32,
    start_date: Option<NaiveDate>,
) -> PlannerResult<ProjectionSeries> {
    let months = sample_months(params.period_months, interval_months)?;
    let mut points = Vec::with_capacity(months.len());

    for month in months {
        let result = evaluate(&params.at_month(month))?.rounded();
        let date = match start_date {
            Some(d) => Some(d.checked_add_months(Months::new(month)).ok_or_else(|| {
                PlannerError::invalid("start_date", "Projection runs past the supported date range")
            })?),
            None => None,
        };
        points.push(ProjectionPoint {
            month,
            label: label_for(month),
            date,
            invested: result.total_contributed,
            value: result.maturity_value,
            gain: result.gain,
        });
    }

    Ok(ProjectionSeries {
        interval_months,
        total_months: params.period_months,
        points,
    })
}

/// Build a projection series from user-facing inputs.
pub fn build_projection(
    input: &ProjectionInput,
) -> PlannerResult<ComputationOutput<ProjectionSeries>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_positive("monthly_contribution", input.monthly_contribution)?;
    validate_return_pct("annual_return_pct", input.annual_return_pct)?;
    if input.period_months == 0 {
        return Err(PlannerError::invalid("period_months", "Period must be at least 1 month"));
    }
    if input.period_months > MAX_PERIOD_MONTHS {
        return Err(PlannerError::invalid(
            "period_months",
            format!("Period cannot exceed {MAX_PERIOD_MONTHS} months"),
        ));
    }
    return_assumption_warnings(input.annual_return_pct, &mut warnings);
    if input.interval_months > input.period_months {
        warnings.push("Interval exceeds the period; only the final point is produced".into());
    }

    let params = AnnuityParameters {
        monthly_contribution: input.monthly_contribution,
        period_months: input.period_months,
        monthly_rate: monthly_rate_from_annual_pct(input.annual_return_pct),
    };
    let series = sample_projection(&params, input.interval_months, input.start_date)?;
    log::debug!("projection: {} points over {} months", series.points.len(), series.total_months);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SIP projection (closed form evaluated independently at each sample)",
        &serde_json::json!({
            "monthly_contribution": input.monthly_contribution.to_string(),
            "period_months": input.period_months,
            "annual_return_pct": input.annual_return_pct.to_string(),
            "interval_months": input.interval_months,
        }),
        warnings,
        elapsed,
        series,
    ))
}

impl ProjectionSeries {
    /// The last sample, which always sits at the full horizon.
    pub fn final_point(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }

    /// Share of the final value that is gain, as a percentage.
    pub fn final_gain_share(&self) -> Decimal {
        match self.final_point() {
            Some(p) if !p.value.is_zero() => round_percent(p.gain / p.value * Decimal::from(100)),
            _ => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sip::annuity::future_value;
    use rust_decimal_macros::dec;

    fn params(months: u32) -> AnnuityParameters {
        AnnuityParameters {
            monthly_contribution: dec!(1000),
            period_months: months,
            monthly_rate: dec!(0.01),
        }
    }

    #[test]
    fn test_non_multiple_tail_is_appended() {
        assert_eq!(sample_months(10, 6).unwrap(), vec![6, 10]);
    }

    #[test]
    fn test_exact_multiple_not_duplicated() {
        assert_eq!(sample_months(12, 6).unwrap(), vec![6, 12]);
    }

    #[test]
    fn test_interval_larger_than_total() {
        assert_eq!(sample_months(5, 12).unwrap(), vec![5]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(sample_months(12, 0).is_err());
    }

    #[test]
    fn test_points_strictly_increasing_and_final_matches_closed_form() {
        let series = sample_projection(&params(10), 6, None).unwrap();
        let months: Vec<u32> = series.points.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![6, 10]);

        let full = round_money(future_value(&params(10)).unwrap());
        assert_eq!(series.final_point().unwrap().value, full);
        assert_eq!(series.points[1].invested, dec!(10000));
    }

    #[test]
    fn test_each_point_independent_of_sampling() {
        let coarse = sample_projection(&params(36), 12, None).unwrap();
        let fine = sample_projection(&params(36), 6, None).unwrap();
        let coarse_y2 = coarse.points.iter().find(|p| p.month == 24).unwrap();
        let fine_y2 = fine.points.iter().find(|p| p.month == 24).unwrap();
        assert_eq!(coarse_y2, fine_y2);
    }

    #[test]
    fn test_labels() {
        let series = sample_projection(&params(18), 6, None).unwrap();
        let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Month 6", "Year 1", "Month 18"]);
    }

    #[test]
    fn test_dates_follow_start_date() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let series = sample_projection(&params(12), 6, Some(start)).unwrap();
        assert_eq!(series.points[0].date, NaiveDate::from_ymd_opt(2024, 7, 31));
        assert_eq!(series.points[1].date, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_build_projection_validates_period() {
        let input = ProjectionInput {
            monthly_contribution: dec!(1000),
            period_months: 0,
            annual_return_pct: dec!(12),
            interval_months: 6,
            start_date: None,
        };
        assert!(build_projection(&input).is_err());
    }

    #[test]
    fn test_build_projection_yearly() {
        let input = ProjectionInput {
            monthly_contribution: dec!(5000),
            period_months: 120,
            annual_return_pct: dec!(12),
            interval_months: 12,
            start_date: None,
        };
        let out = build_projection(&input).unwrap().result;
        assert_eq!(out.points.len(), 10);
        assert!((out.points[9].value - dec!(1161695.38)).abs() <= dec!(0.5));
        assert!(out.final_gain_share() > dec!(48));
    }
}
