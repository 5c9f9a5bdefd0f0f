use serde_json::Value;

use super::{format_scalar, result_of};

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 10] = [
    "required_monthly_contribution",
    "required_monthly_sip",
    "whole_months",
    "winner",
    "profile",
    "recommended_allocation",
    "total_current_value",
    "summary",
    "maturity_value",
    "points",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_value(value));
}

fn minimal_value(value: &Value) -> String {
    let result = result_of(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            match map.get(key) {
                Some(Value::Null) | None => continue,
                Some(Value::Array(points)) if key == "points" => {
                    // Final sample of a projection
                    if let Some(last) = points.last().and_then(|p| p.get("value")) {
                        return format_scalar(last);
                    }
                }
                Some(Value::Object(summary)) if key == "summary" => {
                    if let Some(best) = summary.get("best_scenario") {
                        return format_scalar(best);
                    }
                }
                Some(val) => return format_scalar(val),
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result)
}
