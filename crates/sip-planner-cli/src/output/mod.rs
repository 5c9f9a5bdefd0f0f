pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Result fields holding row data, in the order they are looked for.
const ROW_FIELDS: [&str; 5] = ["points", "results", "year_by_year", "breakdown", "distribution"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// The `result` object of an output envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// First array-of-objects field of a result, used as tabular rows
/// (projection points, scenario results, yearly schedules).
pub(crate) fn find_rows(result: &Value) -> Option<(&str, &Vec<Value>)> {
    let map = result.as_object()?;
    ROW_FIELDS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(rows)) if rows.first().is_some_and(Value::is_object) => Some((*key, rows)),
        _ => None,
    })
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) if arr.iter().all(|v| !v.is_object() && !v.is_array()) => arr
            .iter()
            .map(format_scalar)
            .collect::<Vec<_>>()
            .join("; "),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_rows_prefers_points() {
        let v = json!({"points": [{"month": 6}], "breakdown": [{"q": 1}]});
        let (key, rows) = find_rows(&v).unwrap();
        assert_eq!(key, "points");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_find_rows_ignores_scalar_arrays() {
        let v = json!({"instruments": ["a", "b"], "adjustments": []});
        assert!(find_rows(&v).is_none());
    }

    #[test]
    fn test_format_scalar_joins_string_lists() {
        assert_eq!(format_scalar(&json!(["a", "b"])), "a; b");
        assert_eq!(format_scalar(&json!("1161695.38")), "1161695.38");
        assert_eq!(format_scalar(&Value::Null), "");
    }
}
