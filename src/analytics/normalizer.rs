use serde_json::{Map, Value};

use crate::models::AnalysisRecord;

const TOTAL_PREFIX: &str = "total_";

/// Resolve a logical metric (e.g. `calories`) on a record, falling back to `total_<name>`
pub fn resolve(record: &AnalysisRecord, logical_name: &str) -> Option<f64> {
    resolve_in(&record.fitness_data, logical_name)
}

/// Same as [`resolve`] over a bare metric map
pub fn resolve_in(fitness_data: &Map<String, Value>, logical_name: &str) -> Option<f64> {
    fitness_data
        .get(logical_name)
        .and_then(numeric_value)
        .or_else(|| {
            fitness_data
                .get(&format!("{}{}", TOTAL_PREFIX, logical_name))
                .and_then(numeric_value)
        })
}

/// Numeric reading of a metric value. Text such as `"5,000"` is accepted,
/// anything else reads as absent.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
        _ => None,
    }
}
