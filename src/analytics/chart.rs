use serde::Serialize;
use serde_json::Value;

use crate::models::AnalysisRecord;

/// Title of the single dataset a record's chart carries
pub const DATASET_LABEL: &str = "Fitness Metrics";

/// Chart-ready view of a record's numeric metrics; `labels[i]` names `values[i]`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

/// Build the chart series for a record.
///
/// Returns `None` only when the record has no metrics at all. Entries whose
/// value is not a JSON number (activity names, units) are left out.
pub fn build(record: &AnalysisRecord) -> Option<ChartSeries> {
    if record.fitness_data.is_empty() {
        return None;
    }

    let (labels, values) = record
        .fitness_data
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Number(number) => number.as_f64().map(|v| (axis_label(key), v)),
            _ => None,
        })
        .unzip();

    Some(ChartSeries { labels, values })
}

/// `active_minutes` -> `ACTIVE MINUTES`; only the first underscore becomes a space
pub fn axis_label(key: &str) -> String {
    key.replacen('_', " ", 1).to_uppercase()
}
