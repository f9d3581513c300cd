use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::deserialize_timestamp;

/// Per-metric time series across the whole history, as served by the summary endpoint.
///
/// When no analyses exist yet the service answers with only a `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(default)]
    pub steps: Vec<MetricPoint>,
    #[serde(default)]
    pub calories: Vec<MetricPoint>,
    #[serde(default)]
    pub distance: Vec<MetricPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    pub value: f64,
}

impl MetricsSummary {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.calories.is_empty() && self.distance.is_empty()
    }

    /// Named series in display order
    pub fn series(&self) -> [(&'static str, &[MetricPoint]); 3] {
        [
            ("steps", self.steps.as_slice()),
            ("calories", self.calories.as_slice()),
            ("distance", self.distance.as_slice()),
        ]
    }

    /// Mean of a series, `None` when it has no points
    pub fn average(points: &[MetricPoint]) -> Option<f64> {
        if points.is_empty() {
            return None;
        }
        Some(points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64)
    }

    /// Most recent point of a series regardless of its position in the payload
    pub fn latest(points: &[MetricPoint]) -> Option<&MetricPoint> {
        points.iter().max_by_key(|p| p.date)
    }
}
