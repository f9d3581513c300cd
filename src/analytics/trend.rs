//! Period-over-period trend deltas between a record and its predecessor.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{format_number, normalizer};
use crate::models::{AnalysisRecord, HistoryList};

/// Metrics compared when no policy is configured
pub const WATCHED_METRICS: [&str; 4] = ["steps", "calories", "distance", "active_minutes"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// Which metrics to compare and which way counts as an improvement
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPolicy {
    metrics: Vec<String>,
    lower_is_better: HashSet<String>,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self::new(WATCHED_METRICS.iter().map(|m| m.to_string()).collect())
    }
}

impl TrendPolicy {
    pub fn new(metrics: Vec<String>) -> Self {
        Self {
            metrics,
            lower_is_better: HashSet::new(),
        }
    }

    pub fn with_lower_is_better(mut self, metric: impl Into<String>) -> Self {
        self.lower_is_better.insert(metric.into());
        self
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn direction(&self, metric: &str) -> MetricDirection {
        if self.lower_is_better.contains(metric) {
            MetricDirection::LowerIsBetter
        } else {
            MetricDirection::HigherIsBetter
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    /// Absent when the previous value is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<i64>,
    pub improved: bool,
}

impl TrendResult {
    /// Compact label such as `+200 (20%)`
    pub fn chip_label(&self) -> String {
        let sign = if self.change > 0.0 { "+" } else { "" };
        match self.percent_change {
            Some(percent) => format!("{}{} ({}%)", sign, format_number(self.change), percent),
            None => format!("{}{}", sign, format_number(self.change)),
        }
    }
}

/// Trend results keyed by canonical metric, in policy order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trends {
    entries: Vec<(String, TrendResult)>,
}

impl Trends {
    pub fn get(&self, metric: &str) -> Option<&TrendResult> {
        self.entries
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TrendResult)> + '_ {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    /// Trend for a raw fitness-data key, matching `total_<metric>` keys too
    pub fn for_key(&self, key: &str) -> Option<&TrendResult> {
        self.get(key)
            .or_else(|| key.strip_prefix("total_").and_then(|metric| self.get(metric)))
    }
}

/// Trends of `target` against its predecessor using the default policy
pub fn compute_trend(target: &AnalysisRecord, history: &HistoryList) -> Trends {
    compute_trend_with(target, history, &TrendPolicy::default())
}

/// Trends of `target` against its predecessor in `history`.
///
/// Empty when `target` is not in the history or is its oldest entry.
pub fn compute_trend_with(
    target: &AnalysisRecord,
    history: &HistoryList,
    policy: &TrendPolicy,
) -> Trends {
    match history.predecessor_of(target.id) {
        Some(previous) => compare(target, previous, policy),
        None => {
            tracing::debug!("No predecessor for record {}, skipping trends", target.id);
            Trends::default()
        }
    }
}

/// Compare two records metric by metric; metrics missing on either side are skipped
pub fn compare(current: &AnalysisRecord, previous: &AnalysisRecord, policy: &TrendPolicy) -> Trends {
    let mut entries = Vec::new();

    for metric in policy.metrics() {
        let (Some(current_value), Some(previous_value)) = (
            normalizer::resolve(current, metric),
            normalizer::resolve(previous, metric),
        ) else {
            continue;
        };

        let change = current_value - previous_value;
        let percent_change = if previous_value == 0.0 {
            None
        } else {
            Some(round_half_up(100.0 * change / previous_value.abs()))
        };

        let improved = match policy.direction(metric) {
            MetricDirection::HigherIsBetter => change > 0.0,
            MetricDirection::LowerIsBetter => change < 0.0,
        };

        entries.push((
            metric.clone(),
            TrendResult {
                current: current_value,
                previous: previous_value,
                change,
                percent_change,
                improved,
            },
        ));
    }

    Trends { entries }
}

// Halves round toward positive infinity
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(id: i64, day: u32, fitness_data: Value) -> AnalysisRecord {
        serde_json::from_value(json!({
            "id": id,
            "date": format!("2024-02-{:02}T12:00:00Z", day),
            "fitness_data": fitness_data
        }))
        .unwrap()
    }

    #[test]
    fn test_steps_improvement() {
        let current = record(2, 2, json!({"steps": 1200}));
        let previous = record(1, 1, json!({"steps": 1000}));
        let history = HistoryList::new(vec![current.clone(), previous]);

        let trends = compute_trend(&current, &history);

        assert_eq!(trends.len(), 1);
        assert_eq!(
            trends.get("steps"),
            Some(&TrendResult {
                current: 1200.0,
                previous: 1000.0,
                change: 200.0,
                percent_change: Some(20),
                improved: true,
            })
        );
    }

    #[test]
    fn test_oldest_record_has_no_trends() {
        let newer = record(2, 2, json!({"steps": 1200}));
        let oldest = record(1, 1, json!({"steps": 1000}));
        let history = HistoryList::new(vec![newer, oldest.clone()]);

        assert!(compute_trend(&oldest, &history).is_empty());
    }

    #[test]
    fn test_unknown_record_has_no_trends() {
        let history = HistoryList::new(vec![record(1, 1, json!({"steps": 10}))]);
        let stranger = record(99, 5, json!({"steps": 20}));

        assert!(compute_trend(&stranger, &history).is_empty());
    }

    #[test]
    fn test_zero_previous_omits_percent() {
        let current = record(2, 2, json!({"steps": 400}));
        let previous = record(1, 1, json!({"steps": 0}));

        let trends = compare(&current, &previous, &TrendPolicy::default());
        let steps = trends.get("steps").unwrap();

        assert_eq!(steps.change, 400.0);
        assert_eq!(steps.percent_change, None);
        assert_eq!(steps.chip_label(), "+400");
    }

    #[test]
    fn test_aliases_on_either_side() {
        let current = record(2, 2, json!({"calories": 450}));
        let previous = record(1, 1, json!({"total_calories": 500}));

        let trends = compare(&current, &previous, &TrendPolicy::default());
        let calories = trends.get("calories").unwrap();

        assert_eq!(calories.change, -50.0);
        assert_eq!(calories.percent_change, Some(-10));
        assert!(!calories.improved);
        assert_eq!(calories.chip_label(), "-50 (-10%)");
        assert!(trends.for_key("total_calories").is_some());
    }

    #[test]
    fn test_missing_metrics_are_omitted() {
        let current = record(2, 2, json!({"steps": 10, "distance": 2.5}));
        let previous = record(1, 1, json!({"steps": 5, "active_minutes": 30}));

        let trends = compare(&current, &previous, &TrendPolicy::default());

        assert_eq!(trends.len(), 1);
        assert!(trends.get("distance").is_none());
        assert!(trends.get("active_minutes").is_none());
    }

    #[test]
    fn test_negative_previous_uses_magnitude() {
        let current = record(2, 2, json!({"balance": -50}));
        let previous = record(1, 1, json!({"balance": -100}));
        let policy = TrendPolicy::new(vec!["balance".to_string()]);

        let trends = compare(&current, &previous, &policy);
        assert_eq!(trends.get("balance").unwrap().percent_change, Some(50));
    }

    #[test]
    fn test_lower_is_better_policy() {
        let current = record(2, 2, json!({"resting_heart_rate": 58}));
        let previous = record(1, 1, json!({"resting_heart_rate": 62}));
        let policy = TrendPolicy::new(vec!["resting_heart_rate".to_string()])
            .with_lower_is_better("resting_heart_rate");

        let trends = compare(&current, &previous, &policy);
        assert!(trends.get("resting_heart_rate").unwrap().improved);
    }

    #[test]
    fn test_unchanged_metric_is_not_improved() {
        let current = record(2, 2, json!({"steps": 100}));
        let previous = record(1, 1, json!({"steps": 100}));

        let trends = compare(&current, &previous, &TrendPolicy::default());
        let steps = trends.get("steps").unwrap();
        assert!(!steps.improved);
        assert_eq!(steps.percent_change, Some(0));
    }

    #[test]
    fn test_rounding_halves_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(33.33), 33);
    }
}
