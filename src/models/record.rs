use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::analytics::{format_number, normalizer};

/// One analysis produced by the external service for an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    /// Raw metrics extracted from the image, in extraction order
    #[serde(default)]
    pub fitness_data: Map<String, Value>,
    #[serde(default)]
    pub analysis_results: Map<String, Value>,
    #[serde(default)]
    pub recommendations: Recommendations,
}

/// Recommendation text blocks, one per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub nutrition: String,
    #[serde(default)]
    pub wellness: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationCategory {
    Activity,
    Nutrition,
    Wellness,
}

/// Response of an image submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisAccepted {
    pub id: i64,
    #[serde(default)]
    pub fitness_data: Map<String, Value>,
    #[serde(default)]
    pub analysis_results: Map<String, Value>,
    #[serde(default)]
    pub recommendations: Recommendations,
}

impl AnalysisRecord {
    /// Look up an analysis field by its wire name, accepting the camelCase spelling too
    fn result_field(&self, snake: &str, camel: &str) -> Option<&Value> {
        self.analysis_results
            .get(snake)
            .or_else(|| self.analysis_results.get(camel))
    }

    pub fn fitness_score(&self) -> Option<f64> {
        self.result_field("fitness_score", "fitnessScore")
            .and_then(Value::as_f64)
    }

    pub fn overall_fitness(&self) -> Option<&str> {
        self.result_field("overall_fitness", "overallFitness")
            .and_then(Value::as_str)
    }

    pub fn activity_level(&self) -> Option<&str> {
        self.result_field("activity_level", "activityLevel")
            .and_then(Value::as_str)
    }

    /// Insight sentences; non-string entries are skipped
    pub fn insights(&self) -> Vec<String> {
        self.analysis_results
            .get("insights")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// One-line summary used by history listings, e.g. `8500 steps, 420 calories • Active`
    pub fn summary_line(&self) -> String {
        let mut summary = String::new();

        if let Some(steps) = normalizer::resolve(self, "steps").filter(|v| *v != 0.0) {
            summary.push_str(&format!("{} steps", format_number(steps)));
        }

        if let Some(calories) = normalizer::resolve(self, "calories").filter(|v| *v != 0.0) {
            if !summary.is_empty() {
                summary.push_str(", ");
            }
            summary.push_str(&format!("{} calories", format_number(calories)));
        }

        if let Some(level) = self.activity_level().filter(|l| !l.is_empty()) {
            if !summary.is_empty() {
                summary.push_str(" • ");
            }
            summary.push_str(level);
        }

        if summary.is_empty() {
            "No summary available".to_string()
        } else {
            summary
        }
    }
}

impl AnalysisAccepted {
    /// Record view of a fresh submission, stamped with `date`
    pub fn into_record(self, date: DateTime<Utc>) -> AnalysisRecord {
        AnalysisRecord {
            id: self.id,
            date,
            fitness_data: self.fitness_data,
            analysis_results: self.analysis_results,
            recommendations: self.recommendations,
        }
    }
}

impl Recommendations {
    pub fn get(&self, category: RecommendationCategory) -> &str {
        match category {
            RecommendationCategory::Activity => &self.activity,
            RecommendationCategory::Nutrition => &self.nutrition,
            RecommendationCategory::Wellness => &self.wellness,
        }
    }

    pub fn is_empty(&self) -> bool {
        RecommendationCategory::ALL
            .iter()
            .all(|category| self.get(*category).trim().is_empty())
    }
}

impl RecommendationCategory {
    pub const ALL: [RecommendationCategory; 3] = [
        RecommendationCategory::Activity,
        RecommendationCategory::Nutrition,
        RecommendationCategory::Wellness,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            RecommendationCategory::Activity => "Activity Recommendations",
            RecommendationCategory::Nutrition => "Nutrition Recommendations",
            RecommendationCategory::Wellness => "Wellness Recommendations",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            RecommendationCategory::Activity => RecommendationCategory::Nutrition,
            RecommendationCategory::Nutrition => RecommendationCategory::Wellness,
            RecommendationCategory::Wellness => RecommendationCategory::Activity,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            RecommendationCategory::Activity => RecommendationCategory::Wellness,
            RecommendationCategory::Nutrition => RecommendationCategory::Activity,
            RecommendationCategory::Wellness => RecommendationCategory::Nutrition,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            RecommendationCategory::Activity => 0,
            RecommendationCategory::Nutrition => 1,
            RecommendationCategory::Wellness => 2,
        }
    }
}

impl std::fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationCategory::Activity => write!(f, "Activity"),
            RecommendationCategory::Nutrition => write!(f, "Nutrition"),
            RecommendationCategory::Wellness => write!(f, "Wellness"),
        }
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one interpreted as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_deserialize_service_wire_format() {
        let record: AnalysisRecord = serde_json::from_value(json!({
            "id": 7,
            "date": "2024-03-05T08:15:30.123456",
            "fitness_data": {"steps": 8500, "activity": "walking"},
            "analysis_results": {
                "fitness_score": 64,
                "overall_fitness": "Very Good",
                "activity_level": "Somewhat Active",
                "insights": ["Great step count", 3]
            },
            "recommendations": {"activity": "- Walk more"}
        }))
        .unwrap();

        assert_eq!(record.id, 7);
        assert_eq!(record.date.year(), 2024);
        assert_eq!(record.date.hour(), 8);
        assert_eq!(record.fitness_score(), Some(64.0));
        assert_eq!(record.overall_fitness(), Some("Very Good"));
        assert_eq!(record.insights(), vec!["Great step count".to_string()]);
        assert_eq!(record.recommendations.activity, "- Walk more");
        assert!(record.recommendations.nutrition.is_empty());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let record: AnalysisRecord =
            serde_json::from_value(json!({"id": 1, "date": "2024-01-01T00:00:00Z"})).unwrap();

        assert!(record.fitness_data.is_empty());
        assert!(record.analysis_results.is_empty());
        assert!(record.recommendations.is_empty());
        assert_eq!(record.summary_line(), "No summary available");
    }

    #[test]
    fn test_camel_case_result_keys() {
        let record: AnalysisRecord = serde_json::from_value(json!({
            "id": 1,
            "date": "2024-01-01T00:00:00Z",
            "analysis_results": {"fitnessScore": 41.5, "overallFitness": "Good"}
        }))
        .unwrap();

        assert_eq!(record.fitness_score(), Some(41.5));
        assert_eq!(record.overall_fitness(), Some("Good"));
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let result: Result<AnalysisRecord, _> =
            serde_json::from_value(json!({"id": 1, "date": "yesterday"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_line_uses_calorie_alias() {
        let record: AnalysisRecord = serde_json::from_value(json!({
            "id": 3,
            "date": "2024-01-01 09:00:00",
            "fitness_data": {"steps": 12000, "total_calories": 540},
            "analysis_results": {"activity_level": "Active"}
        }))
        .unwrap();

        assert_eq!(record.summary_line(), "12000 steps, 540 calories • Active");
    }

    #[test]
    fn test_category_cycle() {
        let mut category = RecommendationCategory::Activity;
        for expected in [
            RecommendationCategory::Nutrition,
            RecommendationCategory::Wellness,
            RecommendationCategory::Activity,
        ] {
            category = category.next();
            assert_eq!(category, expected);
        }
    }
}
