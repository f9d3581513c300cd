mod common;

use common::record;
use fitness_history::analytics::{compute_trend, compute_trend_with, TrendPolicy};
use fitness_history::models::HistoryList;
use serde_json::json;

#[test]
fn test_trend_against_chronological_predecessor() {
    // Served out of order; trends must still follow dates
    let history = HistoryList::new(vec![
        record(1, 1, json!({"steps": 800})),
        record(3, 3, json!({"steps": 1200})),
        record(2, 2, json!({"steps": 1000})),
    ]);

    let latest = history.latest().unwrap();
    let trends = compute_trend(latest, &history);

    let steps = trends.get("steps").unwrap();
    assert_eq!(steps.previous, 1000.0);
    assert_eq!(steps.change, 200.0);
    assert_eq!(steps.percent_change, Some(20));
    assert!(steps.improved);
}

#[test]
fn test_oldest_record_has_no_trends() {
    let history = HistoryList::new(vec![
        record(1, 1, json!({"steps": 800})),
        record(2, 2, json!({"steps": 1000})),
    ]);

    let oldest = history.find(1).unwrap();
    assert!(compute_trend(oldest, &history).is_empty());
}

#[test]
fn test_zero_baseline_has_no_percentage() {
    let history = HistoryList::new(vec![
        record(1, 1, json!({"active_minutes": 0})),
        record(2, 2, json!({"active_minutes": 45})),
    ]);

    let trends = compute_trend(history.latest().unwrap(), &history);
    let minutes = trends.get("active_minutes").unwrap();

    assert_eq!(minutes.change, 45.0);
    assert_eq!(minutes.percent_change, None);
    assert_eq!(minutes.chip_label(), "+45");
}

#[test]
fn test_metric_missing_on_one_side_is_skipped() {
    let history = HistoryList::new(vec![
        record(1, 1, json!({"steps": 1000})),
        record(2, 2, json!({"steps": 1100, "distance": 3.1})),
    ]);

    let trends = compute_trend(history.latest().unwrap(), &history);

    assert_eq!(trends.len(), 1);
    assert!(trends.get("distance").is_none());
}

#[test]
fn test_lower_is_better_policy() {
    let history = HistoryList::new(vec![
        record(1, 1, json!({"resting_heart_rate": 64})),
        record(2, 2, json!({"resting_heart_rate": 60})),
    ]);
    let policy = TrendPolicy::new(vec!["resting_heart_rate".to_string()])
        .with_lower_is_better("resting_heart_rate");

    let trends = compute_trend_with(history.latest().unwrap(), &history, &policy);
    let heart_rate = trends.get("resting_heart_rate").unwrap();

    assert_eq!(heart_rate.change, -4.0);
    assert_eq!(heart_rate.percent_change, Some(-6));
    assert!(heart_rate.improved);
}
