#![allow(dead_code)]

use async_trait::async_trait;
use fitness_history::api::{ApiError, RecordSource};
use fitness_history::models::{AnalysisRecord, MetricsSummary};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

type HistoryResponse = Result<Vec<AnalysisRecord>, ApiError>;
type MetricsResponse = Result<MetricsSummary, ApiError>;

/// Scripted record source. Each fetch pops the next scripted response and
/// repeats the last one once the script runs out.
pub struct FakeSource {
    history: Mutex<VecDeque<HistoryResponse>>,
    metrics: Mutex<VecDeque<MetricsResponse>>,
    last_history: Mutex<HistoryResponse>,
    last_metrics: Mutex<MetricsResponse>,
    history_calls: AtomicUsize,
    metrics_calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(VecDeque::new()),
            metrics: Mutex::new(VecDeque::new()),
            last_history: Mutex::new(Ok(Vec::new())),
            last_metrics: Mutex::new(Ok(MetricsSummary::default())),
            history_calls: AtomicUsize::new(0),
            metrics_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn with_history(self, responses: Vec<HistoryResponse>) -> Self {
        *self.history.lock().unwrap() = responses.into();
        self
    }

    pub fn with_metrics(self, responses: Vec<MetricsResponse>) -> Self {
        *self.metrics.lock().unwrap() = responses.into();
        self
    }

    /// Hold every history fetch until the returned semaphore gets a permit
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn metrics_calls(&self) -> usize {
        self.metrics_calls.load(Ordering::SeqCst)
    }

    fn next_history(&self) -> HistoryResponse {
        let mut last = self.last_history.lock().unwrap();
        if let Some(next) = self.history.lock().unwrap().pop_front() {
            *last = next;
        }
        last.clone()
    }

    fn next_metrics(&self) -> MetricsResponse {
        let mut last = self.last_metrics.lock().unwrap();
        if let Some(next) = self.metrics.lock().unwrap().pop_front() {
            *last = next;
        }
        last.clone()
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn fetch_history_list(&self) -> Result<Vec<AnalysisRecord>, ApiError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }

        self.next_history()
    }

    async fn fetch_record(&self, id: i64) -> Result<AnalysisRecord, ApiError> {
        let history = self.last_history.lock().unwrap().clone()?;
        history
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| ApiError::NotFound("Entry not found".to_string()))
    }

    async fn fetch_metrics_summary(&self) -> Result<MetricsSummary, ApiError> {
        self.metrics_calls.fetch_add(1, Ordering::SeqCst);
        self.next_metrics()
    }
}

/// Record dated `2024-03-<day>` with the given fitness data
pub fn record(id: i64, day: u32, fitness_data: Value) -> AnalysisRecord {
    serde_json::from_value(json!({
        "id": id,
        "date": format!("2024-03-{:02}T09:30:00", day),
        "fitness_data": fitness_data,
        "analysis_results": {"activity_level": "Active"},
        "recommendations": {"activity": "- Keep moving"}
    }))
    .unwrap()
}

pub fn summary_with_steps(values: &[f64]) -> MetricsSummary {
    let steps: Vec<Value> = values
        .iter()
        .enumerate()
        .map(|(i, value)| json!({"date": format!("2024-03-{:02}T09:30:00", i + 1), "value": value}))
        .collect();

    serde_json::from_value(json!({"steps": steps, "calories": [], "distance": []})).unwrap()
}
