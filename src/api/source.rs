use async_trait::async_trait;

use super::ApiError;
use crate::models::{AnalysisRecord, MetricsSummary};

/// Where analysis records come from.
///
/// Implementations may return the history in any order;
/// [`crate::models::HistoryList`] imposes newest-first ordering itself.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_history_list(&self) -> Result<Vec<AnalysisRecord>, ApiError>;

    async fn fetch_record(&self, id: i64) -> Result<AnalysisRecord, ApiError>;

    async fn fetch_metrics_summary(&self) -> Result<MetricsSummary, ApiError>;
}
