pub mod history;
pub mod record;
pub mod summary;

pub use history::HistoryList;
pub use record::{AnalysisAccepted, AnalysisRecord, RecommendationCategory, Recommendations};
pub use summary::{MetricPoint, MetricsSummary};
