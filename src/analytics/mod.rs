//! History analytics: metric aliasing, chart series, recommendation text and trends.
//!
//! Nothing in here fails. Missing data yields empty results.

pub mod chart;
pub mod normalizer;
pub mod recommendations;
pub mod trend;

pub use chart::ChartSeries;
pub use recommendations::RecommendationBlock;
pub use trend::{compute_trend, compute_trend_with, MetricDirection, TrendPolicy, TrendResult, Trends};

/// Render a metric value without a trailing `.0` for whole numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.2}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
