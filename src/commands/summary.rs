use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use super::{connect, spinner};
use crate::analytics::format_number;
use crate::api::RecordSource;
use crate::config::Config;
use crate::models::MetricsSummary;
use crate::ui::display_key;

#[derive(Args)]
pub struct SummaryCommand {
    /// Print the raw summary as JSON
    #[arg(long)]
    json: bool,
}

impl SummaryCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let (client, _cache) = connect(config)?;

        let pb = spinner("Loading metrics summary...");
        let summary = client.fetch_metrics_summary().await;
        pb.finish_and_clear();
        let summary = summary.context("Failed to load metrics summary")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("{}", render_summary(&summary, &config.ui.date_format));
        Ok(())
    }
}

fn render_summary(summary: &MetricsSummary, date_format: &str) -> String {
    if summary.is_empty() {
        return summary
            .message
            .clone()
            .unwrap_or_else(|| "No data available yet".to_string());
    }

    let mut out = vec![
        "Metrics Summary".bold().to_string(),
        "────────────────────────────────".to_string(),
    ];

    for (name, points) in summary.series() {
        let (Some(latest), Some(average)) =
            (MetricsSummary::latest(points), MetricsSummary::average(points))
        else {
            out.push(format!("{:<12} {}", display_key(name), "no data".dimmed()));
            continue;
        };

        out.push(format!(
            "{:<12} latest {} ({})  avg {}  over {} analyses",
            display_key(name),
            format_number(latest.value).bold(),
            latest.date.format(date_format),
            format_number((average * 100.0).round() / 100.0),
            points.len()
        ));
    }

    out.join("\n")
}
