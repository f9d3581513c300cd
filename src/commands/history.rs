use anyhow::{bail, Result};
use clap::Args;
use colored::*;

use super::report::render_history_row;
use super::{connect, spinner};
use crate::config::Config;

#[derive(Args)]
pub struct HistoryCommand {
    /// Number of analyses to show (defaults to [ui] history_limit)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print the raw records as JSON
    #[arg(long)]
    json: bool,
}

impl HistoryCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let (_client, cache) = connect(config)?;

        let pb = spinner("Loading history...");
        cache.load_history_only().await;
        pb.finish_and_clear();

        let state = cache.snapshot().await;
        if let Some(error) = state.error {
            bail!("Failed to load history: {}", error);
        }

        let limit = self.limit.unwrap_or(config.ui.history_limit);
        let records: Vec<_> = state.history.iter().take(limit).collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            println!("No history available yet.");
            println!("Upload a screenshot with: fitness-history analyze <image>");
            return Ok(());
        }

        println!("{}", "Analysis History".bold());
        println!("────────────────────────────────");

        for record in &records {
            println!("{}", render_history_row(record, &config.ui.date_format));
        }

        if state.history.len() > records.len() {
            println!();
            println!(
                "{}",
                format!(
                    "Showing {} of {} analyses. Use --limit to see more.",
                    records.len(),
                    state.history.len()
                )
                .dimmed()
            );
        }

        Ok(())
    }
}
