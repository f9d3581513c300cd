use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use super::report::render_record;
use super::{connect, spinner};
use crate::config::Config;

#[derive(Args)]
pub struct ShowCommand {
    /// Analysis ID
    id: i64,

    /// Print recommendations as inline markup instead of formatted text
    #[arg(long)]
    markup: bool,
}

impl ShowCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let (_client, cache) = connect(config)?;

        let pb = spinner(&format!("Loading analysis #{}...", self.id));
        let (_, record) = tokio::join!(cache.load_history_only(), cache.load_record(self.id));
        pb.finish_and_clear();

        let record = record.with_context(|| format!("Failed to load analysis #{}", self.id))?;

        if let Some(error) = cache.snapshot().await.error {
            eprintln!("{} trends unavailable: {}", "warning:".yellow(), error);
        }

        let trends = cache.trends_for(&record, &config.trends.policy()).await;
        println!(
            "{}",
            render_record(&record, &trends, &config.ui.date_format, self.markup)
        );

        Ok(())
    }
}
