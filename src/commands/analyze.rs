use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;
use colored::*;
use std::path::PathBuf;

use super::report::render_record;
use super::{connect, spinner};
use crate::config::Config;

#[derive(Args)]
pub struct AnalyzeCommand {
    /// Screenshot of the fitness tracker app
    image: PathBuf,

    /// Only print the new record ID
    #[arg(long)]
    no_show: bool,
}

impl AnalyzeCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        if !self.image.is_file() {
            bail!("Image not found: {}", self.image.display());
        }

        let (client, cache) = connect(config)?;

        let pb = spinner("Analyzing image...");
        let accepted = client.submit_image(&self.image).await;
        pb.finish_and_clear();
        let accepted = accepted?;

        println!("{} Analysis saved as #{}", "✓".green(), accepted.id);

        if self.no_show {
            return Ok(());
        }

        // Trends need the stored predecessor, so pull the updated history
        let pb = spinner("Refreshing history...");
        cache.refresh().await;
        pb.finish_and_clear();

        let state = cache.snapshot().await;
        if let Some(error) = &state.error {
            eprintln!("{} trends unavailable: {}", "warning:".yellow(), error);
        }

        let record = match state.history.find(accepted.id) {
            Some(record) => record.clone(),
            None => {
                tracing::debug!("Record {} not in history yet", accepted.id);
                accepted.into_record(Utc::now())
            }
        };

        let trends = cache.trends_for(&record, &config.trends.policy()).await;
        println!();
        println!(
            "{}",
            render_record(&record, &trends, &config.ui.date_format, false)
        );

        Ok(())
    }
}
