mod analyze;
mod config_cmd;
mod dashboard;
mod history;
pub mod report;
mod show;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::cache::HistoryCache;
use crate::config::Config;

pub use analyze::AnalyzeCommand;
pub use dashboard::DashboardCommand;
pub use history::HistoryCommand;
pub use show::ShowCommand;
pub use summary::SummaryCommand;

#[derive(Parser)]
#[command(name = "fitness-history")]
#[command(about = "Browse AI fitness-tracker analyses and their trends", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FITNESS_HISTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the analysis service base URL
    #[arg(long, global = true, env = "FITNESS_HISTORY_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List past analyses, newest first
    History(HistoryCommand),

    /// Show one analysis with trends against the previous one
    Show(ShowCommand),

    /// Upload a screenshot for analysis
    Analyze(AnalyzeCommand),

    /// Show the metrics summary across all analyses
    Summary(SummaryCommand),

    /// Launch interactive dashboard
    Dashboard(DashboardCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        let config_path = Config::resolve_path(self.config.as_deref())?;

        let api_url = self.api_url.as_deref();

        match self.command {
            Commands::History(cmd) => cmd.execute(&load_config(&config_path, api_url)?).await,
            Commands::Show(cmd) => cmd.execute(&load_config(&config_path, api_url)?).await,
            Commands::Analyze(cmd) => cmd.execute(&load_config(&config_path, api_url)?).await,
            Commands::Summary(cmd) => cmd.execute(&load_config(&config_path, api_url)?).await,
            Commands::Dashboard(cmd) => cmd.execute(&load_config(&config_path, api_url)?).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&config_path).await,
                ConfigSubcommands::Edit => config_cmd::edit_config(&config_path).await,
                ConfigSubcommands::Init { force } => {
                    config_cmd::init_config(&config_path, force).await
                }
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Load the config file, letting `--api-url` win over `[api] base_url`
fn load_config(path: &Path, api_url: Option<&str>) -> Result<Config> {
    let mut config = Config::load_from(path)?;
    if let Some(api_url) = api_url {
        config.api.base_url = api_url.to_string();
    }
    Ok(config)
}

/// Build the API client and a cache reading from it
fn connect(config: &Config) -> Result<(Arc<ApiClient>, Arc<HistoryCache>)> {
    let client = Arc::new(ApiClient::new(&config.api)?);
    tracing::debug!("Using analysis service at {}", client.base_url());

    let cache = Arc::new(HistoryCache::new(client.clone()));
    Ok((client, cache))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
