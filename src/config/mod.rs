use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analytics::trend::{TrendPolicy, WATCHED_METRICS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub trends: TrendsConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsConfig {
    /// Metrics compared against the previous analysis
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,

    /// Metrics where a decrease counts as an improvement (e.g. resting_heart_rate)
    #[serde(default)]
    pub lower_is_better: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

// Image analysis can take a while
fn default_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_metrics() -> Vec<String> {
    WATCHED_METRICS.iter().map(|m| m.to_string()).collect()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_history_limit() -> usize {
    20
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            lower_is_better: Vec::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            history_limit: default_history_limit(),
        }
    }
}

impl TrendsConfig {
    pub fn policy(&self) -> TrendPolicy {
        self.lower_is_better
            .iter()
            .fold(TrendPolicy::new(self.metrics.clone()), |policy, metric| {
                policy.with_lower_is_better(metric.clone())
            })
    }
}

impl Config {
    /// Get config directory path (~/.fitness-history/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".fitness-history"))
    }

    /// Get config file path (~/.fitness-history/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_file(),
        }
    }

    /// Load configuration from `path`, using defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MetricDirection;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout_seconds, 60);
        assert_eq!(config.api.max_attempts, 3);
        assert_eq!(
            config.trends.metrics,
            vec!["steps", "calories", "distance", "active_minutes"]
        );
        assert_eq!(config.ui.history_limit, 20);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.api.base_url, deserialized.api.base_url);
        assert_eq!(config.trends.metrics, deserialized.trends.metrics);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://fitness.example.com"

            [trends]
            lower_is_better = ["resting_heart_rate"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://fitness.example.com");
        assert_eq!(config.api.timeout_seconds, 60);
        assert_eq!(config.trends.metrics.len(), 4);

        let policy = config.trends.policy();
        assert_eq!(
            policy.direction("resting_heart_rate"),
            MetricDirection::LowerIsBetter
        );
        assert_eq!(policy.direction("steps"), MetricDirection::HigherIsBetter);
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.history_limit = 5;
        config.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded.ui.history_limit, 5);
        Ok(())
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let loaded = Config::load_from(&dir.path().join("absent.toml"))?;
        assert_eq!(loaded.api.base_url, "http://localhost:5000");
        Ok(())
    }
}
