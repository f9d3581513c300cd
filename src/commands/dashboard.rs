use anyhow::Result;
use clap::Args;

use super::connect;
use crate::config::Config;
use crate::ui::Dashboard;

#[derive(Args)]
pub struct DashboardCommand {}

impl DashboardCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let (_client, cache) = connect(config)?;

        let mut dashboard = Dashboard::new(cache.clone(), config)?;
        let result = dashboard.run().await;
        dashboard.cleanup()?;

        cache.dispose();
        result
    }
}
