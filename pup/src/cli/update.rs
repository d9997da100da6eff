//! Contains the logic for the `update` command.
use pup_common::config::Config;
use pup_common::error::Result;
use pup_core::Updater;
use tracing::warn;

#[derive(clap::Args, Debug, Clone)]
pub struct Update;

impl Update {
    pub async fn run(&self, config: &Config) -> Result<()> {
        tracing::debug!(
            "Updating {} catalog entries into {}",
            config.catalog.len(),
            config.plugin_dir().display()
        );
        let mut updater = Updater::new(config)?;
        updater.run(interrupted()).await?;
        Ok(())
    }
}

/// Completes on Ctrl-C. If the handler cannot be installed the run simply
/// cannot be interrupted.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
