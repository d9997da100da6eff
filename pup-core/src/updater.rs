// pup-core/src/updater.rs
//! One update run over the whole catalog.
use std::future::Future;

use pup_common::config::Config;
use pup_common::error::{PupError, Result};
use pup_common::stats::RunStats;
use pup_net::http::build_http_client;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::fetch::FetchEngine;
use crate::ledger::VersionLedger;
use crate::resolve::{resolve_entry, ResolveContext};

pub struct Updater<'a> {
    config: &'a Config,
    client: Client,
    stats: RunStats,
}

impl<'a> Updater<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        Ok(Self {
            config,
            client: build_http_client(config)?,
            stats: RunStats::default(),
        })
    }

    /// Counters so far; complete once [`Self::run`] returned `Ok`.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Checks every catalog entry in order and downloads what changed.
    ///
    /// Processing stops early when `shutdown` completes; the run then returns
    /// [`PupError::Interrupted`]. Once the ledger has been loaded it is flushed
    /// exactly once, whichever way the run ends. An empty catalog fails before
    /// the ledger is even read.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<RunStats>
    where
        F: Future,
    {
        info!("pup is running.");

        if self.config.catalog.is_empty() {
            error!("FATAL: no plugins are configured.");
            return Err(PupError::Config("the plugin catalog is empty".to_string()));
        }

        let mut ledger = VersionLedger::load(self.config.ledger_path())?;

        let outcome = tokio::select! {
            result = self.process_catalog(&mut ledger) => result,
            _ = shutdown => Err(PupError::Interrupted),
        };
        if matches!(outcome, Err(PupError::Interrupted)) {
            warn!(
                "Interrupted, stopping after {} of the catalog's files.",
                self.stats.total
            );
        }

        let flushed = ledger.flush();
        match (outcome, flushed) {
            (Ok(()), Ok(())) => {
                info!(
                    "pup is finished (updated/downloaded/total: {}).",
                    self.stats
                );
                Ok(self.stats)
            }
            (Ok(()), Err(flush_err)) => Err(flush_err),
            (Err(e), flushed) => {
                if let Err(flush_err) = flushed {
                    error!("{}", flush_err);
                }
                Err(e)
            }
        }
    }

    async fn process_catalog(&mut self, ledger: &mut VersionLedger) -> Result<()> {
        let config = self.config;
        pup_aio::create_dir_all(config.plugin_dir())?;

        let ctx = ResolveContext {
            client: &self.client,
            config,
        };
        let fetcher = FetchEngine::new(&self.client, config);

        for (index, raw) in config.catalog.iter().enumerate() {
            let entry = raw.validate(index).map_err(|e| {
                error!("FATAL: {}", e);
                e
            })?;
            self.stats.total += entry.files.len();

            let job = match resolve_entry(&ctx, &entry, ledger).await {
                Ok(Some(job)) => job,
                Ok(None) => {
                    debug!("{} is up to date, nothing to fetch", entry.source);
                    continue;
                }
                Err(e) if e.is_fatal() => {
                    error!("FATAL: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Failed to get data from URL \"{}\": {}", entry.source, e);
                    continue;
                }
            };

            self.stats.updated += job.recorded();
            self.stats.downloaded += fetcher.download(&job).await;
        }
        Ok(())
    }
}
