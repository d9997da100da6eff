// pup-core/src/resolve/marketplace.rs
use async_trait::async_trait;
use pup_common::catalog::CatalogEntry;
use pup_common::error::{PupError, Result};
use pup_net::api::{fetch_latest_resource_version, resource_download_url, resource_id};
use tracing::{debug, info};

use super::{describe, single_file, DownloadJob, ResolveContext, Resolver};
use crate::ledger::VersionLedger;

/// SpigotMC resources, looked up through the Spiget API.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketplaceResolver;

#[async_trait]
impl Resolver for MarketplaceResolver {
    async fn resolve(
        &self,
        ctx: &ResolveContext<'_>,
        entry: &CatalogEntry,
        ledger: &mut VersionLedger,
    ) -> Result<Option<DownloadJob>> {
        let file_name = single_file(entry)?;
        let resource = resource_id(&entry.source)
            .map_err(|e| PupError::SourceUnavailable(entry.source.clone(), e.to_string()))?;

        let api = ctx.config.marketplace_api();
        let latest = fetch_latest_resource_version(ctx.client, api, resource).await?;
        let recorded = ledger.get(file_name);

        if recorded == Some(latest.id) {
            debug!("{} is current at version {}", file_name, latest.id);
            return Ok(None);
        }

        info!(
            "{} changed: {} -> {}",
            file_name,
            describe(recorded),
            latest.id
        );
        ledger.set(file_name, latest.id);
        let mut job = DownloadJob::default();
        job.push_recorded(resource_download_url(api, resource, latest.id), file_name);
        Ok(Some(job))
    }
}
