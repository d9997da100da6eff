// pup-core/src/resolve/github.rs
use async_trait::async_trait;
use pup_common::catalog::CatalogEntry;
use pup_common::error::{PupError, Result};
use pup_net::api::fetch_latest_release;
use pup_net::validation::repository_path;
use tracing::debug;

use super::{gate_indexed, DownloadJob, ResolveContext, Resolver};
use crate::ledger::VersionLedger;

/// GitHub repositories. The id of the latest release is the version and the
/// assets carry their own download URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseResolver;

#[async_trait]
impl Resolver for ReleaseResolver {
    async fn resolve(
        &self,
        ctx: &ResolveContext<'_>,
        entry: &CatalogEntry,
        ledger: &mut VersionLedger,
    ) -> Result<Option<DownloadJob>> {
        let repository = repository_path(&entry.source)
            .map_err(|e| PupError::SourceUnavailable(entry.source.clone(), e.to_string()))?;
        let release =
            fetch_latest_release(ctx.client, ctx.config.release_api(), &repository).await?;
        debug!(
            "Latest release of {} is {} (id {})",
            repository,
            release.tag_name.as_deref().unwrap_or("untagged"),
            release.id
        );
        gate_indexed(entry, ledger, release.id, |index| {
            release
                .assets
                .get(index)
                .map(|asset| asset.browser_download_url.clone())
        })
    }
}
