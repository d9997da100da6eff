// pup-core/src/resolve/jenkins.rs
use async_trait::async_trait;
use pup_common::catalog::CatalogEntry;
use pup_common::error::Result;
use pup_net::api::{artifact_url, fetch_last_successful_build};

use super::{gate_indexed, DownloadJob, ResolveContext, Resolver};
use crate::ledger::VersionLedger;

/// Jenkins jobs. The build number of `lastSuccessfulBuild` is the version.
#[derive(Debug, Clone, Copy, Default)]
pub struct JenkinsResolver;

#[async_trait]
impl Resolver for JenkinsResolver {
    async fn resolve(
        &self,
        ctx: &ResolveContext<'_>,
        entry: &CatalogEntry,
        ledger: &mut VersionLedger,
    ) -> Result<Option<DownloadJob>> {
        let build = fetch_last_successful_build(ctx.client, &entry.source).await?;
        gate_indexed(entry, ledger, build.number, |index| {
            build
                .artifacts
                .get(index)
                .map(|artifact| artifact_url(&entry.source, &artifact.relative_path))
        })
    }
}
