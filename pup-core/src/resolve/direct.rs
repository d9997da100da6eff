// pup-core/src/resolve/direct.rs
use async_trait::async_trait;
use pup_common::catalog::CatalogEntry;
use pup_common::error::Result;

use super::{single_file, DownloadJob, ResolveContext, Resolver};
use crate::ledger::VersionLedger;

/// Plain links. They expose no version, so they are fetched on every run and
/// never recorded in the ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectResolver;

#[async_trait]
impl Resolver for DirectResolver {
    async fn resolve(
        &self,
        _ctx: &ResolveContext<'_>,
        entry: &CatalogEntry,
        _ledger: &mut VersionLedger,
    ) -> Result<Option<DownloadJob>> {
        let file_name = single_file(entry)?;
        Ok(Some(DownloadJob::untracked(entry.source.as_str(), file_name)))
    }
}
