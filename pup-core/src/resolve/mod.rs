// pup-core/src/resolve/mod.rs
//! Turning catalog entries into download jobs.
//!
//! Each [`SourceKind`] has its own [`Resolver`]. A resolver asks its source
//! for the current version, compares it with the ledger and, when it changed,
//! records the new version and returns the files to fetch.

mod direct;
mod github;
mod jenkins;
mod marketplace;

use async_trait::async_trait;
use pup_common::catalog::{CatalogEntry, FileSpec, SourceKind};
use pup_common::config::Config;
use pup_common::error::{PupError, Result};
use reqwest::Client;
use tracing::{debug, info};

pub use direct::DirectResolver;
pub use github::ReleaseResolver;
pub use jenkins::JenkinsResolver;
pub use marketplace::MarketplaceResolver;

use crate::ledger::VersionLedger;

/// One file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub url: String,
    pub file_name: String,
}

/// Files to fetch for one catalog entry, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadJob {
    items: Vec<DownloadItem>,
    recorded: usize,
}

impl DownloadJob {
    /// A job for a source without version tracking.
    pub fn untracked(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            items: vec![DownloadItem {
                url: url.into(),
                file_name: file_name.into(),
            }],
            recorded: 0,
        }
    }

    /// Adds a file whose new version was just written to the ledger.
    pub fn push_recorded(&mut self, url: impl Into<String>, file_name: impl Into<String>) {
        self.items.push(DownloadItem {
            url: url.into(),
            file_name: file_name.into(),
        });
        self.recorded += 1;
    }

    pub fn items(&self) -> &[DownloadItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many ledger records this job's resolution changed.
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}

/// What every resolver needs besides the entry and the ledger.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub client: &'a Client,
    pub config: &'a Config,
}

#[async_trait]
pub trait Resolver: Send + Sync {
    /// `Ok(None)` means every file of the entry is already current.
    async fn resolve(
        &self,
        ctx: &ResolveContext<'_>,
        entry: &CatalogEntry,
        ledger: &mut VersionLedger,
    ) -> Result<Option<DownloadJob>>;
}

/// Resolves `entry` with the resolver for its source kind.
pub async fn resolve_entry(
    ctx: &ResolveContext<'_>,
    entry: &CatalogEntry,
    ledger: &mut VersionLedger,
) -> Result<Option<DownloadJob>> {
    debug!("Resolving {} source {}", entry.kind, entry.source);
    match entry.kind {
        SourceKind::Marketplace => MarketplaceResolver.resolve(ctx, entry, ledger).await,
        SourceKind::ContinuousIntegration => JenkinsResolver.resolve(ctx, entry, ledger).await,
        SourceKind::SourceForge => ReleaseResolver.resolve(ctx, entry, ledger).await,
        SourceKind::Direct => DirectResolver.resolve(ctx, entry, ledger).await,
    }
}

fn single_file(entry: &CatalogEntry) -> Result<&str> {
    match &entry.files {
        FileSpec::Single(name) => Ok(name),
        FileSpec::Indexed(_) => Err(PupError::Config(format!(
            "{} source '{}' takes a single file name",
            entry.kind, entry.source
        ))),
    }
}

/// Shared gate for sources that publish several artifacts under one version.
///
/// Only the representative (lowest index) file is compared with `version`.
/// `url_for` maps an artifact index to its download URL; every index is
/// checked before the ledger is touched.
fn gate_indexed(
    entry: &CatalogEntry,
    ledger: &mut VersionLedger,
    version: u64,
    url_for: impl Fn(usize) -> Option<String>,
) -> Result<Option<DownloadJob>> {
    let FileSpec::Indexed(files) = &entry.files else {
        return Err(PupError::Config(format!(
            "{} source '{}' needs an index table of files",
            entry.kind, entry.source
        )));
    };
    let Some(representative) = entry.files.representative() else {
        return Err(PupError::Config(format!(
            "no files listed for '{}'",
            entry.source
        )));
    };

    if ledger.get(representative) == Some(version) {
        debug!("{} is current at version {}", representative, version);
        return Ok(None);
    }

    let mut urls = Vec::with_capacity(files.len());
    for (&index, file_name) in files {
        let url = url_for(index).ok_or_else(|| {
            PupError::SourceUnavailable(
                entry.source.clone(),
                format!("version {version} has no artifact at index {index} (for {file_name})"),
            )
        })?;
        urls.push((url, file_name));
    }

    let mut job = DownloadJob::default();
    for (url, file_name) in urls {
        info!(
            "{} changed: {} -> {}",
            file_name,
            describe(ledger.get(file_name)),
            version
        );
        ledger.set(file_name, version);
        job.push_recorded(url, file_name.as_str());
    }
    Ok(Some(job))
}

/// Human readable form of a ledger record for log lines.
fn describe(version: Option<u64>) -> String {
    version.map_or_else(|| "none".to_string(), |v| v.to_string())
}
