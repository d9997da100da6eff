// pup-core/src/fetch.rs
use pup_aio::replace_file_async;
use pup_common::config::Config;
use pup_common::error::{PupError, Result};
use pup_net::http::fetch_bytes;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::resolve::{DownloadItem, DownloadJob};

/// Fetches the files of a [`DownloadJob`] into the plugin directory, one at a
/// time.
pub struct FetchEngine<'a> {
    client: &'a Client,
    config: &'a Config,
}

impl<'a> FetchEngine<'a> {
    pub fn new(client: &'a Client, config: &'a Config) -> Self {
        Self { client, config }
    }

    /// Downloads every item of `job` in order and returns how many files were
    /// written. A failed item is logged and the remaining ones are still tried.
    pub async fn download(&self, job: &DownloadJob) -> usize {
        let mut downloaded = 0;
        for item in job.items() {
            match self.download_item(item).await {
                Ok(size) => {
                    info!("Downloaded {} ({} bytes)", item.file_name, size);
                    downloaded += 1;
                }
                Err(e) => {
                    error!("Failed to download the file \"{}\": {}", item.file_name, e);
                }
            }
        }
        downloaded
    }

    async fn download_item(&self, item: &DownloadItem) -> Result<usize> {
        debug!("Fetching {} from {}", item.file_name, item.url);
        let content = fetch_bytes(self.client, &item.url).await.map_err(|e| {
            PupError::DownloadError(item.file_name.clone(), item.url.clone(), e.to_string())
        })?;
        let target = self.config.plugin_path(&item.file_name);
        replace_file_async(&target, &content).await?;
        Ok(content.len())
    }
}
