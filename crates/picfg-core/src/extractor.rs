// ── Configuration extraction workflow ──
//
// Three sequential stages over one `PrimeClient`:
//   A. page through `data/ConfigVersions.xml` collecting version ids,
//   B. fetch each version's device identity and file list,
//   C. fetch the sanitized text of every running/startup config.
// Stage A and B failures end the run. Stage C failures only drop the file.

use indexmap::IndexSet;
use tracing::{debug, info, warn};

use picfg_api::PrimeClient;

use crate::config::ExtractorConfig;
use crate::convert;
use crate::error::CoreError;
use crate::model::{ConfigFileResult, ConfigVersionId, ConfigVersionRecord};

/// Progress notifications emitted while extracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractProgress<'a> {
    /// Stage A finished with `total` distinct version ids.
    Listed { total: usize },
    /// About to fetch version `index` (1-based) of `total`.
    Device {
        index: usize,
        total: usize,
        id: &'a ConfigVersionId,
    },
    /// A configuration file could not be fetched and was skipped.
    FileFailed {
        device_name: &'a str,
        file_id: &'a str,
    },
}

/// Drives an extraction run against one Prime server.
#[derive(Debug)]
pub struct Extractor {
    client: PrimeClient,
    page_size: u32,
}

impl Extractor {
    /// Build the API client described by `config`. No request is sent.
    pub fn connect(config: &ExtractorConfig) -> Result<Self, CoreError> {
        let credentials = picfg_api::Credentials::new(config.username.clone(), config.password.clone());
        let client = PrimeClient::new(&config.url, credentials, &config.transport())?;
        Ok(Self::new(client, config.page_size))
    }

    pub fn new(client: PrimeClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    // ── Stage A ──────────────────────────────────────────────────────

    /// Collect every configuration version id, page by page.
    ///
    /// The loop runs until the offset reaches the `count` reported by the
    /// server. If `count` changes between pages the new value wins and a
    /// warning is logged; ids seen twice are kept once, in first-seen order.
    pub async fn list_version_ids(&self) -> Result<Vec<ConfigVersionId>, CoreError> {
        if self.page_size == 0 {
            return Err(CoreError::Config {
                message: "page size must be at least 1".into(),
            });
        }

        debug!("listing configuration version ids");
        let step = u64::from(self.page_size);
        let mut first: u64 = 0;
        let mut total: Option<u64> = None;
        let mut ids: IndexSet<ConfigVersionId> = IndexSet::new();
        let mut duplicates = 0usize;

        while total.is_none_or(|count| first < count) {
            let resource = format!(
                "data/ConfigVersions.xml?.maxResults={}&.firstResult={first}",
                first + step
            );
            let page = convert::listing_page(&self.client.get_xml(&resource).await?)?;

            if let Some(previous) = total.filter(|&previous| previous != page.count) {
                warn!(
                    previous,
                    current = page.count,
                    offset = first,
                    "configuration version count changed between pages"
                );
            }
            total = Some(page.count);

            for id in page.ids {
                if !ids.insert(id) {
                    duplicates += 1;
                }
            }
            first += step;
        }

        if duplicates > 0 {
            debug!(duplicates, "dropped repeated configuration version ids");
        }
        let ids: Vec<ConfigVersionId> = ids.into_iter().collect();
        debug!(count = ids.len(), ?ids, "retrieved configuration version ids");
        Ok(ids)
    }

    // ── Stage B ──────────────────────────────────────────────────────

    /// Fetch one version record with its device identity and file list.
    pub async fn fetch_version(&self, id: &ConfigVersionId) -> Result<ConfigVersionRecord, CoreError> {
        debug!(%id, "fetching configuration version");
        let root = self
            .client
            .get_xml(&format!("data/ConfigVersions/{id}.xml"))
            .await?;
        convert::version_record(id, &root)
    }

    // ── Stage C ──────────────────────────────────────────────────────

    /// Fetch the sanitized text of one archived file.
    ///
    /// A response without `fileData` text is an error.
    pub async fn fetch_config(&self, file_id: &str) -> Result<String, CoreError> {
        debug!(file_id, "fetching configuration file");
        let root = self
            .client
            .get_xml(&format!(
                "op/configArchiveService/extractSanitizedFile.xml?fileId={file_id}"
            ))
            .await?;
        convert::file_data(&root)
            .map(str::to_owned)
            .ok_or_else(|| CoreError::missing("fileData", format!("file {file_id}")))
    }

    async fn try_fetch_config(&self, file_id: &str) -> Option<String> {
        match self.fetch_config(file_id).await {
            Ok(config) => Some(config),
            Err(error) => {
                warn!(file_id, %error, "failed to fetch configuration file");
                None
            }
        }
    }

    // ── Full run ─────────────────────────────────────────────────────

    /// Run all three stages and return the retrieved configurations.
    pub async fn extract(&self) -> Result<Vec<ConfigFileResult>, CoreError> {
        self.extract_with_progress(|_| {}).await
    }

    /// [`extract`](Self::extract), reporting progress to `on_progress`.
    ///
    /// Results are ordered by version id, then by file order inside the
    /// version document.
    pub async fn extract_with_progress<F>(&self, mut on_progress: F) -> Result<Vec<ConfigFileResult>, CoreError>
    where
        F: FnMut(ExtractProgress<'_>) + Send,
    {
        let ids = self.list_version_ids().await?;
        let total = ids.len();
        on_progress(ExtractProgress::Listed { total });

        debug!("fetching device information and configuration files");
        let mut results = Vec::new();

        for (position, id) in ids.iter().enumerate() {
            let index = position + 1;
            debug!(%id, "processing device {index} of {total}");
            on_progress(ExtractProgress::Device { index, total, id });

            let record = self.fetch_version(id).await?;
            for file in record.config_files() {
                let Some(config) = self.try_fetch_config(&file.file_id).await else {
                    on_progress(ExtractProgress::FileFailed {
                        device_name: &record.device_name,
                        file_id: &file.file_id,
                    });
                    continue;
                };
                debug!(
                    device_id = %record.device_id,
                    device_name = %record.device_name,
                    file_id = %file.file_id,
                    file_state = %file.file_state,
                    "retrieved configuration"
                );
                results.push(ConfigFileResult::new(&record, file, config));
            }
        }

        info!(devices = total, files = results.len(), "extraction finished");
        Ok(results)
    }
}
