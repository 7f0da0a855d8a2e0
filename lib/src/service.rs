use std::sync::Arc;

use chrono::Utc;

use crate::catalog::{Catalog, JsonCatalog};
use crate::record::{self, ImageRecord};
use crate::{fetch, Config, ErrorKind, ImageFiles, Result};

pub const MISSING_URL: &str = "Image URL is required";
pub const INVALID_COUNT: &str = "Invalid count parameter";

/// Save and query paths over one storage directory.
///
/// Holds no per-request state, a failed request leaves the service usable
/// for the next one.
pub struct ImageService {
    client: reqwest::Client,
    files: ImageFiles,
    catalog: Arc<dyn Catalog>,
}

impl ImageService {
    pub fn new(config: &Config, files: ImageFiles, catalog: Arc<dyn Catalog>) -> Result<Self> {
        Ok(Self {
            client: fetch::client(&config.fetch)?,
            files,
            catalog,
        })
    }

    /// Sets up the storage layout described by the config, creating the
    /// images directory and the catalog file if they're missing.
    pub async fn open(config: &Config) -> Result<Self> {
        let files = ImageFiles::new(config.storage.images_dir());
        files.ensure().await?;

        let catalog = JsonCatalog::new(config.storage.catalog_path());
        catalog.ensure().await?;

        tracing::info!(
            images = %files.dir().display(),
            catalog = %catalog.path().display(),
            "storage ready"
        );

        Self::new(config, files, Arc::new(catalog))
    }

    pub fn files(&self) -> &ImageFiles {
        &self.files
    }

    /// Downloads the image at `url`, stores it and records it in the
    /// catalog.
    ///
    /// The record is only appended once the image file is fully written. A
    /// failure after that point leaves the file on disk without a record.
    pub async fn save_image(&self, url: &str) -> Result<ImageRecord> {
        if url.is_empty() {
            return Err(ErrorKind::InvalidRequest(MISSING_URL.to_string()).into());
        }

        let response = fetch::request(&self.client, url).await?;

        let record = ImageRecord::new(url, Utc::now());
        let file = self.files.create(&record).await?;
        let size = fetch::stream_to_file(response, file).await?;
        tracing::debug!(file = %record.file_name(), size, "image written");

        self.catalog.append(record.clone()).await?;
        tracing::info!(url, timestamp = %record.timestamp, "image saved");

        Ok(record)
    }

    /// Returns up to `count` most recent records, newest first.
    pub async fn last_images(&self, count: usize) -> Result<Vec<ImageRecord>> {
        if count == 0 {
            return Err(ErrorKind::InvalidRequest(INVALID_COUNT.to_string()).into());
        }
        let records = self.catalog.load().await?;
        Ok(record::newest_first(records, count))
    }
}
