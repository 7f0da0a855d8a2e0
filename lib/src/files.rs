use std::path::{Path, PathBuf};

use tokio::fs::{self, File};

use crate::{ErrorKind, ImageRecord, Result};

/// Directory holding the downloaded image files, one per catalog record.
#[derive(Clone, Debug)]
pub struct ImageFiles {
    dir: PathBuf,
}

impl ImageFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(ErrorKind::StorageWrite)?;
        Ok(())
    }

    pub fn path_for(&self, record: &ImageRecord) -> PathBuf {
        self.dir.join(record.file_name())
    }

    /// Opens the file for the record for writing, truncating anything
    /// already stored under the same name.
    pub async fn create(&self, record: &ImageRecord) -> Result<File> {
        let file = File::create(self.path_for(record))
            .await
            .map_err(ErrorKind::StorageWrite)?;
        Ok(file)
    }
}
