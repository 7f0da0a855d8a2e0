use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use axum::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{ErrorKind, ImageRecord, Result};

use super::Catalog;

/// Catalog kept as a single JSON array in a file.
///
/// Appends made through the same instance are serialized, so concurrent
/// saves within one process don't overwrite each other. Readers don't wait
/// on the lock and nothing guards against other processes writing the file.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes sure the catalog file and its parent directory exist. Existing
    /// contents are left untouched.
    pub async fn ensure(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ErrorKind::StorageWrite)?;
        }
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(ErrorKind::StorageWrite)?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for JsonCatalog {
    async fn load(&self) -> Result<Vec<ImageRecord>> {
        let entries = self.read_entries().await?;
        let total = entries.len();
        let records: Vec<ImageRecord> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if records.len() < total {
            tracing::debug!(
                path = %self.path.display(),
                skipped = total - records.len(),
                "catalog entries not shaped like records"
            );
        }
        Ok(records)
    }

    async fn overwrite(&self, records: &[ImageRecord]) -> Result<()> {
        self.write_entries(records).await
    }

    /// Entries already in the table are written back verbatim, including
    /// ones that don't read as records.
    async fn append(&self, record: ImageRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        // A table we can't read is started over rather than failing the save.
        let mut entries = self.read_entries().await.unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "starting with empty catalog: {e}");
            Vec::new()
        });
        entries.push(serde_json::to_value(&record)?);
        self.write_entries(&entries).await
    }
}

impl JsonCatalog {
    async fn read_entries(&self) -> Result<Vec<Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(decode(&bytes, &self.path)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(ErrorKind::StorageRead(e).into()),
        }
    }

    async fn write_entries<T: Serialize>(&self, entries: &[T]) -> Result<()> {
        let mut bytes =
            serde_json::to_vec(entries).map_err(|e| ErrorKind::StorageWrite(e.into()))?;
        bytes.push(b'\n');
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(ErrorKind::StorageWrite)?;
        Ok(())
    }
}

/// Anything that isn't a json array reads as an empty table.
fn decode(bytes: &[u8], path: &Path) -> Vec<Value> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Vec::new();
    }
    match serde_json::from_slice(bytes) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "ignoring catalog that isn't an array");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring malformed catalog: {e}");
            Vec::new()
        }
    }
}
