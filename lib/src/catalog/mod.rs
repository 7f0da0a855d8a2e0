//! Metadata table describing every saved image.
//!
//! The table is always read and written as a whole. Implementations decide
//! how concurrent appends are coordinated.

mod json;

pub use json::JsonCatalog;

use axum::async_trait;

use crate::{ImageRecord, Result};

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Reads the full table in stored order.
    ///
    /// A missing, empty or malformed table reads as empty. Only actual read
    /// failures are reported as errors.
    async fn load(&self) -> Result<Vec<ImageRecord>>;

    /// Replaces the full table with `records`.
    async fn overwrite(&self, records: &[ImageRecord]) -> Result<()>;

    /// Adds a record at the end of the table.
    async fn append(&self, record: ImageRecord) -> Result<()>;
}
