//! Small service that downloads remote images on request, keeps them on local
//! disk and records where each one came from in a JSON catalog.
//!
//! The HTTP surface lives in the [`axum`] module; [`ImageService`] holds the
//! actual save and query paths and can be driven without a server.

#[macro_use]
extern crate serde_derive;

pub mod axum;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod files;
pub mod record;
pub mod routes;
pub mod service;
pub mod tracing;

pub use catalog::{Catalog, JsonCatalog};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use files::ImageFiles;
pub use record::ImageRecord;
pub use service::ImageService;
