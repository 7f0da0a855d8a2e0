//! Outbound image download.

use std::time::Duration;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::Fetch;
use crate::{ErrorKind, Result};

/// Builds the client used for all downloads of a service instance.
pub fn client(config: &Fetch) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ErrorKind::Other(format!("failed building http client: {e}")).into())
}

/// Starts the download, resolving once response headers are in.
///
/// Non-success statuses count as failed fetches, same as connection errors.
pub async fn request(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(ErrorKind::UpstreamFetch)?;
    Ok(response)
}

/// Streams the response body into `file`, returning the number of bytes
/// written.
///
/// The file is flushed before returning so a successful result means the
/// bytes reached the file. It gets closed on every path when dropped.
pub async fn stream_to_file(response: reqwest::Response, mut file: File) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ErrorKind::UpstreamFetch)?;
        file.write_all(&chunk)
            .await
            .map_err(ErrorKind::StorageWrite)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(ErrorKind::StorageWrite)?;
    Ok(written)
}
