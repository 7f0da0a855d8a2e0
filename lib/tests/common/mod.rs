#![allow(dead_code)]

use std::path::Path;

use axum::routing::get;
use http::StatusCode;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use imgstash::config::Storage;
use imgstash::{Config, ImageService};

/// Smallest thing that still looks like a jpeg.
pub const JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0xFF, 0xD9,
];

pub const LARGE_LEN: usize = 512 * 1024;

/// Spawns a local image host and returns its base url.
///
/// - `/img/:name` serves [`JPEG`]
/// - `/large.jpg` serves [`LARGE_LEN`] bytes
/// - `/missing.jpg` answers 404
pub async fn upstream() -> String {
    let router = axum::Router::new()
        .route("/img/:name", get(|| async { JPEG }))
        .route("/large.jpg", get(|| async { vec![7u8; LARGE_LEN] }))
        .route("/missing.jpg", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Url of a host that announces a 4096 byte jpeg, sends [`JPEG`] and then
/// closes the connection.
pub async fn truncating_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let head = "HTTP/1.1 200 OK\r\ncontent-type: image/jpeg\r\ncontent-length: 4096\r\n\r\n";
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(JPEG).await;
            let _ = socket.flush().await;
        }
    });
    format!("http://{addr}/truncated.jpg")
}

/// Url pointing at a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/img/gone.jpg")
}

pub fn config(dir: &TempDir) -> Config {
    Config {
        storage: Storage {
            dir: dir.path().to_path_buf(),
        },
        ..Default::default()
    }
}

/// Fresh service over a temporary storage directory.
pub async fn service() -> (TempDir, ImageService) {
    let dir = TempDir::new().unwrap();
    let service = ImageService::open(&config(&dir)).await.unwrap();
    (dir, service)
}

pub fn stored_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path().join("images"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn catalog_bytes(dir: &TempDir) -> Vec<u8> {
    std::fs::read(dir.path().join("images.json")).unwrap()
}

pub fn write_catalog(dir: &Path, contents: &str) {
    std::fs::write(dir.join("images.json"), contents).unwrap();
}
