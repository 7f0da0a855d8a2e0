pub mod error;
pub mod images;

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::Extension;
use http::Request;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{Config, ImageService, Result};

pub type Router = axum::Router;

pub type ImagesExt = Extension<Arc<ImageService>>;

/// Registers the image routes on the provided router.
pub fn router(router: Router) -> Router {
    router.merge(images::router())
}

/// Full application: routes plus shared state and per-request tracing
/// spans.
pub fn app(images: ImageService) -> Router {
    router(Router::new())
        .layer(Extension(Arc::new(images)))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
}

/// Initializes tracing and storage, then serves the application until
/// `shutdown` resolves.
pub async fn start(config: Config, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    crate::tracing::init(&config).unwrap_or_else(|e| {
        log::warn!("failed to initialize tracing (perhaps it was already initialized?): {e}")
    });

    let images = ImageService::open(&config).await?;
    let listener = TcpListener::bind(config.address()).await?;
    serve(listener, images, shutdown).await
}

/// Serves the application on an already bound listener.
///
/// Connections use hyper's defaults: no header-read timeout, and idle
/// keep-alive connections stay open until the client closes them.
pub async fn serve(
    listener: TcpListener,
    images: ImageService,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    tracing::info!("starting server at {}", listener.local_addr()?);
    axum::serve(listener, app(images))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
