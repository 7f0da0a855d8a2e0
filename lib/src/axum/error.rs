use axum::response::{Html, IntoResponse, Response};
use http::StatusCode;

use crate::{Error, ErrorKind};

pub const DOWNLOAD_FAILED: &str = "Error downloading the image";
pub const SAVE_FAILED: &str = "Error saving the image";
pub const RETRIEVE_FAILED: &str = "Error retrieving images";

/// Maps errors onto short plain messages.
///
/// Underlying causes and backtraces are only ever written to the logs,
/// never to the response.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self.kind {
            ErrorKind::InvalidRequest(msg) => {
                tracing::debug!("{}", self);
                (StatusCode::BAD_REQUEST, Html(msg.clone())).into_response()
            }
            ErrorKind::UpstreamFetch(_) => {
                tracing::warn!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(DOWNLOAD_FAILED)).into_response()
            }
            ErrorKind::StorageWrite(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SAVE_FAILED)).into_response()
            }
            ErrorKind::StorageRead(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(RETRIEVE_FAILED)).into_response()
            }
            _ => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn invalid_request_echoes_message() {
        let response =
            Error::from(ErrorKind::InvalidRequest("Image URL is required".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(response).await, "Image URL is required");
    }

    #[tokio::test]
    async fn storage_errors_hide_their_cause() {
        let response = Error::from(ErrorKind::StorageWrite(std::io::Error::other(
            "No space left on device",
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(response).await, SAVE_FAILED);

        let response =
            Error::from(ErrorKind::StorageRead(std::io::Error::other("EACCES"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(response).await, RETRIEVE_FAILED);
    }
}
