use axum::extract::Query;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Extension, Json};

use crate::service::{INVALID_COUNT, MISSING_URL};
use crate::{routes, ErrorKind, Result};

use super::{ImagesExt, Router};

pub const SAVED: &str = "Image saved successfully";

pub fn router() -> Router {
    Router::new()
        .route(routes::SAVE_IMAGE, post(save_image))
        .route(routes::GET_LAST_IMAGES, get(get_last_images))
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveImageRequest {
    pub image_url: Option<String>,
}

/// A body that doesn't parse as the expected json is treated the same as
/// one without a url.
pub async fn save_image(
    Extension(images): ImagesExt,
    body: Option<Json<SaveImageRequest>>,
) -> Result<impl IntoResponse> {
    let url = body
        .and_then(|Json(request)| request.image_url)
        .unwrap_or_default();
    if url.is_empty() {
        return Err(ErrorKind::InvalidRequest(MISSING_URL.to_string()).into());
    }

    images.save_image(&url).await?;

    Ok(Html(SAVED))
}

/// Only the first `count` in the query string is looked at. Pairs are read
/// as a list so repeated or oddly encoded parameters never fail extraction.
pub async fn get_last_images(
    Extension(images): ImagesExt,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse> {
    let count = params
        .iter()
        .find(|(key, _)| key == "count")
        .and_then(|(_, value)| parse_count(value))
        .filter(|c| *c > 0)
        .ok_or_else(|| ErrorKind::InvalidRequest(INVALID_COUNT.to_string()))?;
    let count = usize::try_from(count).unwrap_or(usize::MAX);

    let records = images.last_images(count).await?;

    Ok(Json(records))
}

/// Reads the leading integer of `raw`. Leading whitespace and an optional
/// sign are accepted, anything after the digits is ignored. Returns `None`
/// when there are no leading digits at all.
pub fn parse_count(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].bytes().fold(0i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(if negative { -value } else { value })
}
