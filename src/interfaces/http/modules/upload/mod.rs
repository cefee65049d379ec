//! Image upload proxy
//!
//! Forwards a data URI or remote image URL to the media host and returns
//! the stored image's public URL. Responses are bare `{url}` or `{error}`
//! objects, not the API envelope.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::infrastructure::media::MediaUploader;

pub const UPLOAD_SECRET_HEADER: &str = "x-upload-secret";

/// Largest accepted JSON body.
pub const MAX_UPLOAD_BODY: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct UploadState {
    pub uploader: Arc<dyn MediaUploader>,
    pub upload_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Data URI or remote image URL
    pub image_data: Option<String>,
    pub folder: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

fn upload_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Secret first, then configuration, then the body. The body is read raw so
/// a missing or malformed payload never preempts the earlier checks.
pub async fn upload_image(
    State(state): State<UploadState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.upload_secret {
        let presented = headers
            .get(UPLOAD_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(secret.as_str()) {
            warn!("Upload rejected: bad or missing secret");
            return upload_error(StatusCode::UNAUTHORIZED, "Unauthorized");
        }
    }

    if !state.uploader.is_configured() {
        return upload_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Cloudinary not configured on server",
        );
    }

    let request: UploadRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(image_data) = request.image_data.filter(|d| !d.is_empty()) else {
        return upload_error(StatusCode::BAD_REQUEST, "Missing imageData");
    };

    match state
        .uploader
        .upload(&image_data, request.folder.as_deref())
        .await
    {
        Ok(url) => Json(UploadResponse { url }).into_response(),
        Err(e) => {
            error!(error = %e, "Upload error");
            upload_error(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed")
        }
    }
}
