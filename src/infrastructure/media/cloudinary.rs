//! Cloudinary signed uploads

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error, instrument};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Cloudinary not configured on server")]
    NotConfigured,

    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("media host rejected upload: status={status} body={body}")]
    Rejected { status: u16, body: String },

    #[error("media host response had no url")]
    MissingUrl,
}

#[derive(Debug, Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryCredentials {
    /// All three values must be present and non-empty.
    pub fn from_parts(
        cloud_name: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Option<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(Self {
            cloud_name: non_empty(cloud_name)?,
            api_key: non_empty(api_key)?,
            api_secret: non_empty(api_secret)?,
        })
    }
}

/// Anything that can store an image (data URI or remote URL) and hand back
/// its public address.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Whether uploads can be attempted at all.
    fn is_configured(&self) -> bool;

    async fn upload(&self, image_data: &str, folder: Option<&str>) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

pub struct CloudinaryClient {
    credentials: Option<CloudinaryCredentials>,
    http: reqwest::Client,
    api_base: String,
}

impl CloudinaryClient {
    pub fn new(credentials: Option<CloudinaryCredentials>) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    fn upload_url(&self, cloud_name: &str) -> String {
        format!("{}/{}/image/upload", self.api_base, cloud_name)
    }
}

/// Signature over the sorted `key=value` pairs followed by the API secret.
pub(crate) fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaUploader for CloudinaryClient {
    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    #[instrument(skip(self, image_data), fields(bytes = image_data.len()))]
    async fn upload(&self, image_data: &str, folder: Option<&str>) -> Result<String, UploadError> {
        let creds = self.credentials.as_ref().ok_or(UploadError::NotConfigured)?;

        let mut signed: BTreeMap<&str, String> = BTreeMap::new();
        signed.insert("timestamp", Utc::now().timestamp().to_string());
        if let Some(folder) = folder.filter(|f| !f.is_empty()) {
            signed.insert("folder", folder.to_string());
        }
        let signature = sign_params(&signed, &creds.api_secret);

        let mut form: Vec<(&str, String)> = signed.into_iter().collect();
        form.push(("file", image_data.to_string()));
        form.push(("api_key", creds.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));

        let resp = self
            .http
            .post(self.upload_url(&creds.cloud_name))
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Cloudinary rejected upload");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: UploadResponse = resp.json().await?;
        let url = parsed
            .secure_url
            .or(parsed.url)
            .ok_or(UploadError::MissingUrl)?;
        debug!(%url, "Image uploaded");
        Ok(url)
    }
}
