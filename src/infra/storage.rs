//! Product image storage.
//!
//! Images go to Cloudinary when credentials are configured and to the local
//! upload directory otherwise. Either way the caller gets back a public URL.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use uuid::Uuid;

use crate::config::{
    CloudinaryCredentials, CLOUDINARY_API_URL, CLOUDINARY_FOLDER, UPLOADS_ROUTE,
    UPLOAD_TIMEOUT_SECS,
};
use crate::errors::{AppError, AppResult};

const CLOUDINARY_FAILURE: &str = "Error al subir la imagen a Cloudinary. Revisa la configuración.";

/// An already validated image
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Lowercase, without the dot
    pub extension: String,
    pub content_type: String,
}

impl ImageUpload {
    fn file_name(&self) -> String {
        format!("{}.{}", Uuid::new_v4(), self.extension)
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image and return its public URL
    async fn store(&self, image: ImageUpload) -> AppResult<String>;
}

/// Writes images under a directory served at `/uploads`
pub struct LocalDiskStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalDiskStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ImageStore for LocalDiskStore {
    async fn store(&self, image: ImageUpload) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::internal(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let file_name = image.file_name();
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| AppError::internal(format!("cannot write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), size = image.bytes.len(), "Image stored on disk");
        Ok(format!(
            "{}{}/{}",
            self.public_base_url, UPLOADS_ROUTE, file_name
        ))
    }
}

/// Signed uploads to Cloudinary
pub struct CloudinaryStore {
    http: reqwest::Client,
    api_url: String,
    credentials: CloudinaryCredentials,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: Option<String>,
}

impl CloudinaryStore {
    pub fn new(credentials: CloudinaryCredentials) -> AppResult<Self> {
        Self::with_api_url(credentials, CLOUDINARY_API_URL)
    }

    pub fn with_api_url(
        credentials: CloudinaryCredentials,
        api_url: impl Into<String>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_url, self.credentials.cloud_name
        )
    }
}

/// SHA-1 of the alphabetically sorted signed parameters followed by the secret.
pub fn cloudinary_signature(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn store(&self, image: ImageUpload) -> AppResult<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string();
        let signature = cloudinary_signature(
            &[("folder", CLOUDINARY_FOLDER), ("timestamp", &timestamp)],
            self.credentials.api_secret(),
        );

        let file_name = image.file_name();
        let part = Part::bytes(image.bytes)
            .file_name(file_name)
            .mime_str(&image.content_type)
            .map_err(|e| AppError::validation(format!("Tipo de archivo no válido: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", CLOUDINARY_FOLDER)
            .text("signature", signature);

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Cloudinary upload failed");
                AppError::upstream(CLOUDINARY_FAILURE)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "Cloudinary rejected the upload");
            return Err(AppError::upstream(CLOUDINARY_FAILURE));
        }

        let result: UploadResult = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Unreadable Cloudinary response");
            AppError::upstream(CLOUDINARY_FAILURE)
        })?;

        result
            .secure_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::upstream(CLOUDINARY_FAILURE))
    }
}
