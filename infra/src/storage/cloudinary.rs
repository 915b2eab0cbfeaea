//! Cloudinary image storage
//!
//! Signed uploads through the Cloudinary upload API. Requests are signed
//! with SHA-256, which the Cloudinary account must accept.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

use mt_core::domain::value_objects::ImageUpload;
use mt_core::errors::DomainError;
use mt_core::services::ImageStorage;
use mt_shared::config::StorageConfig;

use crate::InfrastructureError;

const API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Uploads listing images to Cloudinary
pub struct CloudinaryImageStorage {
    client: Client,
    config: StorageConfig,
    base_url: String,
}

impl CloudinaryImageStorage {
    pub fn new(config: StorageConfig) -> Result<Self, InfrastructureError> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(InfrastructureError::Config(
                "Cloudinary storage needs cloud name, API key and API secret".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.base_url, self.config.cloud_name)
    }

    async fn send(&self, image: ImageUpload) -> Result<String, InfrastructureError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", self.config.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let mime = image
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let part = multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&mime)?;

        let form = multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part("file", part);

        let response = self.client.post(self.upload_url()).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InfrastructureError::Storage(format!(
                "Cloudinary API error ({}): {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(uploaded.secure_url)
    }
}

#[async_trait]
impl ImageStorage for CloudinaryImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<String, DomainError> {
        debug!("Uploading {} ({} bytes) to Cloudinary", image.file_name, image.len());
        let url = self.send(image).await?;
        info!(target: "image_storage", provider = "cloudinary", url = %url, "Image uploaded");
        Ok(url)
    }
}

/// Cloudinary request signature: parameters sorted by name, joined as
/// `k=v&k=v`, suffixed with the API secret, hashed.
pub(crate) fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut params = params.to_vec();
    params.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
