//! Image storage configuration

use serde::{Deserialize, Serialize};

/// Which image storage backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// Log uploads and hand back placeholder URLs
    #[default]
    Mock,
    /// Cloudinary signed uploads
    Cloudinary,
}

impl std::str::FromStr for StorageProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(StorageProvider::Mock),
            "cloudinary" => Ok(StorageProvider::Cloudinary),
            _ => Err(format!("Invalid image storage provider: {}", s)),
        }
    }
}

/// Object storage settings for medicine images
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder images are uploaded into
    pub folder: String,
    /// Upload request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::Mock,
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: String::from("medtrack"),
            timeout_seconds: 30,
        }
    }
}

impl StorageConfig {
    /// Load from `IMAGE_STORAGE_PROVIDER` and the `CLOUDINARY_*` variables.
    ///
    /// When no provider is named, Cloudinary is picked if its credentials are set.
    pub fn from_env() -> Self {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default();
        let api_key = std::env::var("CLOUDINARY_API_KEY").unwrap_or_default();
        let api_secret = std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default();

        let provider = match std::env::var("IMAGE_STORAGE_PROVIDER") {
            Ok(p) => p.parse().unwrap_or_default(),
            Err(_) if !cloud_name.is_empty() && !api_key.is_empty() && !api_secret.is_empty() => {
                StorageProvider::Cloudinary
            }
            Err(_) => StorageProvider::Mock,
        };

        Self {
            provider,
            cloud_name,
            api_key,
            api_secret,
            folder: std::env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "medtrack".to_string()),
            ..Default::default()
        }
    }
}
