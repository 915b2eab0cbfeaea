//! Image storage backends
//!
//! Implementations of `mt_core`'s `ImageStorage` port. Uploads are
//! best-effort: callers log a failure and carry on without an image.

pub mod cloudinary;
pub mod mock_storage;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use mt_core::services::ImageStorage;
use mt_shared::config::{StorageConfig, StorageProvider};

use crate::InfrastructureError;

pub use cloudinary::CloudinaryImageStorage;
pub use mock_storage::MockImageStorage;

/// Build the backend selected by configuration
pub fn create_image_storage(config: &StorageConfig) -> Result<Arc<dyn ImageStorage>, InfrastructureError> {
    match config.provider {
        StorageProvider::Cloudinary => {
            tracing::info!("Using Cloudinary image storage (cloud: {})", config.cloud_name);
            Ok(Arc::new(CloudinaryImageStorage::new(config.clone())?))
        }
        StorageProvider::Mock => {
            tracing::warn!("Using mock image storage; uploaded images are not persisted");
            Ok(Arc::new(MockImageStorage::new()))
        }
    }
}
