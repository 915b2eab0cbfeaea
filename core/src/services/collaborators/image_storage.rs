//! Image hosting port

use async_trait::async_trait;

use crate::domain::value_objects::ImageUpload;
use crate::errors::DomainError;

/// Stores a listing image and hands back a public URL for it
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Upload the image
    ///
    /// # Returns
    /// * `Ok(String)` - Public URL of the stored image
    /// * `Err(DomainError)` - Upload failed; callers treat this as non-fatal
    async fn upload(&self, image: ImageUpload) -> Result<String, DomainError>;
}
