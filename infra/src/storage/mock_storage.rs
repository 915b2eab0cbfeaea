//! Mock Image Storage Implementation
//!
//! Logs uploads instead of storing them and hands back `mock://` URLs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use mt_core::domain::value_objects::ImageUpload;
use mt_core::errors::DomainError;
use mt_core::services::ImageStorage;

/// Mock image storage for development and testing
#[derive(Clone)]
pub struct MockImageStorage {
    /// Counter for tracking number of uploads
    upload_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockImageStorage {
    /// Create a new mock storage
    pub fn new() -> Self {
        Self {
            upload_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a mock storage that rejects every upload
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::new()
        }
    }

    /// Get the number of successful uploads
    pub fn get_upload_count(&self) -> u64 {
        self.upload_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

impl Default for MockImageStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStorage for MockImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<String, DomainError> {
        if self.simulate_failure {
            warn!("Mock image storage simulating failure for {}", image.file_name);
            return Err(DomainError::internal("Simulated image upload failure"));
        }

        let url = format!("mock://images/{}/{}", Uuid::new_v4(), image.file_name);
        let count = self.upload_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "image_storage",
            provider = "mock",
            file_name = %image.file_name,
            bytes = image.len(),
            upload = count,
            "Image upload simulated"
        );

        Ok(url)
    }
}
