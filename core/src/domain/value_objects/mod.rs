//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod image_upload;

// Re-export commonly used types
pub use auth_response::AuthResponse;
pub use image_upload::ImageUpload;
