//! Shared utilities and common types for the MedTrack server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The JSON error response body
//! - Field validators (phone, email)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, Environment, GoogleOAuthConfig, JwtConfig,
    ServerConfig, StorageConfig, StorageProvider, SweeperConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation;
