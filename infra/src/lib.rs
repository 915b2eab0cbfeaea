//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `mt_core`:
//! - **Database**: MySQL repositories and pool management using SQLx
//! - **Storage**: Image hosting (Cloudinary, mock)
//! - **OAuth**: Google as the identity provider confirming email ownership
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Image storage backends
pub mod storage;

/// External identity providers
pub mod oauth;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Identity provider error
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),
}

impl From<InfrastructureError> for mt_core::DomainError {
    fn from(error: InfrastructureError) -> Self {
        mt_core::DomainError::internal(error.to_string())
    }
}
