//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing, password hashing and Google OAuth credentials
//! - `database` - MySQL connection pool
//! - `environment` - Environment detection and default log filters
//! - `server` - HTTP server and CORS
//! - `storage` - Image storage backend
//! - `sweeper` - Expiry sweep schedule

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;
pub mod storage;
pub mod sweeper;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, GoogleOAuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::{CorsConfig, ServerConfig};
pub use storage::{StorageConfig, StorageProvider};
pub use sweeper::SweeperConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Image storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Expiry sweeper configuration
    #[serde(default)]
    pub sweeper: SweeperConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env(),
            cors: CorsConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            storage: StorageConfig::from_env(),
            sweeper: SweeperConfig::from_env(),
        }
    }

    /// Problems that must stop a production start
    pub fn production_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.environment.is_production() {
            return issues;
        }
        if self.auth.jwt.is_using_default_secret() {
            issues.push("JWT_SECRET must be set in production".to_string());
        }
        if !self.auth.google.is_configured() {
            issues.push("GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set in production".to_string());
        }
        issues
    }
}
