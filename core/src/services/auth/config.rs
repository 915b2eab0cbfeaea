//! Configuration for the authentication service

use mt_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            bcrypt_cost: auth.bcrypt_cost,
        }
    }
}
