//! Authentication and identity provider configuration

use serde::{Deserialize, Serialize};

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT signing configuration shared by session and verification tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,

    /// Session token lifetime in days
    pub session_token_expiry_days: i64,

    /// Verification token lifetime in minutes
    pub verification_token_expiry_minutes: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            session_token_expiry_days: 7,
            verification_token_expiry_minutes: 10,
            issuer: String::from("medtrack"),
            audience: String::from("medtrack-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Load from `JWT_SECRET`, `SESSION_TOKEN_EXPIRY_DAYS` and
    /// `VERIFICATION_TOKEN_EXPIRY_MINUTES`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            session_token_expiry_days: std::env::var("SESSION_TOKEN_EXPIRY_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(defaults.session_token_expiry_days),
            verification_token_expiry_minutes: std::env::var("VERIFICATION_TOKEN_EXPIRY_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(defaults.verification_token_expiry_minutes),
            ..defaults
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Google OAuth2 client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleOAuthConfig {
    /// OAuth2 client ID
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Authorization URL
    pub auth_url: String,

    /// Token exchange URL
    pub token_url: String,

    /// OpenID userinfo endpoint
    pub userinfo_url: String,

    /// Frontend base URL the browser is sent back to after verification
    pub frontend_url: String,
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_url: String::from("https://accounts.google.com/o/oauth2/v2/auth"),
            token_url: String::from("https://oauth2.googleapis.com/token"),
            userinfo_url: String::from("https://openidconnect.googleapis.com/v1/userinfo"),
            frontend_url: String::from("http://localhost:5173"),
        }
    }
}

impl GoogleOAuthConfig {
    /// Load from `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` and `FRONTEND_URL`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            frontend_url: std::env::var("FRONTEND_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.frontend_url.clone()),
            ..defaults
        }
    }

    /// Whether client credentials are present
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Combined authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// bcrypt work factor for password hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Google identity provider
    #[serde(default)]
    pub google: GoogleOAuthConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
            google: GoogleOAuthConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or_else(default_bcrypt_cost),
            google: GoogleOAuthConfig::from_env(),
        }
    }
}

fn default_bcrypt_cost() -> u32 {
    10
}
