//! Signing configuration shared by session and verification tokens

use jsonwebtoken::Algorithm;
use mt_shared::config::JwtConfig;

use crate::domain::entities::token::{
    JWT_AUDIENCE, JWT_ISSUER, SESSION_TOKEN_EXPIRY_DAYS, VERIFICATION_TOKEN_EXPIRY_MINUTES,
};

/// Configuration for the token services
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Issuer claim written and required
    pub issuer: String,
    /// Audience claim of session tokens
    pub audience: String,
    /// Session token expiry in days
    pub session_token_expiry_days: i64,
    /// Verification token expiry in minutes
    pub verification_token_expiry_minutes: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
            session_token_expiry_days: SESSION_TOKEN_EXPIRY_DAYS,
            verification_token_expiry_minutes: VERIFICATION_TOKEN_EXPIRY_MINUTES,
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            algorithm: Algorithm::HS256,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            session_token_expiry_days: jwt.session_token_expiry_days,
            verification_token_expiry_minutes: jwt.verification_token_expiry_minutes,
        }
    }
}
