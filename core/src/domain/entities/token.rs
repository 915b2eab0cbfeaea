//! JWT claim sets for session and email verification tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token lifetime (7 days)
pub const SESSION_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Verification token lifetime (10 minutes)
pub const VERIFICATION_TOKEN_EXPIRY_MINUTES: i64 = 10;

/// JWT issuer
pub const JWT_ISSUER: &str = "medtrack";

/// Audience of session tokens
pub const JWT_AUDIENCE: &str = "medtrack-api";

/// Audience of verification tokens, keeps them from passing as sessions
pub const VERIFICATION_AUDIENCE: &str = "medtrack-email-verification";

/// Claims of a session token: "caller is user `sub`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl SessionClaims {
    /// Creates claims for `user_id` issued at `now`
    pub fn new(
        user_id: Uuid,
        issuer: &str,
        audience: &str,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Gets the user ID from the subject claim
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Claims of a verification token: "an identity provider confirmed `email`"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

impl VerificationClaims {
    pub fn new(email: &str, issuer: &str, lifetime: Duration, now: DateTime<Utc>) -> Self {
        Self {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: issuer.to_string(),
            aud: VERIFICATION_AUDIENCE.to_string(),
        }
    }
}
