//! Verification token service implementation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mt_shared::utils::validation::normalize_email;
use tracing::debug;

use crate::domain::entities::token::{VerificationClaims, VERIFICATION_AUDIENCE};
use crate::errors::{DomainError, TokenError};
use crate::services::token::TokenServiceConfig;

/// Issues and checks short-lived email verification tokens.
///
/// Tokens are stateless: a token stays usable until it expires, for any
/// flow whose email matches.
pub struct VerificationTokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl VerificationTokenService {
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[VERIFICATION_AUDIENCE]);
        validation.validate_exp = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn lifetime(&self) -> Duration {
        Duration::minutes(self.config.verification_token_expiry_minutes)
    }

    /// Mints a token for an email the identity provider has confirmed
    pub fn issue(&self, email: &str) -> Result<String, DomainError> {
        self.issue_at(email, Utc::now())
    }

    /// Mints a token as if the current time were `now`
    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Result<String, DomainError> {
        let claims = VerificationClaims::new(
            &normalize_email(email),
            &self.config.issuer,
            self.lifetime(),
            now,
        );
        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Checks the token and that it was issued for `expected_email`.
    ///
    /// Emails are compared trimmed and case-insensitively.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The normalized verified email
    /// * `Err(TokenError::InvalidVerificationToken)` - Bad signature, wrong
    ///   audience, expired or malformed
    /// * `Err(TokenError::EmailMismatch)` - Token belongs to another email
    pub fn validate(&self, token: &str, expected_email: &str) -> Result<String, DomainError> {
        let claims = decode::<VerificationClaims>(token.trim(), &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Verification token rejected: {}", e);
                DomainError::Token(TokenError::InvalidVerificationToken)
            })?;

        let verified = normalize_email(&claims.email);
        if verified != normalize_email(expected_email) {
            return Err(DomainError::Token(TokenError::EmailMismatch));
        }

        Ok(verified)
    }
}
