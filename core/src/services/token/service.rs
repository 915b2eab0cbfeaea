//! Session token service implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::token::SessionClaims;
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::UserRepository;

use super::config::TokenServiceConfig;

/// Resolves a session token to the user it was issued for.
///
/// Kept object safe so the HTTP layer can hold it as `Arc<dyn SessionVerifier>`.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify_session(&self, token: &str) -> Result<User, DomainError>;
}

/// Issues and validates session tokens
pub struct SessionTokenService {
    users: Arc<dyn UserRepository>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionTokenService {
    /// Creates a new session token service
    ///
    /// # Arguments
    ///
    /// * `users` - Identity store used to resolve the token subject
    /// * `config` - Token service configuration
    pub fn new(users: Arc<dyn UserRepository>, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;

        Self {
            users,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Session lifetime
    pub fn lifetime(&self) -> Duration {
        Duration::days(self.config.session_token_expiry_days)
    }

    /// Issues a session token for `user_id`
    pub fn issue(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a session token as if the current time were `now`
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, DomainError> {
        let claims = SessionClaims::new(
            user_id,
            &self.config.issuer,
            &self.config.audience,
            self.lifetime(),
            now,
        );
        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Checks signature, issuer, audience and expiry
    ///
    /// # Returns
    ///
    /// * `Ok(SessionClaims)` - The decoded claims if valid
    /// * `Err(TokenError::TokenExpired)` - Token is past its expiry
    /// * `Err(TokenError::InvalidTokenFormat)` - Anything else
    pub fn decode(&self, token: &str) -> Result<SessionClaims, DomainError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })
    }

    /// Resolves a token to an existing user.
    ///
    /// Every failure, including a subject that no longer exists, is reported
    /// as `SessionInvalid`.
    pub async fn validate(&self, token: &str) -> Result<User, DomainError> {
        let claims = self.decode(token).map_err(|e| {
            debug!("Session token rejected: {}", e);
            DomainError::Token(TokenError::SessionInvalid)
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::SessionInvalid))?;

        match self.users.find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                debug!("Session token subject {} no longer exists", user_id);
                Err(DomainError::Token(TokenError::SessionInvalid))
            }
        }
    }
}

#[async_trait]
impl SessionVerifier for SessionTokenService {
    async fn verify_session(&self, token: &str) -> Result<User, DomainError> {
        self.validate(token).await
    }
}
