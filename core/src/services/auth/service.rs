//! Main authentication service implementation

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use mt_shared::utils::validation::{is_valid_email, is_valid_phone, normalize_email};

use crate::domain::entities::user::{User, UserProfile};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::token::SessionTokenService;
use crate::services::verification::VerificationTokenService;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};

/// Registration input
#[derive(Debug, Clone, Default)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Verification token minted after the identity provider confirmed `email`
    pub verified_token: String,
}

/// Authentication service for account flows
pub struct AuthService {
    /// Identity store
    user_repository: Arc<dyn UserRepository>,
    /// Session token issuing
    session_tokens: Arc<SessionTokenService>,
    /// Verified-email token gate
    verification_tokens: Arc<VerificationTokenService>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `session_tokens` - Service issuing session tokens
    /// * `verification_tokens` - Service checking verified-email tokens
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_tokens: Arc<SessionTokenService>,
        verification_tokens: Arc<VerificationTokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            session_tokens,
            verification_tokens,
            config,
        }
    }

    /// Register a new user whose email was confirmed by the identity provider
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Profile of the new user and a session token
    /// * `Err(DomainError::ValidationErr)` - Missing or malformed field
    /// * `Err(DomainError::Token(..))` - Verification token invalid or for another email
    /// * `Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))` - Email taken
    pub async fn register(&self, input: RegisterUser) -> DomainResult<AuthResponse> {
        let name = required(&input.name, "name")?;
        let email = valid_email(&input.email)?;
        let phone = valid_phone(&input.phone)?;
        required_password(&input.password, "password")?;
        required(&input.verified_token, "verifiedToken")?;

        self.verification_tokens.validate(&input.verified_token, &email)?;

        if self.user_repository.exists_by_email(&email).await? {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let password_hash = hash_password(&input.password, self.config.bcrypt_cost).await?;
        let user = self
            .user_repository
            .create(User::new(name, email, phone, password_hash))
            .await?;

        info!(user_id = %user.id, "User registered");
        self.auth_response(&user)
    }

    /// Log in with email and password.
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let email = required(email, "email").map(|e| normalize_email(&e))?;
        required_password(password, "password")?;

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials.into()),
        };

        if !verify_password(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");
        self.auth_response(&user)
    }

    /// Public profile of a user
    pub async fn profile(&self, user_id: Uuid) -> DomainResult<UserProfile> {
        Ok(self.load_user(user_id).await?.profile())
    }

    /// Change name and/or phone; omitted fields keep their value
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> DomainResult<UserProfile> {
        let name = name.map(|n| required(&n, "name")).transpose()?;
        let phone = phone.map(|p| valid_phone(&p)).transpose()?;

        let mut user = self.load_user(user_id).await?;
        user.update_profile(name, phone);
        let user = self.user_repository.update(user).await?;

        Ok(user.profile())
    }

    /// Switch to a newly verified email and hand out a fresh session token
    pub async fn update_email(
        &self,
        user_id: Uuid,
        new_email: &str,
        verified_token: &str,
    ) -> DomainResult<AuthResponse> {
        let email = valid_email(new_email)?;
        required(verified_token, "verifiedToken")?;
        self.verification_tokens.validate(verified_token, &email)?;

        let mut user = self.load_user(user_id).await?;
        if let Some(owner) = self.user_repository.find_by_email(&email).await? {
            if owner.id != user.id {
                return Err(AuthError::EmailAlreadyRegistered.into());
            }
        }

        user.change_email(email);
        let user = self.user_repository.update(user).await?;

        info!(user_id = %user.id, "Email updated");
        self.auth_response(&user)
    }

    /// Change password after checking the current one
    pub async fn update_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        required_password(old_password, "oldPassword")?;
        required_password(new_password, "newPassword")?;

        let mut user = self.load_user(user_id).await?;
        if !verify_password(old_password, &user.password_hash).await? {
            return Err(AuthError::IncorrectPassword.into());
        }

        let password_hash = hash_password(new_password, self.config.bcrypt_cost).await?;
        user.change_password_hash(password_hash);
        self.user_repository.update(user).await?;

        info!(user_id = %user_id, "Password updated");
        Ok(())
    }

    /// Start a password reset for a verified email.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - A fresh verification token for the same email
    /// * `Err(DomainError::NotFound)` - No account with that email
    pub async fn request_password_reset(&self, email: &str, verified_token: &str) -> DomainResult<String> {
        let email = valid_email(email)?;
        required(verified_token, "verifiedToken")?;
        self.verification_tokens.validate(verified_token, &email)?;

        if !self.user_repository.exists_by_email(&email).await? {
            return Err(DomainError::not_found("User"));
        }

        self.verification_tokens.issue(&email)
    }

    /// Store a new password for a verified email
    pub async fn reset_password(
        &self,
        email: &str,
        verified_token: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let email = valid_email(email)?;
        required(verified_token, "verifiedToken")?;
        required_password(new_password, "newPassword")?;
        self.verification_tokens.validate(verified_token, &email)?;

        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;

        let password_hash = hash_password(new_password, self.config.bcrypt_cost).await?;
        user.change_password_hash(password_hash);
        let user = self.user_repository.update(user).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Mint a verification token once the identity provider confirmed `email`
    pub fn verified_email_token(&self, email: &str) -> DomainResult<String> {
        let email = valid_email(email)?;
        self.verification_tokens.issue(&email)
    }

    async fn load_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))
    }

    fn auth_response(&self, user: &User) -> DomainResult<AuthResponse> {
        let token = self.session_tokens.issue(user.id)?;
        Ok(AuthResponse::new(user.profile(), token))
    }
}

fn required(value: &str, field: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value.to_string())
}

// Passwords are taken verbatim, only emptiness is checked
fn required_password(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn valid_email(value: &str) -> Result<String, ValidationError> {
    let email = normalize_email(&required(value, "email")?);
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

fn valid_phone(value: &str) -> Result<String, ValidationError> {
    let phone = required(value, "phone")?;
    if !is_valid_phone(&phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone)
}
