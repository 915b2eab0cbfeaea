use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use mt_core::domain::entities::user::{RegistrationProvider, UserProfile};
use mt_core::domain::value_objects::AuthResponse;
use mt_core::services::RegisterUser;

/// Body of `POST /api/auth/register`.
///
/// Missing fields deserialize as empty strings and are rejected by
/// validation, so clients get a field-level 400 instead of a parse error.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Exactly 10 digits; checked by the auth service
    #[serde(default)]
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Issued by the Google verification callback
    #[serde(default)]
    #[validate(length(min = 1, message = "You must verify your email with Google before registering"))]
    pub verified_token: String,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(request: RegisterRequest) -> Self {
        RegisterUser {
            name: request.name,
            email: request.email,
            phone: request.phone,
            password: request.password,
            verified_token: request.verified_token,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of `PUT /api/auth/profile`; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Please verify the new email using Google before updating"))]
    pub verified_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Body of `POST /api/auth/verified-reset-request`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Verified token is required"))]
    pub verified_token: String,
}

/// Body of `POST /api/auth/reset-password-final-direct`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Verified token is required"))]
    pub verified_token: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Query of the Google verification start route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyStartQuery {
    /// `register` (default), `email_update` or `password_reset`
    pub purpose: Option<String>,
}

/// Query Google appends to the callback URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub provider: RegistrationProvider,
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            provider: profile.provider,
            created_at: profile.created_at,
        }
    }
}

/// Register and login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub msg: String,
    pub user: UserResponse,
    pub token: String,
}

impl SessionResponse {
    pub fn new(msg: impl Into<String>, auth: AuthResponse) -> Self {
        Self {
            msg: msg.into(),
            user: auth.user.into(),
            token: auth.token,
        }
    }
}

/// Email change result; the old session token carries the old identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailUpdatedResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetTokenResponse {
    pub message: String,
    pub reset_token: String,
}
