//! Specific error types for authentication, tokens and field validation
//!
//! `DomainError` bridges these through `#[from]`, so services can return
//! them with `?` and the presentation layer decides the HTTP status.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Old password is incorrect")]
    IncorrectPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing failed")]
    PasswordHashFailed,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// Session token missing, malformed, expired or for a vanished user
    #[error("Not authorized")]
    SessionInvalid,

    /// Verification token failed signature or expiry checks
    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    /// Verification token was minted for a different email
    #[error("Verified email does not match")]
    EmailMismatch,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Field validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid format for field: {field}")]
    InvalidFormat { field: String },

    #[error("Value out of range for field: {field} (min: {min})")]
    OutOfRange { field: String, min: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Phone must be exactly 10 digits")]
    InvalidPhone,

    #[error("Invalid date format for field: {field}")]
    InvalidDate { field: String },
}

impl ValidationError {
    /// Shorthand for a missing or blank field
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::RequiredField {
            field: field.into(),
        }
    }

    /// Name of the offending field, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::RequiredField { field }
            | ValidationError::InvalidFormat { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidDate { field } => Some(field),
            ValidationError::InvalidEmail => Some("email"),
            ValidationError::InvalidPhone => Some("phone"),
        }
    }
}
