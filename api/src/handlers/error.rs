//! Conversion of domain errors into HTTP responses.
//!
//! Every handler funnels its `DomainError` through [`handle_domain_error`],
//! so status codes and error codes are decided in one place. Internal
//! failures are logged with their cause and answered with a generic message.

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use tracing::{debug, error};
use validator::ValidationErrors;

use mt_core::errors::{AuthError, DomainError, TokenError, ValidationError};

use crate::dto::{error_codes, ErrorResponse};

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, response) = match &error {
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone()),
        ),
        DomainError::ValidationErr(validation) => (StatusCode::BAD_REQUEST, validation_response(validation)),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(error_codes::NOT_FOUND, format!("{} not found", resource)),
        ),
        DomainError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::UNAUTHORIZED, "Not authorized"),
        ),
        DomainError::Forbidden { message } => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new(error_codes::FORBIDDEN, message.clone()),
        ),
        DomainError::InvalidStatusTransition { from, to } => (
            StatusCode::CONFLICT,
            ErrorResponse::new(
                error_codes::INVALID_TRANSITION,
                format!("Cannot change status from {} to {}", from, to),
            )
            .add_detail("from", from)
            .add_detail("to", to),
        ),
        DomainError::Auth(auth) => auth_error(auth),
        DomainError::Token(token) => token_error(token),
        DomainError::Internal { .. } => internal_error(),
    };

    if status.is_server_error() {
        error!(error = %error, "Request failed with internal error");
    } else {
        debug!(status = status.as_u16(), error = %error, "Request rejected");
    }

    HttpResponse::build(status).json(response)
}

fn auth_error(error: &AuthError) -> (StatusCode, ErrorResponse) {
    match error {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, "Invalid credentials"),
        ),
        AuthError::EmailAlreadyRegistered => (
            StatusCode::CONFLICT,
            ErrorResponse::new(error_codes::CONFLICT, "Email already registered"),
        ),
        AuthError::IncorrectPassword => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::INCORRECT_PASSWORD, "Old password is incorrect"),
        ),
        AuthError::UserNotFound => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(error_codes::NOT_FOUND, "User not found"),
        ),
        AuthError::PasswordHashFailed => internal_error(),
    }
}

fn token_error(error: &TokenError) -> (StatusCode, ErrorResponse) {
    match error {
        TokenError::SessionInvalid => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::UNAUTHORIZED, "Invalid or expired token"),
        ),
        TokenError::TokenExpired => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::TOKEN_EXPIRED, "Token expired"),
        ),
        TokenError::InvalidTokenFormat => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(error_codes::TOKEN_INVALID, "Invalid token"),
        ),
        TokenError::InvalidVerificationToken => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                error_codes::TOKEN_INVALID,
                "Invalid or expired Google verification token",
            ),
        ),
        TokenError::EmailMismatch => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                error_codes::EMAIL_MISMATCH,
                "Verified email does not match entered email",
            ),
        ),
        TokenError::TokenGenerationFailed => internal_error(),
    }
}

fn validation_response(error: &ValidationError) -> ErrorResponse {
    let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, error.to_string());
    match error.field() {
        Some(field) => response.add_detail("field", field),
        None => response,
    }
}

fn internal_error() -> (StatusCode, ErrorResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new(error_codes::INTERNAL_ERROR, "Server error"),
    )
}

/// 400 for a request body that failed `validator` checks
pub fn validation_error(errors: &ValidationErrors) -> HttpResponse {
    debug!(errors = %errors, "Request body failed validation");

    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request data".to_string());

    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, message).add_detail("validation_errors", errors),
    )
}

/// Answer malformed JSON bodies in the common error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected JSON payload");
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::BAD_REQUEST,
        format!("Invalid JSON body: {}", err),
    ));
    actix_web::error::InternalError::from_response(err, response).into()
}
