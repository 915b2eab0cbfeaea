//! Google email verification.
//!
//! The start routes redirect the browser to Google; the callbacks mint a
//! short-lived verification token for the confirmed email and send the
//! browser back to the matching frontend page with `verifiedEmail` and
//! `verifiedToken` query parameters.

use actix_web::{http::header::LOCATION, web, HttpResponse};
use tracing::{info, warn};
use url::Url;

use mt_core::errors::DomainError;
use mt_core::services::VerificationPurpose;

use crate::dto::auth::{VerifyCallbackQuery, VerifyStartQuery};
use crate::handlers::handle_domain_error;
use crate::state::AppState;

/// Handler for GET /api/auth/google-verify
///
/// `?purpose=` selects the flow; registration when absent.
pub async fn google_verify(state: web::Data<AppState>, query: web::Query<VerifyStartQuery>) -> HttpResponse {
    let purpose = match query.purpose.as_deref() {
        None | Some("") => VerificationPurpose::Register,
        Some(raw) => match raw.parse() {
            Ok(purpose) => purpose,
            Err(message) => return handle_domain_error(DomainError::Validation { message }),
        },
    };
    start(&state, purpose)
}

/// Handler for GET /api/auth/google-verify-email-update
pub async fn google_verify_email_update(state: web::Data<AppState>) -> HttpResponse {
    start(&state, VerificationPurpose::EmailUpdate)
}

/// Handler for GET /api/auth/google-password-reset
pub async fn google_password_reset(state: web::Data<AppState>) -> HttpResponse {
    start(&state, VerificationPurpose::PasswordReset)
}

/// Handler for GET /api/auth/google-verify/callback
pub async fn google_verify_callback(
    state: web::Data<AppState>,
    query: web::Query<VerifyCallbackQuery>,
) -> HttpResponse {
    callback(&state, VerificationPurpose::Register, query.into_inner()).await
}

/// Handler for GET /api/auth/google-verify-email-update/callback
pub async fn google_verify_email_update_callback(
    state: web::Data<AppState>,
    query: web::Query<VerifyCallbackQuery>,
) -> HttpResponse {
    callback(&state, VerificationPurpose::EmailUpdate, query.into_inner()).await
}

/// Handler for GET /api/auth/google-password-reset/callback
pub async fn google_password_reset_callback(
    state: web::Data<AppState>,
    query: web::Query<VerifyCallbackQuery>,
) -> HttpResponse {
    callback(&state, VerificationPurpose::PasswordReset, query.into_inner()).await
}

fn start(state: &AppState, purpose: VerificationPurpose) -> HttpResponse {
    match state.identity.authorization_url(purpose, purpose.as_str()) {
        Ok(url) => redirect(&url),
        Err(error) => handle_domain_error(error),
    }
}

async fn callback(state: &AppState, purpose: VerificationPurpose, query: VerifyCallbackQuery) -> HttpResponse {
    if let Some(error) = query.error {
        warn!(purpose = %purpose, error = %error, "Google verification was cancelled or denied");
        return frontend_redirect(state, purpose, &[("error", "verification_failed")]);
    }

    let code = match query.code.filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => return frontend_redirect(state, purpose, &[("error", "verification_failed")]),
    };

    let verified = match state.identity.verified_email(purpose, &code).await {
        Ok(email) => state
            .auth
            .verified_email_token(&email)
            .map(|token| (email, token)),
        Err(error) => Err(error),
    };

    match verified {
        Ok((email, token)) => {
            info!(purpose = %purpose, "Email verified through Google");
            frontend_redirect(
                state,
                purpose,
                &[("verifiedEmail", email.as_str()), ("verifiedToken", token.as_str())],
            )
        }
        Err(error) => {
            warn!(purpose = %purpose, error = %error, "Google verification failed");
            frontend_redirect(state, purpose, &[("error", "verification_failed")])
        }
    }
}

/// Redirect to the frontend page of `purpose` with `params` in the query
fn frontend_redirect(state: &AppState, purpose: VerificationPurpose, params: &[(&str, &str)]) -> HttpResponse {
    let target = format!("{}{}", state.frontend_url.trim_end_matches('/'), purpose.frontend_path());
    match Url::parse_with_params(&target, params) {
        Ok(url) => redirect(url.as_str()),
        Err(e) => handle_domain_error(DomainError::internal(format!("Invalid frontend URL: {}", e))),
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}
