//! Handlers under `/api/auth`: registration, login, profile and password
//! reset.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{
    EmailUpdatedResponse, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest,
    ResetRequest, ResetTokenResponse, SessionResponse, UpdateEmailRequest, UpdatePasswordRequest,
    UpdateProfileRequest, UserResponse,
};
use crate::handlers::{handle_domain_error, validation_error};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/auth/register
///
/// Requires a verification token proving ownership of `email`.
///
/// ## Responses
/// - 201 Created: `{msg, user, token}`
/// - 400 Bad Request: missing fields, bad phone, invalid token, email mismatch
/// - 409 Conflict: email already registered
pub async fn register(state: web::Data<AppState>, request: web::Json<RegisterRequest>) -> HttpResponse {
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state.auth.register(request.into()).await {
        Ok(auth) => HttpResponse::Created().json(SessionResponse::new("Registration success", auth)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/auth/login
pub async fn login(state: web::Data<AppState>, request: web::Json<LoginRequest>) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state.auth.login(&request.email, &request.password).await {
        Ok(auth) => HttpResponse::Ok().json(SessionResponse::new("Login success", auth)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/auth/profile
pub async fn get_profile(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.auth.profile(auth.user_id).await {
        Ok(profile) => HttpResponse::Ok().json(UserResponse::from(profile)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for PUT /api/auth/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    match state
        .auth
        .update_profile(auth.user_id, request.name, request.phone)
        .await
    {
        Ok(profile) => HttpResponse::Ok().json(UserResponse::from(profile)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for PUT /api/auth/profile/email
///
/// Returns a fresh session token alongside the updated profile.
pub async fn update_email(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<UpdateEmailRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state
        .auth
        .update_email(auth.user_id, &request.email, &request.verified_token)
        .await
    {
        Ok(updated) => HttpResponse::Ok().json(EmailUpdatedResponse {
            message: "Email updated successfully".to_string(),
            user: updated.user.into(),
            token: updated.token,
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for PUT /api/auth/profile/password
pub async fn update_password(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<UpdatePasswordRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state
        .auth
        .update_password(auth.user_id, &request.old_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Password updated successfully")),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/auth/verified-reset-request
///
/// Hands back a fresh reset token for an existing, freshly verified email.
pub async fn verified_reset_request(
    state: web::Data<AppState>,
    request: web::Json<ResetRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state
        .auth
        .request_password_reset(&request.email, &request.verified_token)
        .await
    {
        Ok(reset_token) => HttpResponse::Ok().json(ResetTokenResponse {
            message: "Email verified, you can now reset your password".to_string(),
            reset_token,
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/auth/reset-password-final-direct
pub async fn reset_password_final(
    state: web::Data<AppState>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state
        .auth
        .reset_password(&request.email, &request.verified_token, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Password reset successful")),
        Err(error) => handle_domain_error(error),
    }
}
