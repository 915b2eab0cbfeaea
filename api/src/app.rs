//! Application factory
//!
//! Builds the Actix-web application from the shared state: middleware,
//! the `/api/auth` and `/api/medicines` scopes and the JSON 404 fallback.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use mt_core::services::SessionVerifier;
use mt_shared::config::CorsConfig;

use crate::handlers::json_error_handler;
use crate::middleware::{create_cors, JwtAuth};
use crate::routes::{auth, medicine, oauth};
use crate::state::AppState;

/// HTTP-level settings that are not handler state
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors: CorsConfig,
    /// Upper bound for request bodies, image uploads included
    pub max_payload_size: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cors: CorsConfig::default(),
            max_payload_size: 10 * 1024 * 1024,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    sessions: web::Data<Arc<dyn SessionVerifier>>,
    settings: &HttpSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(sessions)
        .app_data(web::PayloadConfig::new(settings.max_payload_size))
        .app_data(
            web::JsonConfig::default()
                .limit(settings.max_payload_size)
                .error_handler(json_error_handler),
        )
        .wrap(create_cors(&settings.cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(auth_scope())
        .service(medicine_scope())
        .default_service(web::route().to(not_found))
}

fn auth_scope() -> actix_web::Scope {
    web::scope("/api/auth")
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/profile", web::get().to(auth::get_profile).wrap(JwtAuth::new()))
        .route("/profile", web::put().to(auth::update_profile).wrap(JwtAuth::new()))
        .route("/profile/email", web::put().to(auth::update_email).wrap(JwtAuth::new()))
        .route(
            "/profile/password",
            web::put().to(auth::update_password).wrap(JwtAuth::new()),
        )
        .route("/verified-reset-request", web::post().to(auth::verified_reset_request))
        .route("/reset-password-final-direct", web::post().to(auth::reset_password_final))
        .route("/google-verify", web::get().to(oauth::google_verify))
        .route("/google-verify/callback", web::get().to(oauth::google_verify_callback))
        .route(
            "/google-verify-email-update",
            web::get().to(oauth::google_verify_email_update),
        )
        .route(
            "/google-verify-email-update/callback",
            web::get().to(oauth::google_verify_email_update_callback),
        )
        .route("/google-password-reset", web::get().to(oauth::google_password_reset))
        .route(
            "/google-password-reset/callback",
            web::get().to(oauth::google_password_reset_callback),
        )
}

fn medicine_scope() -> actix_web::Scope {
    web::scope("/api/medicines")
        .route("/add", web::post().to(medicine::add_medicine).wrap(JwtAuth::new()))
        .route("/mine", web::get().to(medicine::my_medicines).wrap(JwtAuth::new()))
        .route(
            "/update/{id}",
            web::put().to(medicine::update_medicine).wrap(JwtAuth::new()),
        )
        .route(
            "/delete/{id}",
            web::delete().to(medicine::delete_medicine).wrap(JwtAuth::new()),
        )
        .route(
            "/available/{id}",
            web::put().to(medicine::make_available).wrap(JwtAuth::new()),
        )
        .route(
            "/donated/{id}",
            web::put().to(medicine::mark_donated).wrap(JwtAuth::new()),
        )
        .route("/discover", web::get().to(medicine::discover))
        .route("/dashboard", web::get().to(medicine::dashboard).wrap(JwtAuth::new()))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "medtrack-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
