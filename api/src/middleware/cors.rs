//! CORS middleware built from `CorsConfig`.
//!
//! With no configured origins any origin is accepted, which suits local
//! development against the frontend dev server.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use mt_shared::config::CorsConfig;

/// Creates a CORS middleware instance for the configured origins
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(config.max_age);

    if config.is_permissive() {
        info!("Configuring permissive CORS (no ALLOWED_ORIGINS set)");
        return cors.allow_any_origin();
    }

    config.allowed_origins.iter().fold(cors, |cors, origin| {
        info!("Adding allowed origin: {}", origin);
        cors.allowed_origin(origin)
    })
}
