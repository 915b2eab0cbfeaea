//! # MedTrack API
//!
//! Actix-web presentation layer: routes, request/response DTOs, session
//! middleware and the mapping of domain errors to HTTP responses.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod routes;
pub mod state;

pub use app::{create_app, HttpSettings};
pub use state::AppState;
