//! Session token management
//!
//! Session tokens are stateless HS256 JWTs proving "caller is user X" for
//! seven days. Nothing is persisted; a token whose user no longer exists is
//! rejected at validation time.

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::{SessionTokenService, SessionVerifier};
