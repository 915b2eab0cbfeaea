//! Authentication service module
//!
//! Account flows over the identity store and the token services:
//! - Registration gated by a verified-email token
//! - Email and password login
//! - Profile, email and password changes
//! - Password reset gated by a verified-email token

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, RegisterUser};
