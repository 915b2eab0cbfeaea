//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::UserProfile;

/// Result of registering, logging in or changing email: the user's public
/// profile plus a fresh session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: UserProfile,

    /// Signed session token, valid for the configured session lifetime
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: UserProfile, token: String) -> Self {
        Self { user, token }
    }
}
