//! User entity representing a registered donor/recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the user's email was verified at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationProvider {
    /// Email confirmed through Google sign-in
    #[default]
    Google,
}

impl RegistrationProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationProvider::Google => "google",
        }
    }
}

impl std::str::FromStr for RegistrationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(RegistrationProvider::Google),
            _ => Err(format!("Invalid registration provider: {}", s)),
        }
    }
}

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name shown to recipients
    pub name: String,

    /// Lowercased, unique email
    pub email: String,

    /// Ten digit contact phone
    pub phone: String,

    /// bcrypt hash, never serialized to clients
    pub password_hash: String,

    pub provider: RegistrationProvider,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(name: String, email: String, phone: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            password_hash,
            provider: RegistrationProvider::Google,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces name and/or phone
    pub fn update_profile(&mut self, name: Option<String>, phone: Option<String>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        self.updated_at = Utc::now();
    }

    pub fn change_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn change_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Public projection without the password hash
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// What clients get to see of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub provider: RegistrationProvider,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            provider: user.provider,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "Asha".to_string(),
            "asha@example.com".to_string(),
            "9876543210".to_string(),
            "$2b$10$hash".to_string(),
        )
    }

    #[test]
    fn test_new_user_is_google_registered() {
        let user = user();
        assert_eq!(user.provider, RegistrationProvider::Google);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_update_profile_partial() {
        let mut user = user();
        user.update_profile(None, Some("9123456780".to_string()));
        assert_eq!(user.name, "Asha");
        assert_eq!(user.phone, "9123456780");
    }

    #[test]
    fn test_profile_omits_password() {
        let json = serde_json::to_value(user().profile()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["provider"], "google");
    }
}
