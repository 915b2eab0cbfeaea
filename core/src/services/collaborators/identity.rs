//! External identity provider port

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Flow an email verification belongs to.
///
/// Selects the OAuth callback and the frontend page the browser lands on
/// once the provider confirmed the email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationPurpose {
    Register,
    EmailUpdate,
    PasswordReset,
}

impl VerificationPurpose {
    pub const ALL: [VerificationPurpose; 3] = [
        VerificationPurpose::Register,
        VerificationPurpose::EmailUpdate,
        VerificationPurpose::PasswordReset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationPurpose::Register => "register",
            VerificationPurpose::EmailUpdate => "email_update",
            VerificationPurpose::PasswordReset => "password_reset",
        }
    }

    /// Path of the API route that starts the flow
    pub fn start_path(&self) -> &'static str {
        match self {
            VerificationPurpose::Register => "/api/auth/google-verify",
            VerificationPurpose::EmailUpdate => "/api/auth/google-verify-email-update",
            VerificationPurpose::PasswordReset => "/api/auth/google-password-reset",
        }
    }

    /// Path of the API route the provider redirects back to
    pub fn callback_path(&self) -> String {
        format!("{}/callback", self.start_path())
    }

    /// Frontend page receiving `verifiedEmail` and `verifiedToken`
    pub fn frontend_path(&self) -> &'static str {
        match self {
            VerificationPurpose::Register => "/register",
            VerificationPurpose::EmailUpdate => "/profile",
            VerificationPurpose::PasswordReset => "/forgot-password",
        }
    }
}

impl fmt::Display for VerificationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(VerificationPurpose::Register),
            "email_update" | "email-update" => Ok(VerificationPurpose::EmailUpdate),
            "password_reset" | "password-reset" => Ok(VerificationPurpose::PasswordReset),
            _ => Err(format!("Unknown verification purpose: {}", s)),
        }
    }
}

/// Identity provider confirming that the caller controls an email address
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to in order to sign in at the provider.
    ///
    /// `state` is echoed back on the callback.
    fn authorization_url(&self, purpose: VerificationPurpose, state: &str) -> Result<String, DomainError>;

    /// Exchange the callback `code` for the account's verified email
    ///
    /// # Returns
    /// * `Ok(String)` - Email the provider reports as verified
    /// * `Err(DomainError::Unauthorized)` - Code rejected or email unverified
    async fn verified_email(&self, purpose: VerificationPurpose, code: &str) -> Result<String, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_paths() {
        assert_eq!(
            VerificationPurpose::Register.callback_path(),
            "/api/auth/google-verify/callback"
        );
        assert_eq!(
            VerificationPurpose::EmailUpdate.callback_path(),
            "/api/auth/google-verify-email-update/callback"
        );
        assert_eq!(VerificationPurpose::PasswordReset.frontend_path(), "/forgot-password");
    }

    #[test]
    fn test_purpose_parse() {
        for purpose in VerificationPurpose::ALL {
            assert_eq!(purpose.as_str().parse::<VerificationPurpose>().unwrap(), purpose);
        }
        assert_eq!(
            "password-reset".parse::<VerificationPurpose>().unwrap(),
            VerificationPurpose::PasswordReset
        );
        assert!("login".parse::<VerificationPurpose>().is_err());
    }
}
