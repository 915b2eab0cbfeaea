//! Google OAuth2 identity provider
//!
//! Authorization-code flow: the browser is sent to Google, the callback
//! `code` is exchanged for an access token, and the userinfo endpoint
//! reports the account email. Only emails Google marks as verified are
//! accepted.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use mt_core::errors::DomainError;
use mt_core::services::{IdentityProvider, VerificationPurpose};
use mt_shared::config::GoogleOAuthConfig;

use crate::InfrastructureError;

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

/// Google as the email verification authority
pub struct GoogleIdentityProvider {
    client: Client,
    config: GoogleOAuthConfig,
    /// Public base URL of this API; callback routes hang off it
    public_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(config: GoogleOAuthConfig, public_url: impl Into<String>) -> Result<Self, InfrastructureError> {
        if !config.is_configured() {
            warn!("Google OAuth client credentials are not set; email verification will fail");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            config,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Callback URL registered with Google for `purpose`
    pub fn redirect_uri(&self, purpose: VerificationPurpose) -> String {
        format!("{}{}", self.public_url, purpose.callback_path())
    }

    async fn exchange_code(&self, purpose: VerificationPurpose, code: &str) -> Result<String, InfrastructureError> {
        let redirect_uri = self.redirect_uri(purpose);
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.client.post(&self.config.token_url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InfrastructureError::IdentityProvider(format!(
                "Token exchange failed ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo, InfrastructureError> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InfrastructureError::IdentityProvider(format!(
                "Userinfo request failed ({})",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, purpose: VerificationPurpose, state: &str) -> Result<String, DomainError> {
        let redirect_uri = self.redirect_uri(purpose);
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid email"),
                ("state", state),
            ],
        )
        .map_err(|e| DomainError::internal(format!("Invalid Google authorization URL: {}", e)))?;

        Ok(url.into())
    }

    async fn verified_email(&self, purpose: VerificationPurpose, code: &str) -> Result<String, DomainError> {
        debug!(purpose = %purpose, "Exchanging Google authorization code");

        let access_token = self.exchange_code(purpose, code).await.map_err(|e| {
            warn!(purpose = %purpose, error = %e, "Google code exchange rejected");
            DomainError::Unauthorized
        })?;
        let user = self.fetch_user_info(&access_token).await?;

        match user.email {
            Some(email) if user.email_verified => {
                info!(purpose = %purpose, "Google confirmed email ownership");
                Ok(email)
            }
            _ => {
                warn!(purpose = %purpose, "Google account has no verified email");
                Err(DomainError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GoogleIdentityProvider {
        let config = GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            ..Default::default()
        };
        GoogleIdentityProvider::new(config, "https://api.medtrack.test/").unwrap()
    }

    #[test]
    fn test_redirect_uri_per_purpose() {
        let provider = provider();
        assert_eq!(
            provider.redirect_uri(VerificationPurpose::Register),
            "https://api.medtrack.test/api/auth/google-verify/callback"
        );
        assert_eq!(
            provider.redirect_uri(VerificationPurpose::PasswordReset),
            "https://api.medtrack.test/api/auth/google-password-reset/callback"
        );
    }

    #[test]
    fn test_authorization_url_carries_client_and_state() {
        let url = provider()
            .authorization_url(VerificationPurpose::EmailUpdate, "nonce-1")
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let query: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.host_str(), Some("accounts.google.com"));
        assert!(query.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(query.contains(&("response_type".to_string(), "code".to_string())));
        assert!(query.contains(&("state".to_string(), "nonce-1".to_string())));
        assert!(query.contains(&(
            "redirect_uri".to_string(),
            "https://api.medtrack.test/api/auth/google-verify-email-update/callback".to_string()
        )));
    }
}
