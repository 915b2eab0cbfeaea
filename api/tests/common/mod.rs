//! Shared harness for the HTTP integration tests: the real app wired to
//! in-memory repositories, mock image storage and a scripted identity
//! provider.

#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use std::sync::Arc;

use mt_api::{AppState, HttpSettings};
use mt_core::domain::entities::user::User;
use mt_core::errors::DomainError;
use mt_core::repositories::{MockMedicineRepository, MockUserRepository, UserRepository};
use mt_core::services::{
    AuthService, AuthServiceConfig, IdentityProvider, MedicineService, SessionTokenService, SessionVerifier,
    TokenServiceConfig, VerificationPurpose, VerificationTokenService,
};
use mt_infra::storage::MockImageStorage;

pub const FRONTEND_URL: &str = "https://app.medtrack.test";
pub const GOOD_CODE: &str = "good-code";
pub const GOOGLE_EMAIL: &str = "verified@example.com";
pub const BOUNDARY: &str = "----medtrack-test-boundary";

/// Identity provider that accepts exactly one authorization code
pub struct ScriptedIdentityProvider;

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    fn authorization_url(&self, purpose: VerificationPurpose, state: &str) -> Result<String, DomainError> {
        Ok(format!(
            "https://idp.test/auth?redirect={}&state={}",
            purpose.callback_path(),
            state
        ))
    }

    async fn verified_email(&self, _purpose: VerificationPurpose, code: &str) -> Result<String, DomainError> {
        if code == GOOD_CODE {
            Ok(GOOGLE_EMAIL.to_string())
        } else {
            Err(DomainError::Unauthorized)
        }
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub sessions: web::Data<Arc<dyn SessionVerifier>>,
    pub users: MockUserRepository,
    pub medicines: MockMedicineRepository,
    pub storage: MockImageStorage,
    pub session_tokens: Arc<SessionTokenService>,
    pub verification: Arc<VerificationTokenService>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = MockUserRepository::new();
        let medicines = MockMedicineRepository::new(users.clone());
        let storage = MockImageStorage::new();

        let token_config = TokenServiceConfig::default();
        let session_tokens = Arc::new(SessionTokenService::new(Arc::new(users.clone()), token_config.clone()));
        let verification = Arc::new(VerificationTokenService::new(token_config));

        let auth = AuthService::new(
            Arc::new(users.clone()),
            session_tokens.clone(),
            verification.clone(),
            AuthServiceConfig { bcrypt_cost: 4 },
        );
        let medicine_service = MedicineService::new(Arc::new(medicines.clone()), Arc::new(storage.clone()));

        let state = web::Data::new(AppState {
            auth: Arc::new(auth),
            medicines: Arc::new(medicine_service),
            identity: Arc::new(ScriptedIdentityProvider),
            frontend_url: FRONTEND_URL.to_string(),
        });
        let verifier: Arc<dyn SessionVerifier> = session_tokens.clone();

        Self {
            state,
            sessions: web::Data::new(verifier),
            users,
            medicines,
            storage,
            session_tokens,
            verification,
        }
    }

    pub fn settings(&self) -> HttpSettings {
        HttpSettings::default()
    }

    /// Store a donor directly and return it with a session token
    pub async fn donor(&self, name: &str, email: &str) -> (User, String) {
        let user = self
            .users
            .create(User::new(
                name.to_string(),
                email.to_string(),
                "9876543210".to_string(),
                "not-a-real-hash".to_string(),
            ))
            .await
            .unwrap();
        let token = self.session_tokens.issue(user.id).unwrap();
        (user, token)
    }
}

/// Build a `multipart/form-data` body from text fields and an optional
/// `(file_name, bytes)` image
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n\
                 Content-Type: image/png\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (actix_web::http::header::AUTHORIZATION, format!("Bearer {}", token))
}
