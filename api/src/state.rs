//! Services shared by all request handlers

use std::sync::Arc;

use mt_core::services::{AuthService, IdentityProvider, MedicineService};

/// Application state held in `web::Data`; built once at startup
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub medicines: Arc<MedicineService>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Frontend base URL verification callbacks redirect to
    pub frontend_url: String,
}
