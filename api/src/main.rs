use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mt_api::{create_app, AppState, HttpSettings};
use mt_core::repositories::{MedicineRepository, UserRepository};
use mt_core::services::{
    AuthService, AuthServiceConfig, ExpirySweeper, IdentityProvider, MedicineService, SessionTokenService,
    SessionVerifier, TokenServiceConfig, VerificationTokenService,
};
use mt_infra::database::{DatabasePool, MySqlMedicineRepository, MySqlUserRepository};
use mt_infra::oauth::GoogleIdentityProvider;
use mt_infra::storage::create_image_storage;
use mt_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter())),
        )
        .init();

    info!("Starting MedTrack API Server ({})", config.environment);

    let issues = config.production_issues();
    if !issues.is_empty() {
        for issue in &issues {
            error!("Configuration problem: {}", issue);
        }
        anyhow::bail!("refusing to start in production with {} configuration problem(s)", issues.len());
    }
    if config.auth.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set; using the insecure default secret");
    }

    // Persistence
    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to the database")?;
    pool.run_migrations().await.context("failed to apply migrations")?;

    let users: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let medicines: Arc<dyn MedicineRepository> = Arc::new(MySqlMedicineRepository::new(pool.get_pool().clone()));

    // Services
    let token_config = TokenServiceConfig::from(&config.auth.jwt);
    let sessions = Arc::new(SessionTokenService::new(users.clone(), token_config.clone()));
    let verification = Arc::new(VerificationTokenService::new(token_config));
    let auth = Arc::new(AuthService::new(
        users,
        sessions.clone(),
        verification,
        AuthServiceConfig::from(&config.auth),
    ));

    let image_storage = create_image_storage(&config.storage).context("failed to set up image storage")?;
    let medicine_service = Arc::new(MedicineService::new(medicines.clone(), image_storage));

    let identity: Arc<dyn IdentityProvider> = Arc::new(
        GoogleIdentityProvider::new(config.auth.google.clone(), config.server.public_url.clone())
            .context("failed to set up Google identity provider")?,
    );

    let sweeper = Arc::new(ExpirySweeper::new(medicines, config.sweeper.clone()));
    let sweeper_handle = sweeper.start_background_task();

    let state = web::Data::new(AppState {
        auth,
        medicines: medicine_service,
        identity,
        frontend_url: config.auth.google.frontend_url.clone(),
    });
    let session_verifier: Arc<dyn SessionVerifier> = sessions;
    let session_verifier = web::Data::new(session_verifier);
    let settings = HttpSettings {
        cors: config.cors.clone(),
        max_payload_size: config.server.max_payload_size,
    };

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone(), session_verifier.clone(), &settings));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(handle) = sweeper_handle {
        handle.abort();
    }
    pool.close().await;
    info!("MedTrack API Server stopped");

    Ok(())
}
