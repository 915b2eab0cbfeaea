//! Handlers under `/api/medicines`.
//!
//! Every route except `/discover` runs behind `JwtAuth` and acts on behalf
//! of the authenticated donor.

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use mt_core::errors::DomainError;

use crate::dto::medicine::{DashboardResponse, DiscoverResponse, MedicineEnvelope, MedicineResponse, MsgResponse};
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::multipart::MedicineForm;
use crate::state::AppState;

/// Handler for POST /api/medicines/add (multipart)
///
/// The listing starts out private. An image that fails to upload is
/// dropped; the listing is still created.
pub async fn add_medicine(
    state: web::Data<AppState>,
    auth: AuthContext,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let result = async {
        let form = MedicineForm::parse(&req, body).await?;
        let draft = form.draft()?;
        state.medicines.create(auth.user_id, draft, form.image).await
    }
    .await;

    match result {
        Ok(medicine) => HttpResponse::Created().json(MedicineEnvelope::new("Medicine added", medicine)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/medicines/mine
pub async fn my_medicines(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.medicines.list_mine(auth.user_id).await {
        Ok(medicines) => HttpResponse::Ok().json(
            medicines
                .into_iter()
                .map(MedicineResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for PUT /api/medicines/update/{id} (multipart)
pub async fn update_medicine(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let result = async {
        let id = medicine_id(&path)?;
        let form = MedicineForm::parse(&req, body).await?;
        let update = form.update()?;
        state.medicines.update(id, auth.user_id, update, form.image).await
    }
    .await;

    match result {
        Ok(medicine) => HttpResponse::Ok().json(MedicineEnvelope::new("Medicine updated", medicine)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for DELETE /api/medicines/delete/{id}
pub async fn delete_medicine(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> HttpResponse {
    let result = match medicine_id(&path) {
        Ok(id) => state.medicines.delete(id, auth.user_id).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(MsgResponse {
            msg: "Medicine deleted".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for PUT /api/medicines/available/{id}
pub async fn make_available(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> HttpResponse {
    let result = match medicine_id(&path) {
        Ok(id) => state.medicines.publish(id, auth.user_id).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(medicine) => HttpResponse::Ok().json(MedicineEnvelope::new("Medicine is now available", medicine)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for PUT /api/medicines/donated/{id}
pub async fn mark_donated(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> HttpResponse {
    let result = match medicine_id(&path) {
        Ok(id) => state.medicines.mark_donated(id, auth.user_id).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(medicine) => HttpResponse::Ok().json(MedicineEnvelope::new("Medicine marked as donated", medicine)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/medicines/discover (public)
pub async fn discover(state: web::Data<AppState>) -> HttpResponse {
    match state.medicines.discover().await {
        Ok(items) => HttpResponse::Ok().json(
            items
                .into_iter()
                .map(DiscoverResponse::from)
                .collect::<Vec<_>>(),
        ),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/medicines/dashboard
pub async fn dashboard(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.medicines.dashboard(auth.user_id).await {
        Ok(stats) => HttpResponse::Ok().json(DashboardResponse::from(stats)),
        Err(error) => handle_domain_error(error),
    }
}

/// Ids that are not UUIDs cannot name a stored medicine
fn medicine_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::not_found("Medicine"))
}
