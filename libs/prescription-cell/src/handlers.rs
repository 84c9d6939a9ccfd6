// libs/prescription-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    CreatePrescriptionRequest, PrescriptionError, PrescriptionStatus, UpdatePrescriptionRequest,
};
use crate::services::prescriptions::PrescriptionService;

#[derive(Debug, Deserialize)]
pub struct PrescriptionQuery {
    pub status: Option<PrescriptionStatus>,
}

fn map_prescription_error(e: PrescriptionError) -> AppError {
    match e {
        PrescriptionError::NotFound => AppError::NotFound("Prescription not found".to_string()),
        PrescriptionError::Validation(msg) => AppError::ValidationError(msg),
        PrescriptionError::Database(msg) => AppError::Database(msg),
    }
}

/// List prescriptions: doctors see those they issued, patients their own.
#[axum::debug_handler]
pub async fn list_prescriptions(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<PrescriptionQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let status = query.status.unwrap_or(PrescriptionStatus::Active);
    let service = PrescriptionService::new(&state);

    let prescriptions = if user.is_doctor() {
        service.list_for_doctor(&user.id, status, auth.token()).await
    } else {
        service.list_for_patient(&user.id, status, auth.token()).await
    }
    .map_err(map_prescription_error)?;

    Ok(Json(json!(prescriptions)))
}

/// Issue a prescription; doctors only.
#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Forbidden("Only doctors can issue prescriptions".to_string()));
    }

    let prescription = request.validate().map_err(map_prescription_error)?;

    let service = PrescriptionService::new(&state);
    let created = service
        .create_prescription(&user.id, prescription, auth.token())
        .await
        .map_err(map_prescription_error)?;

    Ok(Json(json!(created)))
}

/// Update a prescription's status; doctors only.
#[axum::debug_handler]
pub async fn update_prescription(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Forbidden("Only doctors can update prescriptions".to_string()));
    }

    let service = PrescriptionService::new(&state);
    let updated = service
        .update_status(request.id, request.status, auth.token())
        .await
        .map_err(map_prescription_error)?;

    Ok(Json(json!(updated)))
}
