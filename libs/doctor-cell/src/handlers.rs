// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::DoctorError;
use crate::services::directory::DoctorDirectoryService;

const DEFAULT_TOP_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct TopDoctorsQuery {
    pub limit: Option<usize>,
}

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::Database(msg) => AppError::Database(msg),
    }
}

/// List approved doctors for the booking picker.
#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorDirectoryService::new(&state);
    let doctors = service.list_doctors(auth.token()).await
        .map_err(map_doctor_error)?;

    Ok(Json(json!(doctors)))
}

/// Doctors ranked by completed consultations.
#[axum::debug_handler]
pub async fn top_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<TopDoctorsQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);

    let service = DoctorDirectoryService::new(&state);
    let doctors = service.top_doctors(limit, auth.token()).await
        .map_err(map_doctor_error)?;

    Ok(Json(json!(doctors)))
}
