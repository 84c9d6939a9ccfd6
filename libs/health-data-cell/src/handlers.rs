// libs/health-data-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{HealthDataError, RecordHealthDataRequest};
use crate::services::records::HealthRecordService;

fn map_health_data_error(e: HealthDataError) -> AppError {
    match e {
        HealthDataError::Validation(msg) => AppError::ValidationError(msg),
        HealthDataError::Database(msg) => AppError::Database(msg),
    }
}

/// Record the caller's own metrics for a day.
#[axum::debug_handler]
pub async fn record_health_data(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RecordHealthDataRequest>,
) -> Result<Json<Value>, AppError> {
    let recorded_at = request.validate().map_err(map_health_data_error)?;

    let service = HealthRecordService::new(&state);
    let record = service
        .record_metrics(&user.id, recorded_at, &request, auth.token())
        .await
        .map_err(map_health_data_error)?;

    Ok(Json(json!({
        "success": true,
        "data": record
    })))
}

/// The caller's metric history.
#[axum::debug_handler]
pub async fn list_health_data(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = HealthRecordService::new(&state);
    let records = service
        .list_records(&user.id, auth.token())
        .await
        .map_err(map_health_data_error)?;

    Ok(Json(json!({
        "success": true,
        "data": records
    })))
}
