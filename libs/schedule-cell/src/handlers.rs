// libs/schedule-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateTimeSlotRequest, ScheduleError};
use crate::services::schedule::ScheduleService;

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    #[serde(rename = "doctorId")]
    pub doctor_id: Option<Uuid>,
}

fn map_schedule_error(e: ScheduleError) -> AppError {
    match e {
        ScheduleError::NotFound => AppError::NotFound("Time slot not found".to_string()),
        ScheduleError::Conflict => {
            AppError::Conflict("A time slot already exists in this interval".to_string())
        }
        ScheduleError::SlotBooked => {
            AppError::BadRequest("Cannot delete a booked time slot".to_string())
        }
        ScheduleError::NotOwner => {
            AppError::Forbidden("Time slot belongs to another doctor".to_string())
        }
        ScheduleError::Validation(msg) => AppError::ValidationError(msg),
        ScheduleError::Database(msg) => AppError::Database(msg),
    }
}

/// Create an availability slot for the calling doctor.
#[axum::debug_handler]
pub async fn create_time_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Forbidden("Only doctors can manage schedules".to_string()));
    }

    let candidate = request.validate().map_err(map_schedule_error)?;

    let service = ScheduleService::new(&state);
    let slot = service.create_time_slot(&user.id, candidate, auth.token()).await
        .map_err(map_schedule_error)?;

    Ok(Json(json!(slot)))
}

/// With `doctorId`, list that doctor's future unbooked slots (patient view);
/// without it, list all of the calling doctor's own future slots.
#[axum::debug_handler]
pub async fn list_time_slots(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ScheduleQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let slots = match query.doctor_id {
        Some(doctor_id) => {
            service.available_slots(doctor_id, auth.token()).await
                .map_err(map_schedule_error)?
        }
        None => {
            if !user.is_doctor() {
                return Err(AppError::Forbidden("Not authorized to view this schedule".to_string()));
            }
            service.own_slots(&user.id, auth.token()).await
                .map_err(map_schedule_error)?
        }
    };

    Ok(Json(json!(slots)))
}

/// Delete an unbooked slot owned by the calling doctor.
#[axum::debug_handler]
pub async fn delete_time_slot(
    State(state): State<Arc<AppConfig>>,
    Path(slot_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    if !user.is_doctor() {
        return Err(AppError::Forbidden("Only doctors can manage schedules".to_string()));
    }

    let service = ScheduleService::new(&state);
    service.delete_time_slot(&user.id, slot_id, auth.token()).await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "message": "Time slot deleted successfully"
    })))
}
