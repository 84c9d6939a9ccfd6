// libs/appointment-cell/src/handlers.rs
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

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::booking::AppointmentBookingService;

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::SlotNotAvailable => {
            AppError::Conflict("Time slot not available".to_string())
        }
        AppointmentError::InvalidStatusTransition(status) => {
            AppError::BadRequest(format!(
                "Appointment cannot be modified in current status: {}",
                status
            ))
        }
        AppointmentError::Validation(msg) => AppError::ValidationError(msg),
        AppointmentError::Database(msg) => AppError::Database(msg),
    }
}

/// Verify the caller is a party to the appointment: patients may act on
/// their own, doctors on those they hold, admins on any.
fn authorize_appointment_access(user: &User, appointment: &Appointment) -> Result<(), AppError> {
    let allowed = if user.is_admin() {
        true
    } else if user.is_doctor() {
        appointment.doctor_id.to_string() == user.id
    } else if user.is_patient() {
        appointment.patient_id.to_string() == user.id
    } else {
        false
    };

    if !allowed {
        return Err(AppError::Forbidden(
            "Not authorized to update this appointment".to_string(),
        ));
    }
    Ok(())
}

/// Book an available time slot for the calling patient.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service
        .book_appointment(&user.id, request, auth.token())
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked successfully"
    })))
}

/// List the caller's appointments, newest first.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointments = if user.is_doctor() {
        booking_service.list_for_doctor(&user.id, auth.token()).await
    } else {
        booking_service.list_for_patient(&user.id, auth.token()).await
    }
    .map_err(map_appointment_error)?;

    Ok(Json(json!(appointments)))
}

/// Transition an appointment's status; only forward transitions out of
/// SCHEDULED are allowed.
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service
        .get_appointment(request.appointment_id, auth.token())
        .await
        .map_err(map_appointment_error)?;

    authorize_appointment_access(&user, &appointment)?;

    let updated = booking_service
        .update_status(&appointment, &request, auth.token())
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(updated)))
}
