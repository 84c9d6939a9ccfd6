// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use schedule_cell::models::TimeSlot;

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, UpdateAppointmentRequest,
    AppointmentStatus,
};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::meet::MeetLinkService;

pub struct AppointmentBookingService {
    supabase: Arc<SupabaseClient>,
    lifecycle_service: AppointmentLifecycleService,
    meet_link_service: MeetLinkService,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            lifecycle_service: AppointmentLifecycleService::new(),
            meet_link_service: MeetLinkService::new(config),
        }
    }

    /// Convert an available time slot into a SCHEDULED appointment.
    ///
    /// The write happens inside the `book_time_slot` Postgres function, whose
    /// single transaction flips `is_booked` with a conditional update and
    /// inserts the appointment row only when that update touched a row. When
    /// another request claims the slot first the function returns no rows and
    /// the whole booking fails with `SlotNotAvailable` - the caller re-fetches
    /// the doctor's available slots and retries.
    pub async fn book_appointment(
        &self,
        patient_id: &str,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        info!("Booking time slot {} for patient {}", request.time_slot_id, patient_id);

        let slot = self.get_available_slot(request.time_slot_id, auth_token).await?;

        if slot.doctor_id != request.doctor_id {
            return Err(AppointmentError::Validation(
                "Doctor does not match the requested time slot".to_string(),
            ));
        }

        let meet_link = self.meet_link_service.create_meet_link(&slot).await;

        let args = json!({
            "p_time_slot_id": request.time_slot_id,
            "p_patient_id": patient_id,
            "p_meet_link": meet_link,
        });

        let result: Vec<Value> = self.supabase
            .rpc("book_time_slot", Some(auth_token), args)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            // Lost the race: the conditional update inside the transaction
            // matched zero rows because the slot was already booked.
            warn!("Time slot {} was booked concurrently", request.time_slot_id);
            return Err(AppointmentError::SlotNotAvailable);
        };

        let appointment: Appointment = serde_json::from_value(row)
            .map_err(|e| AppointmentError::Database(format!("Failed to parse appointment: {}", e)))?;

        info!("Appointment {} booked with doctor {}", appointment.id, appointment.doctor_id);
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let appointments = self.fetch_appointments(&path, auth_token).await?;
        appointments.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    /// Apply a status transition to an appointment. The cancel reason is
    /// persisted only for cancellations and cleared otherwise.
    pub async fn update_status(
        &self,
        current: &Appointment,
        request: &UpdateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment {} to {}", current.id, request.status);

        self.lifecycle_service
            .validate_status_transition(&current.status, &request.status)?;

        let cancel_reason = if request.status == AppointmentStatus::Cancelled {
            request.cancel_reason.clone()
        } else {
            None
        };

        let update_data = json!({
            "status": request.status,
            "cancel_reason": cancel_reason,
        });

        let path = format!("/rest/v1/appointments?id=eq.{}", current.id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(update_data),
            Some(headers),
        ).await.map_err(|e| AppointmentError::Database(e.to_string()))?;

        let updated = result.into_iter().next()
            .ok_or(AppointmentError::NotFound)?;

        serde_json::from_value(updated)
            .map_err(|e| AppointmentError::Database(format!("Failed to parse appointment: {}", e)))
    }

    pub async fn list_for_patient(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&order=date.desc,start_time.desc",
            patient_id
        );
        self.fetch_appointments(&path, auth_token).await
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&order=date.desc,start_time.desc",
            doctor_id
        );
        self.fetch_appointments(&path, auth_token).await
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn get_available_slot(
        &self,
        time_slot_id: Uuid,
        auth_token: &str,
    ) -> Result<TimeSlot, AppointmentError> {
        let path = format!(
            "/rest/v1/time_slots?id=eq.{}&is_booked=eq.false",
            time_slot_id
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| AppointmentError::Database(e.to_string()))?;

        let Some(row) = result.into_iter().next() else {
            return Err(AppointmentError::SlotNotAvailable);
        };

        serde_json::from_value(row)
            .map_err(|e| AppointmentError::Database(format!("Failed to parse time slot: {}", e)))
    }

    async fn fetch_appointments(
        &self,
        path: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await.map_err(|e| AppointmentError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| AppointmentError::Database(format!("Failed to parse appointments: {}", e)))
    }
}
