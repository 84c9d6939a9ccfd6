// libs/schedule-cell/src/services/schedule.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{ScheduleError, SlotCandidate, TimeSlot};
use crate::services::conflict;

pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create an availability slot for a doctor, rejecting overlaps with any
    /// of the doctor's existing slots on the same date.
    pub async fn create_time_slot(
        &self,
        doctor_id: &str,
        candidate: SlotCandidate,
        auth_token: &str,
    ) -> Result<TimeSlot, ScheduleError> {
        debug!("Creating time slot for doctor {} on {}", doctor_id, candidate.date);

        let existing = self.get_slots_for_date(doctor_id, &candidate, auth_token).await?;

        if let Some(conflicting) = conflict::find_conflict(&candidate, &existing) {
            warn!(
                "Slot conflict for doctor {} on {}: candidate {}-{} overlaps existing {}-{}",
                doctor_id,
                candidate.date,
                candidate.start_time,
                candidate.end_time,
                conflicting.start_time,
                conflicting.end_time
            );
            return Err(ScheduleError::Conflict);
        }

        let slot_data = json!({
            "doctor_id": doctor_id,
            "date": candidate.date,
            "start_time": candidate.start_time.format("%H:%M:%S").to_string(),
            "end_time": candidate.end_time.format("%H:%M:%S").to_string(),
            "is_booked": false,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/time_slots",
            Some(auth_token),
            Some(slot_data),
            Some(headers),
        ).await.map_err(|e| ScheduleError::Database(e.to_string()))?;

        let created = result.into_iter().next()
            .ok_or_else(|| ScheduleError::Database("Failed to create time slot".to_string()))?;

        let slot: TimeSlot = serde_json::from_value(created)
            .map_err(|e| ScheduleError::Database(format!("Failed to parse time slot: {}", e)))?;

        debug!("Time slot created with ID: {}", slot.id);
        Ok(slot)
    }

    /// Delete an unbooked slot owned by the calling doctor.
    pub async fn delete_time_slot(
        &self,
        doctor_id: &str,
        slot_id: Uuid,
        auth_token: &str,
    ) -> Result<(), ScheduleError> {
        debug!("Deleting time slot {}", slot_id);

        let slot = self.get_slot_by_id(slot_id, auth_token).await?;

        if slot.doctor_id.to_string() != doctor_id {
            return Err(ScheduleError::NotOwner);
        }

        if slot.is_booked {
            return Err(ScheduleError::SlotBooked);
        }

        let path = format!("/rest/v1/time_slots?id=eq.{}", slot_id);
        let _: Vec<Value> = self.supabase.request(
            Method::DELETE,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| ScheduleError::Database(e.to_string()))?;

        Ok(())
    }

    /// Future unbooked slots for a doctor - the patient-facing view.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<TimeSlot>, ScheduleError> {
        let today = Utc::now().date_naive();
        let path = format!(
            "/rest/v1/time_slots?doctor_id=eq.{}&is_booked=eq.false&date=gte.{}&order=date.asc,start_time.asc",
            doctor_id, today
        );
        self.fetch_slots(&path, auth_token).await
    }

    /// All future slots of the calling doctor, booked or not.
    pub async fn own_slots(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Vec<TimeSlot>, ScheduleError> {
        let today = Utc::now().date_naive();
        let path = format!(
            "/rest/v1/time_slots?doctor_id=eq.{}&date=gte.{}&order=date.asc,start_time.asc",
            doctor_id, today
        );
        self.fetch_slots(&path, auth_token).await
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    async fn get_slots_for_date(
        &self,
        doctor_id: &str,
        candidate: &SlotCandidate,
        auth_token: &str,
    ) -> Result<Vec<TimeSlot>, ScheduleError> {
        let path = format!(
            "/rest/v1/time_slots?doctor_id=eq.{}&date=eq.{}&order=start_time.asc",
            doctor_id, candidate.date
        );
        self.fetch_slots(&path, auth_token).await
    }

    async fn get_slot_by_id(
        &self,
        slot_id: Uuid,
        auth_token: &str,
    ) -> Result<TimeSlot, ScheduleError> {
        let path = format!("/rest/v1/time_slots?id=eq.{}", slot_id);
        let slots = self.fetch_slots(&path, auth_token).await?;
        slots.into_iter().next().ok_or(ScheduleError::NotFound)
    }

    async fn fetch_slots(
        &self,
        path: &str,
        auth_token: &str,
    ) -> Result<Vec<TimeSlot>, ScheduleError> {
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await.map_err(|e| ScheduleError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<TimeSlot>, _>>()
            .map_err(|e| ScheduleError::Database(format!("Failed to parse time slots: {}", e)))
    }
}
