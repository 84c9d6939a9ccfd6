// libs/prescription-cell/src/services/prescriptions.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{NewPrescription, Prescription, PrescriptionError, PrescriptionStatus};

pub struct PrescriptionService {
    supabase: SupabaseClient,
}

impl PrescriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Issue a new prescription; starts out ACTIVE.
    pub async fn create_prescription(
        &self,
        doctor_id: &str,
        prescription: NewPrescription,
        auth_token: &str,
    ) -> Result<Prescription, PrescriptionError> {
        debug!(
            "Doctor {} issuing prescription for patient {}",
            doctor_id, prescription.patient_id
        );

        let prescription_data = json!({
            "patient_id": prescription.patient_id,
            "doctor_id": doctor_id,
            "medication": prescription.medication,
            "dosage": prescription.dosage,
            "frequency": prescription.frequency,
            "instructions": prescription.instructions,
            "start_date": prescription.start_date,
            "end_date": prescription.end_date,
            "status": PrescriptionStatus::Active,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/prescriptions",
            Some(auth_token),
            Some(prescription_data),
            Some(headers),
        ).await.map_err(|e| PrescriptionError::Database(e.to_string()))?;

        let created = result.into_iter().next()
            .ok_or_else(|| PrescriptionError::Database("Failed to create prescription".to_string()))?;

        serde_json::from_value(created)
            .map_err(|e| PrescriptionError::Database(format!("Failed to parse prescription: {}", e)))
    }

    /// Prescriptions issued by a doctor, filtered by status, newest first.
    pub async fn list_for_doctor(
        &self,
        doctor_id: &str,
        status: PrescriptionStatus,
        auth_token: &str,
    ) -> Result<Vec<Prescription>, PrescriptionError> {
        let path = format!(
            "/rest/v1/prescriptions?doctor_id=eq.{}&status=eq.{}&order=created_at.desc",
            doctor_id, status
        );
        self.fetch_prescriptions(&path, auth_token).await
    }

    /// Prescriptions held by a patient, filtered by status, newest first.
    pub async fn list_for_patient(
        &self,
        patient_id: &str,
        status: PrescriptionStatus,
        auth_token: &str,
    ) -> Result<Vec<Prescription>, PrescriptionError> {
        let path = format!(
            "/rest/v1/prescriptions?patient_id=eq.{}&status=eq.{}&order=created_at.desc",
            patient_id, status
        );
        self.fetch_prescriptions(&path, auth_token).await
    }

    pub async fn update_status(
        &self,
        prescription_id: Uuid,
        status: PrescriptionStatus,
        auth_token: &str,
    ) -> Result<Prescription, PrescriptionError> {
        debug!("Updating prescription {} to {}", prescription_id, status);

        let path = format!("/rest/v1/prescriptions?id=eq.{}", prescription_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "status": status })),
            Some(headers),
        ).await.map_err(|e| PrescriptionError::Database(e.to_string()))?;

        let updated = result.into_iter().next()
            .ok_or(PrescriptionError::NotFound)?;

        serde_json::from_value(updated)
            .map_err(|e| PrescriptionError::Database(format!("Failed to parse prescription: {}", e)))
    }

    async fn fetch_prescriptions(
        &self,
        path: &str,
        auth_token: &str,
    ) -> Result<Vec<Prescription>, PrescriptionError> {
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await.map_err(|e| PrescriptionError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Prescription>, _>>()
            .map_err(|e| PrescriptionError::Database(format!("Failed to parse prescriptions: {}", e)))
    }
}
