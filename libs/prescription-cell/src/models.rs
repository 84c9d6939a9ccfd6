// libs/prescription-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
    pub instructions: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: PrescriptionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrescriptionStatus::Active => write!(f, "ACTIVE"),
            PrescriptionStatus::Completed => write!(f, "COMPLETED"),
            PrescriptionStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Incoming prescription body. Every required field is checked explicitly so
/// the caller gets the full list of problems at once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionRequest {
    pub patient_id: Option<Uuid>,
    pub medication: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub instructions: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub patient_id: Uuid,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
    pub instructions: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl CreatePrescriptionRequest {
    pub fn validate(&self) -> Result<NewPrescription, PrescriptionError> {
        let mut missing = Vec::new();
        if self.patient_id.is_none() {
            missing.push("patientId");
        }
        if self.medication.is_none() {
            missing.push("medication");
        }
        if self.dosage.is_none() {
            missing.push("dosage");
        }
        if self.frequency.is_none() {
            missing.push("frequency");
        }
        if self.instructions.is_none() {
            missing.push("instructions");
        }
        if self.start_date.is_none() {
            missing.push("startDate");
        }
        if !missing.is_empty() {
            return Err(PrescriptionError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(PrescriptionError::Validation(
                    "End date must not be before start date".to_string(),
                ));
            }
        }

        Ok(NewPrescription {
            patient_id: self.patient_id.unwrap(),
            medication: self.medication.clone().unwrap(),
            dosage: self.dosage.clone().unwrap(),
            frequency: self.frequency.clone().unwrap(),
            instructions: self.instructions.clone().unwrap(),
            start_date: self.start_date.unwrap(),
            end_date: self.end_date,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrescriptionRequest {
    pub id: Uuid,
    pub status: PrescriptionStatus,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PrescriptionError {
    #[error("Prescription not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}
