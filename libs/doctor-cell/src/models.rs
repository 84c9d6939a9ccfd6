// libs/doctor-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public directory entry for an approved doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: Option<String>,
}

/// Directory entry ranked by completed consultations.
#[derive(Debug, Clone, Serialize)]
pub struct TopDoctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: Option<String>,
    pub completed_appointments: usize,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Database error: {0}")]
    Database(String),
}
