// libs/health-data-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day's self-reported cardiovascular metrics. Absent metrics stay null;
/// the charting UI skips them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub recorded_at: NaiveDate,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub glucose: Option<f64>,
    pub cholesterol: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHealthDataRequest {
    pub date: Option<NaiveDate>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub glucose: Option<f64>,
    pub cholesterol: Option<f64>,
}

impl RecordHealthDataRequest {
    pub fn validate(&self) -> Result<NaiveDate, HealthDataError> {
        self.date.ok_or_else(|| {
            HealthDataError::Validation("Date is required".to_string())
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HealthDataError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}
