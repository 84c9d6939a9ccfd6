// libs/health-data-cell/src/services/records.rs
use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{HealthDataError, HealthRecord, RecordHealthDataRequest};

pub struct HealthRecordService {
    supabase: SupabaseClient,
}

impl HealthRecordService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn record_metrics(
        &self,
        patient_id: &str,
        recorded_at: NaiveDate,
        request: &RecordHealthDataRequest,
        auth_token: &str,
    ) -> Result<HealthRecord, HealthDataError> {
        debug!("Recording health metrics for patient {} on {}", patient_id, recorded_at);

        let record_data = json!({
            "patient_id": patient_id,
            "recorded_at": recorded_at,
            "systolic": request.systolic,
            "diastolic": request.diastolic,
            "heart_rate": request.heart_rate,
            "glucose": request.glucose,
            "cholesterol": request.cholesterol,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/health_records",
            Some(auth_token),
            Some(record_data),
            Some(headers),
        ).await.map_err(|e| HealthDataError::Database(e.to_string()))?;

        let created = result.into_iter().next()
            .ok_or_else(|| HealthDataError::Database("Failed to create health record".to_string()))?;

        serde_json::from_value(created)
            .map_err(|e| HealthDataError::Database(format!("Failed to parse health record: {}", e)))
    }

    /// The caller's history, newest first.
    pub async fn list_records(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Vec<HealthRecord>, HealthDataError> {
        let path = format!(
            "/rest/v1/health_records?patient_id=eq.{}&order=recorded_at.desc",
            patient_id
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| HealthDataError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<HealthRecord>, _>>()
            .map_err(|e| HealthDataError::Database(format!("Failed to parse health records: {}", e)))
    }
}
