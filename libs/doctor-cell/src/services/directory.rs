// libs/doctor-cell/src/services/directory.rs
use std::collections::HashMap;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{DoctorError, DoctorProfile, TopDoctor};

pub struct DoctorDirectoryService {
    supabase: SupabaseClient,
}

impl DoctorDirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Approved doctors, ordered by name.
    pub async fn list_doctors(&self, auth_token: &str) -> Result<Vec<DoctorProfile>, DoctorError> {
        let path = "/rest/v1/doctors?status=eq.approved&select=id,full_name,specialty&order=full_name.asc";

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await.map_err(|e| DoctorError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<DoctorProfile>, _>>()
            .map_err(|e| DoctorError::Database(format!("Failed to parse doctors: {}", e)))
    }

    /// Doctors ranked by completed consultation count.
    pub async fn top_doctors(
        &self,
        limit: usize,
        auth_token: &str,
    ) -> Result<Vec<TopDoctor>, DoctorError> {
        debug!("Ranking top {} doctors by completed appointments", limit);

        let path = "/rest/v1/appointments?status=eq.COMPLETED&select=doctor_id";
        let completed: Vec<Value> = self.supabase.request(
            Method::GET,
            path,
            Some(auth_token),
            None,
        ).await.map_err(|e| DoctorError::Database(e.to_string()))?;

        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for row in completed {
            if let Some(doctor_id) = row["doctor_id"].as_str().and_then(|id| id.parse().ok()) {
                *counts.entry(doctor_id).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(Uuid, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);

        if ranked.is_empty() {
            return Ok(vec![]);
        }

        let ids = ranked.iter()
            .map(|(id, _)| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "/rest/v1/doctors?id=in.({})&select=id,full_name,specialty",
            ids
        );

        let profiles: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| DoctorError::Database(e.to_string()))?;

        let profiles: Vec<DoctorProfile> = profiles.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<DoctorProfile>, _>>()
            .map_err(|e| DoctorError::Database(format!("Failed to parse doctors: {}", e)))?;

        let by_id: HashMap<Uuid, DoctorProfile> =
            profiles.into_iter().map(|p| (p.id, p)).collect();

        Ok(ranked.into_iter()
            .filter_map(|(id, count)| {
                by_id.get(&id).map(|profile| TopDoctor {
                    id: profile.id,
                    full_name: profile.full_name.clone(),
                    specialty: profile.specialty.clone(),
                    completed_appointments: count,
                })
            })
            .collect())
    }
}
