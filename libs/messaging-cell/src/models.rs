// libs/messaging-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A direct message between a patient and a doctor. Attachment fields hold
/// metadata only; storage lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: Option<Uuid>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub receiver_id: Uuid,
    pub content: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<NewMessage, MessageError> {
        let mut missing = Vec::new();
        if self.receiver_id.is_none() {
            missing.push("receiverId");
        }
        match &self.content {
            None => missing.push("content"),
            Some(content) if content.trim().is_empty() => missing.push("content"),
            Some(_) => {}
        }
        if !missing.is_empty() {
            return Err(MessageError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(NewMessage {
            receiver_id: self.receiver_id.unwrap(),
            content: self.content.clone().unwrap(),
            file_url: self.file_url.clone(),
            file_type: self.file_type.clone(),
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MessageError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}
