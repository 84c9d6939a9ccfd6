// libs/messaging-cell/src/services/messages.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Message, MessageError, NewMessage};

pub struct MessageService {
    supabase: SupabaseClient,
}

impl MessageService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn send_message(
        &self,
        sender_id: &str,
        message: NewMessage,
        auth_token: &str,
    ) -> Result<Message, MessageError> {
        debug!("Sending message from {} to {}", sender_id, message.receiver_id);

        let message_data = json!({
            "sender_id": sender_id,
            "receiver_id": message.receiver_id,
            "content": message.content,
            "file_url": message.file_url,
            "file_type": message.file_type,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/messages",
            Some(auth_token),
            Some(message_data),
            Some(headers),
        ).await.map_err(|e| MessageError::Database(e.to_string()))?;

        let created = result.into_iter().next()
            .ok_or_else(|| MessageError::Database("Failed to create message".to_string()))?;

        serde_json::from_value(created)
            .map_err(|e| MessageError::Database(format!("Failed to parse message: {}", e)))
    }

    /// Both directions of a two-party conversation, oldest first.
    pub async fn conversation(
        &self,
        user_id: &str,
        other_user_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Message>, MessageError> {
        let path = format!(
            "/rest/v1/messages?or=(and(sender_id.eq.{user},receiver_id.eq.{other}),and(sender_id.eq.{other},receiver_id.eq.{user}))&order=created_at.asc",
            user = user_id,
            other = other_user_id,
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await.map_err(|e| MessageError::Database(e.to_string()))?;

        result.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Message>, _>>()
            .map_err(|e| MessageError::Database(format!("Failed to parse messages: {}", e)))
    }
}
