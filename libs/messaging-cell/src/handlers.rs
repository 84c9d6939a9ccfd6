// libs/messaging-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{MessageError, SendMessageRequest};
use crate::services::messages::MessageService;

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    #[serde(rename = "otherUserId")]
    pub other_user_id: Option<Uuid>,
}

fn map_message_error(e: MessageError) -> AppError {
    match e {
        MessageError::Validation(msg) => AppError::ValidationError(msg),
        MessageError::Database(msg) => AppError::Database(msg),
    }
}

/// Send a direct message from the caller.
#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let message = request.validate().map_err(map_message_error)?;

    let service = MessageService::new(&state);
    let created = service
        .send_message(&user.id, message, auth.token())
        .await
        .map_err(map_message_error)?;

    Ok(Json(json!(created)))
}

/// Fetch the caller's conversation with another user.
#[axum::debug_handler]
pub async fn get_conversation(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ConversationQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let other_user_id = query.other_user_id.ok_or_else(|| {
        AppError::BadRequest("Other user ID is required".to_string())
    })?;

    let service = MessageService::new(&state);
    let messages = service
        .conversation(&user.id, other_user_id, auth.token())
        .await
        .map_err(map_message_error)?;

    Ok(Json(json!(messages)))
}
