//! REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.into()),
        })
    }
}

// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn ready_check() -> &'static str {
    "OK"
}

// Conversation handlers
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub conversation_type: String,
    pub name: Option<String>,
    pub participants: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub conversation_type: String,
    pub name: Option<String>,
    pub created_at: String,
}

pub async fn create_conversation(
    Json(req): Json<CreateConversationRequest>,
) -> Json<ApiResponse<ConversationResponse>> {
    let response = ConversationResponse {
        id: Uuid::new_v4(),
        conversation_type: req.conversation_type,
        name: req.name,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    ApiResponse::success(response)
}

pub async fn list_conversations() -> Json<ApiResponse<Vec<ConversationResponse>>> {
    ApiResponse::success(vec![])
}

pub async fn get_conversation(Path(id): Path<Uuid>) -> Json<ApiResponse<ConversationResponse>> {
    let response = ConversationResponse {
        id,
        conversation_type: "direct".to_string(),
        name: None,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    ApiResponse::success(response)
}

pub async fn delete_conversation(Path(_id): Path<Uuid>) -> StatusCode {
    StatusCode::NO_CONTENT
}

// Message handlers
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: serde_json::Value,
    pub content_type: String,
    pub reply_to: Option<Uuid>,
    pub encrypted: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content_type: String,
    pub created_at: String,
}

pub async fn send_message(
    Path(conversation_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Json<ApiResponse<MessageResponse>> {
    let response = MessageResponse {
        id: Uuid::new_v4(),
        conversation_id,
        sender_id: Uuid::new_v4(), // Would come from auth context
        content_type: req.content_type,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    ApiResponse::success(response)
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<u32>,
    pub before: Option<Uuid>,
    pub after: Option<Uuid>,
}

pub async fn get_messages(
    Path(_conversation_id): Path<Uuid>,
    Query(_query): Query<MessagesQuery>,
) -> Json<ApiResponse<Vec<MessageResponse>>> {
    ApiResponse::success(vec![])
}

pub async fn edit_message(
    Path(_id): Path<Uuid>,
    Json(_req): Json<serde_json::Value>,
) -> Json<ApiResponse<MessageResponse>> {
    let response = MessageResponse {
        id: Uuid::new_v4(),
        conversation_id: Uuid::new_v4(),
        sender_id: Uuid::new_v4(),
        content_type: "text".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    ApiResponse::success(response)
}

pub async fn delete_message(Path(_id): Path<Uuid>) -> StatusCode {
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub emoji: String,
}

pub async fn add_reaction(
    Path(_id): Path<Uuid>,
    Json(_req): Json<ReactionRequest>,
) -> StatusCode {
    StatusCode::OK
}

// Presence handlers
#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub user_id: Uuid,
    pub status: String,
    pub last_seen_at: String,
}

pub async fn get_presence() -> Json<ApiResponse<PresenceResponse>> {
    let response = PresenceResponse {
        user_id: Uuid::new_v4(),
        status: "online".to_string(),
        last_seen_at: chrono::Utc::now().to_rfc3339(),
    };
    ApiResponse::success(response)
}

#[derive(Debug, Deserialize)]
pub struct UpdatePresenceRequest {
    pub status: String,
    pub custom_status: Option<String>,
}

pub async fn update_presence(
    Json(_req): Json<UpdatePresenceRequest>,
) -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct TypingRequest {
    pub conversation_id: Uuid,
    pub is_typing: bool,
}

pub async fn send_typing(Json(_req): Json<TypingRequest>) -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct ReadReceiptRequest {
    pub conversation_id: Uuid,
    pub message_id: Uuid,
}

pub async fn send_read_receipts(Json(_req): Json<ReadReceiptRequest>) -> StatusCode {
    StatusCode::OK
}

// File handlers
pub async fn upload_file() -> Json<ApiResponse<serde_json::Value>> {
    ApiResponse::success(serde_json::json!({
        "id": Uuid::new_v4(),
        "url": "https://cdn.brivas.io/files/example.jpg"
    }))
}

pub async fn get_file(Path(_id): Path<Uuid>) -> Json<ApiResponse<serde_json::Value>> {
    ApiResponse::success(serde_json::json!({
        "id": Uuid::new_v4(),
        "url": "https://cdn.brivas.io/files/example.jpg"
    }))
}

// Sync handler
pub async fn sync_state() -> Json<ApiResponse<serde_json::Value>> {
    ApiResponse::success(serde_json::json!({
        "conversations": [],
        "presence": {},
        "sync_token": "abc123"
    }))
}
