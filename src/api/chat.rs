//! Help chat endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::chat;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: &'static str,
}

/// POST /api/chat - Canned answer for a visitor's message.
pub async fn chat_reply(Json(request): Json<ChatRequest>) -> ApiResult<ChatReply> {
    success(ChatReply {
        reply: chat::reply(&request.message),
    })
}
