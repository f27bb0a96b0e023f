//! REST API endpoint for the chat assistant
//!
//! Always answers 200 with a reply: either the model's response (`source:
//! "ai"`) or a keyword-derived severity advisory (`source: "fallback"`).
//! AI-specific failures never surface as HTTP errors here.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::service::{ChatReply, ChatService};

/// Request body for the chat endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

/// Talk to the assistant
#[utoipa::path(
    post,
    path = "/api/chatbot/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReply),
        (status = 400, description = "Message is required")
    ),
    tag = "chatbot"
)]
#[post("/api/chatbot/chat")]
pub async fn chat(
    service: web::Data<ChatService>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let reply = service.reply(&request.message).await;

    Ok(HttpResponse::Ok().json(reply))
}

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat);
}
