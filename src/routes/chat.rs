//! Chat bridge HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ErrorCode;
use crate::services::bridge::{ChatRequest, ChatResponse, HealthReport};
use crate::services::gateway::GatewayFailure;
use crate::state::AppState;

/// `POST /chat_messageonly` body.
#[derive(Debug, Deserialize)]
pub struct MessageOnlyBody {
    pub prompt: String,
    #[serde(default)]
    pub system_prompt: String,
    /// Empty or absent selects the configured default model.
    #[serde(default)]
    pub model: Option<String>,
}

/// Failure body returned alongside `502 Bad Gateway`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
    /// Informational; the bridge itself never retries.
    pub retryable: bool,
}

impl IntoResponse for GatewayFailure {
    fn into_response(self) -> Response {
        warn!(kind = self.error_code(), error = %self, "gateway failure");
        let body =
            ErrorBody { error: self.to_string(), kind: self.error_code().to_owned(), retryable: self.retryable() };
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

/// `GET /health` — run the fixed diagnostic prompt.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthReport>, GatewayFailure> {
    Ok(Json(state.bridge.health_check().await?))
}

/// `POST /chat` — answer the latest user turn of a conversation.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, GatewayFailure> {
    Ok(Json(state.bridge.chat(&request, None).await?))
}

/// `POST /chat_messageonly` — forward a prompt and system instruction verbatim.
pub async fn chat_message_only(
    State(state): State<AppState>,
    Json(body): Json<MessageOnlyBody>,
) -> Result<Json<ChatResponse>, GatewayFailure> {
    let model = body.model.as_deref().filter(|m| !m.trim().is_empty());
    Ok(Json(
        state
            .bridge
            .chat_message_only(&body.prompt, &body.system_prompt, model)
            .await?,
    ))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
