//! Chat bridge — UI-level chat requests → model gateway calls.
//!
//! DESIGN
//! ======
//! Every front end speaks the same small contract: a health probe, a
//! full-conversation chat call, and a single-prompt call. Conversation
//! state lives in the caller; the bridge borrows it and never mutates it.
//!
//! Only the most recent user turn is forwarded to the model. Multi-turn
//! history is dropped on purpose. A different context strategy belongs in
//! [`last_user_prompt`], not spread across callers.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::gateway::{GatewayFailure, ModelGateway};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const EMPTY_MESSAGE_PLACEHOLDER: &str = "User sent an empty message.";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation as sent by a front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Capability toggles carried with every chat request.
///
/// Accepted and logged, never acted upon: the gateway makes the same call
/// regardless of their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub web_search: bool,
    pub image_generation: bool,
    pub data_analysis: bool,
    pub think: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { web_search: true, image_generation: true, data_analysis: true, think: false }
    }
}

/// `POST /chat` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub settings: Settings,
    /// Opaque correlation id generated once per front-end session.
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub result: String,
}

// =============================================================================
// PROMPT EXTRACTION
// =============================================================================

/// Content of the most recent `user` message, scanning backward.
/// Falls back to [`EMPTY_MESSAGE_PLACEHOLDER`] when there is none.
#[must_use]
pub fn last_user_prompt(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map_or(EMPTY_MESSAGE_PLACEHOLDER, |m| m.content.as_str())
}

// =============================================================================
// BRIDGE
// =============================================================================

pub struct ChatBridge {
    gateway: ModelGateway,
    default_model: String,
}

impl ChatBridge {
    #[must_use]
    pub fn new(gateway: ModelGateway, default_model: impl Into<String>) -> Self {
        Self { gateway, default_model: default_model.into() }
    }

    /// Run the gateway's diagnostic probe.
    ///
    /// # Errors
    ///
    /// Propagates [`GatewayFailure`] unchanged.
    pub async fn health_check(&self) -> Result<HealthReport, GatewayFailure> {
        let result = self.gateway.health_check().await?;
        Ok(HealthReport { result })
    }

    /// Answer the latest user turn of `request`. `model` defaults to the
    /// bridge's configured model.
    ///
    /// # Errors
    ///
    /// Propagates [`GatewayFailure`] unchanged. A conversation without any
    /// user message is not an error.
    pub async fn chat(&self, request: &ChatRequest, model: Option<&str>) -> Result<ChatResponse, GatewayFailure> {
        let model = model.unwrap_or(self.default_model.as_str());
        let prompt = last_user_prompt(&request.messages);

        info!(
            session_id = %request.session_id,
            messages = request.messages.len(),
            web_search = request.settings.web_search,
            image_generation = request.settings.image_generation,
            data_analysis = request.settings.data_analysis,
            think = request.settings.think,
            model,
            "bridge: chat request"
        );

        let response = self
            .gateway
            .generate(prompt, DEFAULT_SYSTEM_PROMPT, model)
            .await?;
        Ok(ChatResponse { response })
    }

    /// Forward `prompt` and `system` verbatim, bypassing conversation
    /// extraction. Empty values are passed through as-is.
    ///
    /// # Errors
    ///
    /// Propagates [`GatewayFailure`] unchanged.
    pub async fn chat_message_only(
        &self,
        prompt: &str,
        system: &str,
        model: Option<&str>,
    ) -> Result<ChatResponse, GatewayFailure> {
        let model = model.unwrap_or(self.default_model.as_str());
        info!(model, prompt_len = prompt.len(), system_len = system.len(), "bridge: message-only request");

        let response = self.gateway.generate(prompt, system, model).await?;
        Ok(ChatResponse { response })
    }
}

#[cfg(test)]
#[path = "bridge_test.rs"]
mod tests;
