//! Model gateway — one hosted text-generation call per request.
//!
//! DESIGN
//! ======
//! Wraps an [`LlmChat`] implementation with the two calls the chat bridge
//! needs: a fixed diagnostic probe and a single-prompt generation. Every
//! provider error is folded into [`GatewayFailure`]; there is no retry and
//! no recovery at this layer.

use std::sync::Arc;

use tracing::info;

use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};

pub const HEALTH_MODEL: &str = "gpt-4o";
pub const HEALTH_SYSTEM_PROMPT: &str = "You are a coding assistant that talks like a pirate.";
pub const HEALTH_PROMPT: &str = "How do I check if a Python object is an instance of a class?";

// =============================================================================
// ERROR
// =============================================================================

/// Any failure of the external model call: auth, network, malformed response.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct GatewayFailure {
    #[from]
    source: LlmError,
}

impl ErrorCode for GatewayFailure {
    fn error_code(&self) -> &'static str {
        self.source.error_code()
    }

    fn retryable(&self) -> bool {
        self.source.retryable()
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

/// Stateless wrapper around a shared LLM client. Cheap to share behind `Arc`.
pub struct ModelGateway {
    llm: Arc<dyn LlmChat>,
    max_tokens: u32,
    health_model: String,
}

impl ModelGateway {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, max_tokens: u32) -> Self {
        Self { llm, max_tokens, health_model: HEALTH_MODEL.to_string() }
    }

    /// Override the model used by [`ModelGateway::health_check`]; providers
    /// other than `OpenAI` do not serve `gpt-4o`.
    #[must_use]
    pub fn with_health_model(mut self, model: impl Into<String>) -> Self {
        self.health_model = model.into();
        self
    }

    /// Issue the fixed diagnostic prompt and return the raw output.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayFailure`] if the provider call fails.
    pub async fn health_check(&self) -> Result<String, GatewayFailure> {
        self.generate(HEALTH_PROMPT, HEALTH_SYSTEM_PROMPT, &self.health_model)
            .await
    }

    /// Issue one model call with `prompt` as the sole user message.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayFailure`] if the provider call fails.
    pub async fn generate(&self, prompt: &str, system: &str, model: &str) -> Result<String, GatewayFailure> {
        let messages = [Message::user(prompt)];
        let completion = self
            .llm
            .chat(model, self.max_tokens, system, &messages)
            .await?;

        info!(
            model,
            prompt_len = prompt.len(),
            stop_reason = %completion.stop_reason,
            input_tokens = completion.input_tokens,
            output_tokens = completion.output_tokens,
            "gateway: generation complete"
        );

        Ok(completion.text())
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
