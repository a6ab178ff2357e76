//! LLM — multi-provider adapter behind the model gateway.
//!
//! DESIGN
//! ======
//! Configured from environment variables. `LlmClient` dispatches to
//! `OpenAI` or Anthropic based on `LLM_PROVIDER`. The API key is resolved at
//! construction but only checked when a call is made, so the server starts
//! (and `/health` reports the problem) without a credential.

pub mod anthropic;
pub mod config;
pub mod openai;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::LlmChat;
use types::{Completion, LlmError, Message};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to either Anthropic or `OpenAI`.
pub struct LlmClient {
    inner: LlmProvider,
    api_key: Option<String>,
    api_key_var: String,
}

enum LlmProvider {
    Anthropic(anthropic::AnthropicClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = match config.provider {
            LlmProviderKind::Anthropic => LlmProvider::Anthropic(anthropic::AnthropicClient::new(config.timeouts)?),
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(openai::OpenAiClient::new(
                config.openai_mode,
                config.openai_base_url,
                config.timeouts,
            )?),
        };
        Ok(Self { inner, api_key: config.api_key, api_key_var: config.api_key_var })
    }

    /// Whether a credential was present in the environment at construction.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<Completion, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingApiKey { var: self.api_key_var.clone() })?;
        match &self.inner {
            LlmProvider::Anthropic(c) => c.chat(api_key, model, max_tokens, system, messages).await,
            LlmProvider::OpenAi(c) => c.chat(api_key, model, max_tokens, system, messages).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::config::{LlmTimeouts, OpenAiApiMode};

    fn config_without_key() -> LlmConfig {
        LlmConfig {
            provider: LlmProviderKind::OpenAi,
            api_key_var: "OPENAI_API_KEY".into(),
            api_key: None,
            model: "gpt-4o".into(),
            max_tokens: 64,
            openai_mode: OpenAiApiMode::Responses,
            openai_base_url: "http://127.0.0.1:9".into(),
            timeouts: LlmTimeouts { request_secs: 1, connect_secs: 1 },
        }
    }

    #[test]
    fn construction_succeeds_without_key() {
        let client = LlmClient::from_config(config_without_key()).unwrap();
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn missing_key_surfaces_on_call() {
        let client = LlmClient::from_config(config_without_key()).unwrap();
        let err = client
            .chat("gpt-4o", 64, "", &[Message::user("Hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "OPENAI_API_KEY"));
    }
}
