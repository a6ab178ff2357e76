//! LLM types — provider-neutral message types and errors.
//!
//! Shared by the Anthropic and `OpenAI` clients and by the model gateway.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The API key environment variable was not set when a call was made.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CONTENT BLOCKS
// =============================================================================

/// A structured content block in a provider response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// A plain text segment.
    #[serde(rename = "text")]
    Text { text: String },

    /// Extended thinking block (Anthropic extended thinking feature).
    #[serde(rename = "thinking")]
    Thinking { thinking: String },

    /// Any unrecognized block type — ignored by downstream logic.
    #[serde(other)]
    Unknown,
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// A single message sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// Result of one provider call.
#[derive(Debug, Serialize, Deserialize)]
pub struct Completion {
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Completion {
    /// Concatenate every text block, in order. Non-text blocks are skipped.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for LLM chat. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send a chat request to the LLM provider.
    ///
    /// An empty `system` is omitted from the provider payload.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the response is malformed,
    /// or the API key is absent.
    async fn chat(&self, model: &str, max_tokens: u32, system: &str, messages: &[Message])
    -> Result<Completion, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
