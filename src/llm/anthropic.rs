//! Anthropic Messages API client.
//!
//! Thin HTTP wrapper for `/v1/messages`. Pure parsing in `parse_response`
//! for testability.

use super::config::LlmTimeouts;
use super::types::{Completion, ContentBlock, LlmError, Message};
use std::time::Duration;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    pub async fn chat(
        &self,
        api_key: &str,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<Completion, LlmError> {
        let body = ApiRequest { model, max_tokens, system: Some(system).filter(|s| !s.trim().is_empty()), messages };

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [Message],
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: String,
    usage: Usage,
}

#[derive(serde::Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<Completion, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let content: Vec<ContentBlock> = api
        .content
        .into_iter()
        .filter(|block| matches!(block, ContentBlock::Text { .. }))
        .collect();

    Ok(Completion {
        content,
        model: api.model,
        stop_reason: api.stop_reason,
        input_tokens: api.usage.input_tokens,
        output_tokens: api.usage.output_tokens,
    })
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
