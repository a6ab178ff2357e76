//! HTTP client for the chat bridge surface.

use serde::{Deserialize, Serialize};

use crate::session::{Message, Settings};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Backend { status: u16, kind: String, message: String },
    #[error("unknown setting `{0}` (expected web_search, image_generation, data_analysis or think)")]
    UnknownSetting(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Short failure kind shown before the description.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Http(e) if e.is_timeout() => "Timeout",
            Self::Http(e) if e.is_connect() => "ConnectError",
            Self::Http(e) if e.is_decode() => "DecodeError",
            Self::Http(_) => "HttpError",
            Self::Backend { kind, .. } => kind.as_str(),
            Self::UnknownSetting(_) => "UnknownSetting",
            Self::Io(_) => "IoError",
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
    pub settings: &'a Settings,
    pub session_id: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageOnlyRequest<'a> {
    prompt: &'a str,
    system_prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    kind: String,
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl BridgeClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }

    pub async fn health(&self) -> Result<String, CliError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        let body: HealthResponse = read_json(response).await?;
        Ok(body.result)
    }

    pub async fn chat(&self, request: &ChatRequest<'_>) -> Result<String, CliError> {
        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .json(request)
            .send()
            .await?;
        let body: ChatResponse = read_json(response).await?;
        Ok(body.response)
    }

    pub async fn message_only(&self, prompt: &str, system_prompt: &str, model: Option<&str>) -> Result<String, CliError> {
        let response = self
            .http
            .post(format!("{}/chat_messageonly", self.base_url))
            .json(&MessageOnlyRequest { prompt, system_prompt, model })
            .send()
            .await?;
        let body: ChatResponse = read_json(response).await?;
        Ok(body.response)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let code = status.as_u16();
    let text = response.text().await?;
    Err(match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => CliError::Backend { status: code, kind: body.kind, message: body.error },
        Err(_) => CliError::Backend { status: code, kind: format!("HTTP {code}"), message: text },
    })
}
