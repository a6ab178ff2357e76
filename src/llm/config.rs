//! LLM configuration parsed from environment variables.

use super::types::LlmError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Anthropic,
    OpenAi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiApiMode {
    ChatCompletions,
    Responses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    /// Name of the env var the key was read from. Reported when the key is absent.
    pub api_key_var: String,
    /// `None` when the variable is unset. Not an error until a call is made.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub openai_mode: OpenAiApiMode,
    pub openai_base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// All optional:
    /// - `LLM_PROVIDER`: `openai` (default) or `anthropic`
    /// - `LLM_API_KEY_ENV`: names the env var containing the key
    ///   (`OPENAI_API_KEY` / `ANTHROPIC_API_KEY` by provider)
    /// - `LLM_MODEL`: provider default when absent
    /// - `LLM_MAX_TOKENS`: default 4096
    /// - `LLM_OPENAI_MODE`: `responses` (default) or `chat_completions`
    /// - `LLM_OPENAI_BASE_URL`: default OpenAI API base URL
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigParse`] for an unknown provider or `OpenAI` mode.
    /// A missing API key is deliberately not an error here.
    pub fn from_env() -> Result<Self, LlmError> {
        let provider = parse_provider(std::env::var("LLM_PROVIDER").ok().as_deref())?;

        let api_key_var = std::env::var("LLM_API_KEY_ENV").unwrap_or_else(|_| default_key_var(provider).to_string());
        let api_key = std::env::var(&api_key_var)
            .ok()
            .filter(|key| !key.is_empty());

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| default_model(provider).to_string());
        let openai_mode = parse_openai_mode(std::env::var("LLM_OPENAI_MODE").ok().as_deref())?;
        let openai_base_url = std::env::var("LLM_OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = LlmTimeouts {
            request_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };
        let max_tokens = env_parse("LLM_MAX_TOKENS", DEFAULT_LLM_MAX_TOKENS);

        Ok(Self { provider, api_key_var, api_key, model, max_tokens, openai_mode, openai_base_url, timeouts })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_provider(raw: Option<&str>) -> Result<LlmProviderKind, LlmError> {
    match raw.unwrap_or("openai") {
        "anthropic" => Ok(LlmProviderKind::Anthropic),
        "openai" => Ok(LlmProviderKind::OpenAi),
        other => Err(LlmError::ConfigParse(format!("unknown LLM_PROVIDER: {other}"))),
    }
}

fn parse_openai_mode(raw: Option<&str>) -> Result<OpenAiApiMode, LlmError> {
    match raw.unwrap_or("responses") {
        "responses" => Ok(OpenAiApiMode::Responses),
        "chat_completions" => Ok(OpenAiApiMode::ChatCompletions),
        other => Err(LlmError::ConfigParse(format!(
            "unsupported openai_api mode '{other}' (expected 'responses' or 'chat_completions')"
        ))),
    }
}

fn default_key_var(provider: LlmProviderKind) -> &'static str {
    match provider {
        LlmProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        LlmProviderKind::OpenAi => "OPENAI_API_KEY",
    }
}

/// Default chat model for a provider.
#[must_use]
pub fn default_model(provider: LlmProviderKind) -> &'static str {
    match provider {
        LlmProviderKind::Anthropic => "claude-sonnet-4-5-20250929",
        LlmProviderKind::OpenAi => "gpt-4o",
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
