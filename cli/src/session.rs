//! Terminal chat session state.
//!
//! DESIGN
//! ======
//! The conversation lives here, not in the server. It is append-only:
//! each submitted line becomes a user message, each backend reply (or
//! failure) becomes an assistant message. Uploaded files are tracked by
//! name only; their contents are never read or sent.

use serde::Serialize;
use uuid::Uuid;

use crate::api::{ChatRequest, CliError};

pub const EMPTY_RESPONSE_TEXT: &str = "Backend returned an empty response.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

/// Capability toggles sent with every request. Defaults match the web UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
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

impl Settings {
    /// Flip one toggle by its wire name and return the new value.
    pub fn toggle(&mut self, name: &str) -> Result<bool, CliError> {
        let slot = match name {
            "web_search" => &mut self.web_search,
            "image_generation" => &mut self.image_generation,
            "data_analysis" => &mut self.data_analysis,
            "think" => &mut self.think,
            other => return Err(CliError::UnknownSetting(other.to_owned())),
        };
        *slot = !*slot;
        Ok(*slot)
    }
}

pub struct ChatSession {
    session_id: String,
    messages: Vec<Message>,
    pub settings: Settings,
    uploaded_files: Vec<String>,
}

impl ChatSession {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { session_id: Uuid::new_v4().to_string(), messages: Vec::new(), settings, uploaded_files: Vec::new() }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn uploaded_files(&self) -> &[String] {
        &self.uploaded_files
    }

    pub fn add_file(&mut self, name: &str) {
        self.uploaded_files.push(name.to_owned());
    }

    /// Append a user turn. Blank input is ignored and returns `false`.
    pub fn push_user(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.messages.push(Message { role: "user", content: text.to_owned() });
        true
    }

    /// Wire body for `POST /chat` covering the whole conversation so far.
    #[must_use]
    pub fn request(&self) -> ChatRequest<'_> {
        ChatRequest { messages: &self.messages, settings: &self.settings, session_id: &self.session_id }
    }

    /// Append the outcome of a chat call as an assistant turn and return it.
    pub fn push_reply(&mut self, reply: Result<String, CliError>) -> &str {
        let content = match reply {
            Ok(text) if text.is_empty() => EMPTY_RESPONSE_TEXT.to_owned(),
            Ok(text) => text,
            Err(err) => render_failure("Error while calling backend", &err),
        };
        self.push_assistant(content)
    }

    /// Append the outcome of a health probe as an assistant turn and return it.
    pub fn push_health(&mut self, result: Result<String, CliError>) -> &str {
        let content = match result {
            Ok(text) => format!("[Health check]\n{text}"),
            Err(err) => format!("[Health check]\n{}", render_failure("Health check failed", &err)),
        };
        self.push_assistant(content)
    }

    fn push_assistant(&mut self, content: String) -> &str {
        self.messages.push(Message { role: "assistant", content });
        self.messages
            .last()
            .map_or("", |m| m.content.as_str())
    }
}

/// `"<prefix>: <kind>: <description>"`.
#[must_use]
pub fn render_failure(prefix: &str, err: &CliError) -> String {
    format!("{prefix}: {}: {err}", err.kind())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
