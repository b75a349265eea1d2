//! Provider-neutral request/response types and the capability trait every
//! workflow talks to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// One call to the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: String,
    pub message: String,
    pub temperature: Option<f32>,
    /// When set the model must answer with JSON matching this schema.
    pub response_schema: Option<Value>,
    /// Ground the answer with the Google Search tool.
    pub google_search: bool,
    /// Earlier turns, oldest first.
    pub history: Vec<ChatTurn>,
}

impl ModelRequest {
    pub fn new(
        model: impl Into<String>,
        system_instruction: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            message: message.into(),
            temperature: None,
            response_schema: None,
            google_search: false,
            history: Vec::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_google_search(mut self) -> Self {
        self.google_search = true;
        self
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSource {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
    pub sources: Vec<SearchSource>,
}

impl ModelResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// The generative-AI capability. Implemented by [`super::GeminiProvider`] and
/// by scripted models in tests.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name (e.g., "gemini")
    fn name(&self) -> &str;

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, LLMError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Provider error: {0}")]
    Provider(String),
}
