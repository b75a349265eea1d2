pub mod response;

pub use response::{Candidate, GenerateContentResponse, GroundingChunk, GroundingMetadata, WebSource};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            parts: vec![Part::text(text)],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: "model".into(),
            parts: vec![Part::text(text)],
        }
    }

    /// System instructions carry no role.
    pub fn system_text(text: impl Into<String>) -> Self {
        Self {
            role: String::new(),
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of every text part.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl GenerationConfig {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.response_mime_type.is_none() && self.response_schema.is_none()
    }
}

/// Only the built-in Google Search tool is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleSearch {}

impl Tool {
    pub fn google_search() -> Self {
        Self {
            google_search: GoogleSearch::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_camel_case_fields() {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text("hi")],
            system_instruction: Some(Content::system_text("be brief")),
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
                response_mime_type: Some("application/json".into()),
                response_schema: Some(json!({"type": "object"})),
            }),
            tools: Some(vec![Tool::google_search()]),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["tools"][0], json!({"googleSearch": {}}));
    }
}
