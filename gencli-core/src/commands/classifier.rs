//! Turns a free-form utterance into a [`ClassifiedCommand`] with one
//! schema-constrained model call.

use crate::config::Settings;
use crate::config::constants::temperature;
use crate::error::{GencliError, Result};
use crate::llm::{LanguageModel, ModelRequest};
use crate::prompts::{PromptKind, get_prompt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Analyze,
    Modify,
    Chat,
    Readme,
    Help,
    Backup,
    Restore,
    Cleanup,
    Websearch,
    Settings,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::Analyze,
        Action::Modify,
        Action::Chat,
        Action::Readme,
        Action::Help,
        Action::Backup,
        Action::Restore,
        Action::Cleanup,
        Action::Websearch,
        Action::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Modify => "modify",
            Self::Chat => "chat",
            Self::Readme => "readme",
            Self::Help => "help",
            Self::Backup => "backup",
            Self::Restore => "restore",
            Self::Cleanup => "cleanup",
            Self::Websearch => "websearch",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = GencliError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| GencliError::UnknownAction(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCommand {
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

/// JSON schema sent with every classification call.
pub fn classification_schema() -> Value {
    let actions: Vec<&str> = Action::ALL.iter().map(|action| action.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "action": {"type": "STRING", "enum": actions},
            "filePath": {"type": "STRING"},
            "request": {"type": "STRING"},
            "text": {"type": "STRING"},
            "searchQuery": {"type": "STRING"}
        },
        "required": ["action", "text"]
    })
}

/// Parse the raw model output. Unknown actions are an error, never chat.
pub fn parse_classification(raw: &str) -> Result<ClassifiedCommand> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|err| GencliError::Classification(format!("response is not valid JSON: {err}")))?;
    let Value::Object(object) = value else {
        return Err(GencliError::Classification(
            "response is not a JSON object".to_string(),
        ));
    };

    let action = required_string(&object, "action")?;
    let text = required_string(&object, "text")?;
    let action: Action = action.parse()?;

    Ok(ClassifiedCommand {
        action,
        file_path: optional_string(&object, "filePath"),
        request: optional_string(&object, "request"),
        text,
        search_query: optional_string(&object, "searchQuery"),
    })
}

/// Classify `input` with the model configured in `settings`.
pub async fn classify(
    model: &dyn LanguageModel,
    settings: &Settings,
    input: &str,
) -> Result<ClassifiedCommand> {
    let request = ModelRequest::new(
        &settings.model,
        get_prompt(PromptKind::CommandClassification, settings.language),
        input,
    )
    .with_temperature(temperature::PRECISE)
    .with_schema(classification_schema());

    let response = model.generate(request).await?;
    let command = parse_classification(&response.text)?;
    debug!(action = %command.action, file = ?command.file_path, "classified input");
    Ok(command)
}

fn required_string(object: &Map<String, Value>, key: &str) -> Result<String> {
    match object.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(GencliError::Classification(format!("'{key}' is not a string"))),
        None => Err(GencliError::Classification(format!("missing '{key}'"))),
    }
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
