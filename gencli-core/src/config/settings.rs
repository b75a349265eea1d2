//! User settings persisted as JSON (`~/.gencli/settings.json` by default).
//!
//! The file may contain any subset of keys; missing keys fall back to
//! defaults and unknown keys are preserved on write.

use super::constants::{model_info, models, paths, temperature};
use crate::error::{GencliError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ko => "한국어",
            Self::En => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = GencliError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ko" => Ok(Self::Ko),
            "en" => Ok(Self::En),
            other => Err(GencliError::InvalidSetting(format!(
                "language must be 'ko' or 'en', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub model: String,
    pub language: Language,
    pub web_search_model: String,
    pub temperature: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: models::DEFAULT_MODEL.to_string(),
            language: Language::default(),
            web_search_model: models::DEFAULT_WEB_SEARCH_MODEL.to_string(),
            temperature: temperature::DEFAULT,
        }
    }
}

/// Keys accepted by `set <key> <value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Model,
    Language,
    WebSearchModel,
    Temperature,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::Model,
        SettingKey::Language,
        SettingKey::WebSearchModel,
        SettingKey::Temperature,
    ];

    /// Key as stored in the JSON file.
    pub fn json_key(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Language => "language",
            Self::WebSearchModel => "webSearchModel",
            Self::Temperature => "temperature",
        }
    }
}

impl FromStr for SettingKey {
    type Err = GencliError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized: String = value
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "model" => Ok(Self::Model),
            "language" | "lang" => Ok(Self::Language),
            "websearchmodel" => Ok(Self::WebSearchModel),
            "temperature" | "temp" => Ok(Self::Temperature),
            _ => Err(GencliError::InvalidSetting(format!(
                "unknown setting '{value}' (expected one of: model, language, webSearchModel, temperature)"
            ))),
        }
    }
}

/// Lazily loaded settings backed by a JSON file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    cached: Option<Settings>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    /// `~/.gencli/settings.json`, or `.gencli/settings.json` when no home
    /// directory is known.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::SETTINGS_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings, reading the file on first use.
    pub fn settings(&mut self) -> &Settings {
        if self.cached.is_none() {
            self.cached = Some(self.load());
        }
        self.cached.get_or_insert_with(Settings::default)
    }

    /// Validate and persist a single setting, returning the merged result.
    pub fn update(&mut self, key: &str, value: &str) -> Result<Settings> {
        let key: SettingKey = key.parse()?;
        let json_value = validate(key, value)?;

        let mut stored = self.read_object();
        stored.insert(key.json_key().to_string(), json_value);
        let merged = self.merge_over_defaults(&stored);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| GencliError::io(parent.display().to_string(), err))?;
        }
        let rendered = serde_json::to_string_pretty(&Value::Object(stored))
            .map_err(|err| GencliError::InvalidSetting(err.to_string()))?;
        fs::write(&self.path, rendered)
            .map_err(|err| GencliError::write(self.path.display().to_string(), err))?;

        debug!(key = key.json_key(), path = %self.path.display(), "updated setting");
        self.cached = Some(merged.clone());
        Ok(merged)
    }

    pub fn available_models() -> &'static [model_info::ModelInfo] {
        model_info::CATALOG
    }

    fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }
        self.merge_over_defaults(&self.read_object())
    }

    /// Apply each known key that validates on top of the defaults. Invalid
    /// values are skipped one by one so they never mask the valid ones.
    fn merge_over_defaults(&self, stored: &Map<String, Value>) -> Settings {
        let mut settings = Settings::default();
        for key in SettingKey::ALL {
            let Some(raw) = stored.get(key.json_key()) else {
                continue;
            };
            let text = match raw {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            if let Err(err) = apply(&mut settings, key, &text) {
                warn!(
                    path = %self.path.display(),
                    key = key.json_key(),
                    error = %err,
                    "ignoring invalid stored setting"
                );
            }
        }
        settings
    }

    fn read_object(&self) -> Map<String, Value> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "settings file is not a JSON object, ignoring it");
                Map::new()
            }
        }
    }
}

fn apply(settings: &mut Settings, key: SettingKey, value: &str) -> Result<()> {
    validate(key, value)?;
    let value = value.trim();
    match key {
        SettingKey::Model => settings.model = value.to_string(),
        SettingKey::WebSearchModel => settings.web_search_model = value.to_string(),
        SettingKey::Language => settings.language = value.parse()?,
        SettingKey::Temperature => {
            settings.temperature = value.parse().map_err(|_| {
                GencliError::InvalidSetting(format!("temperature must be a number, got '{value}'"))
            })?;
        }
    }
    Ok(())
}

fn validate(key: SettingKey, value: &str) -> Result<Value> {
    let value = value.trim();
    match key {
        SettingKey::Model | SettingKey::WebSearchModel => {
            if models::SUPPORTED_MODELS.contains(&value) {
                Ok(Value::String(value.to_string()))
            } else {
                Err(GencliError::InvalidSetting(format!(
                    "unknown model '{value}' (available: {})",
                    models::SUPPORTED_MODELS.join(", ")
                )))
            }
        }
        SettingKey::Language => value
            .parse::<Language>()
            .map(|language| Value::String(language.code().to_string())),
        SettingKey::Temperature => {
            let parsed: f32 = value.parse().map_err(|_| {
                GencliError::InvalidSetting(format!("temperature must be a number, got '{value}'"))
            })?;
            if !(temperature::MIN..=temperature::MAX).contains(&parsed) {
                return Err(GencliError::InvalidSetting(format!(
                    "temperature must be between {} and {}",
                    temperature::MIN,
                    temperature::MAX
                )));
            }
            serde_json::Number::from_f64(f64::from(parsed))
                .map(Value::Number)
                .ok_or_else(|| GencliError::InvalidSetting(format!("invalid temperature '{value}'")))
        }
    }
}
