#![allow(dead_code)]

use async_trait::async_trait;
use gencli_core::config::{GencliConfig, SettingsStore};
use gencli_core::llm::{LLMError, LanguageModel, ModelRequest, ModelResponse, SearchSource};
use gencli_core::AppContext;
use serde_json::json;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Replays queued replies in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<ModelResponse, LLMError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, text: impl Into<String>) -> &Self {
        self.push(Ok(ModelResponse {
            text: text.into(),
            sources: Vec::new(),
        }))
    }

    pub fn reply_with_sources(&self, text: impl Into<String>, sources: &[(&str, &str)]) -> &Self {
        self.push(Ok(ModelResponse {
            text: text.into(),
            sources: sources
                .iter()
                .map(|(url, title)| SearchSource {
                    url: url.to_string(),
                    title: title.to_string(),
                })
                .collect(),
        }))
    }

    pub fn fail(&self, err: LLMError) -> &Self {
        self.push(Err(err))
    }

    /// Queue a classifier reply.
    pub fn classify_as(&self, action: &str, file_path: Option<&str>, request: Option<&str>, text: &str) -> &Self {
        let mut value = json!({"action": action, "text": text});
        if let Some(path) = file_path {
            value["filePath"] = json!(path);
        }
        if let Some(request) = request {
            value["request"] = json!(request);
        }
        self.reply(value.to_string())
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().expect("replies lock").len()
    }

    fn push(&self, reply: Result<ModelResponse, LLMError>) -> &Self {
        self.replies.lock().expect("replies lock").push_back(reply);
        self
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, LLMError> {
        self.requests.lock().expect("requests lock").push(request);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(LLMError::Provider("no scripted reply left".into())))
    }
}

/// A throwaway workspace with its own settings file.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub model: Arc<ScriptedModel>,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            model: ScriptedModel::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("Failed to read test file")
    }

    /// Backup files currently on disk, relative to the backup directory.
    pub fn backup_files(&self) -> Vec<PathBuf> {
        let root = self.dir.path().join("backup");
        if !root.exists() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.path().strip_prefix(&root).ok().map(Path::to_path_buf))
            .collect();
        files.sort();
        files
    }

    pub fn context(&self) -> AppContext {
        self.context_with(GencliConfig::default())
    }

    pub fn context_with(&self, config: GencliConfig) -> AppContext {
        let settings = SettingsStore::new(self.dir.path().join(".gencli").join("settings.json"));
        AppContext::new(self.dir.path(), config, settings, self.model.clone())
    }
}
