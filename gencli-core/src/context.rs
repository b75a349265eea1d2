//! Everything a user turn needs, owned by the session.

use crate::backup::BackupManager;
use crate::config::{GencliConfig, Settings, SettingsStore};
use crate::llm::LanguageModel;
use crate::safety::normalize_root;
use crate::scanner::ScanOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AppContext {
    workspace: PathBuf,
    pub config: GencliConfig,
    pub settings: SettingsStore,
    pub backups: BackupManager,
    pub model: Arc<dyn LanguageModel>,
}

impl AppContext {
    pub fn new(
        workspace: impl AsRef<Path>,
        config: GencliConfig,
        settings: SettingsStore,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        let workspace = normalize_root(workspace.as_ref());
        let backups = BackupManager::with_directory(&workspace, &config.backup.directory)
            .with_failure_policy(config.backup.failure_policy);
        Self {
            workspace,
            config,
            settings,
            backups,
            model,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Snapshot of the current settings.
    pub fn current_settings(&mut self) -> Settings {
        self.settings.settings().clone()
    }

    pub fn scan_options(&self) -> ScanOptions {
        self.config.scan_options()
    }
}
