//! gencli core library
//!
//! Everything the `gencli` binary does lives here: input classification and
//! dispatch, project analysis, AI-assisted file modification guarded by
//! backups, README generation, search-augmented answers and the settings
//! store. Model access goes through [`llm::LanguageModel`] so every workflow
//! can run against a scripted model in tests.
//!
//! ## Safety
//!
//! - Paths are validated against the workspace root before any read or write
//! - A backup is written before a file is overwritten
//! - Model replies that cannot be parsed never touch the target file

pub mod backup;
pub mod chat;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod gemini;
pub mod llm;
pub mod prompts;
pub mod safety;
pub mod scanner;
pub mod ui;
pub mod websearch;

// Re-exports for convenience
pub use backup::{BackupFailurePolicy, BackupManager, BackupMatch, BackupRecord, CleanupPolicy};
pub use chat::ChatSession;
pub use commands::{Action, ClassifiedCommand, DispatchOutcome, dispatch};
pub use config::{ConfigManager, GencliConfig, Language, Settings, SettingsStore};
pub use context::AppContext;
pub use error::{ErrorCategory, GencliError, Result};
pub use llm::{GeminiProvider, LLMError, LanguageModel, ModelRequest, ModelResponse};
pub use scanner::{ProjectFileEntry, ScanOptions};
pub use websearch::{WebSearchAnswer, WebSearchOrchestrator};
