//! Configuration: `gencli.toml`, the JSON settings file and API keys.

pub mod api_keys;
pub mod constants;
pub mod loader;
pub mod settings;

pub use loader::{
    BackupConfig, CleanupPolicyConfig, ClientSection, ConfigManager, GencliConfig, ScannerConfig,
    SecurityConfig, WebSearchConfig,
};
pub use settings::{Language, SettingKey, Settings, SettingsStore};
