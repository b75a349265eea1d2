use super::constants::paths;
use crate::backup::{BackupFailurePolicy, CleanupPolicy, DEFAULT_BACKUP_DIR};
use crate::gemini::ClientConfig;
use crate::safety::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB};
use crate::scanner::{DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_SUFFIXES, DEFAULT_MAX_CONTENT_CHARS, ScanOptions};
use crate::websearch::SearchOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Backup behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    /// Backup directory, relative to the workspace
    #[serde(default = "default_backup_directory")]
    pub directory: String,

    /// Whether a failed backup blocks the write
    #[serde(default)]
    pub failure_policy: BackupFailurePolicy,

    /// Default policy for `backup cleanup` without flags
    #[serde(default)]
    pub cleanup_policy: CleanupPolicyConfig,
}

fn default_backup_directory() -> String {
    DEFAULT_BACKUP_DIR.to_string()
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            directory: default_backup_directory(),
            failure_policy: BackupFailurePolicy::default(),
            cleanup_policy: CleanupPolicyConfig::default(),
        }
    }
}

/// TOML form of [`CleanupPolicy`]:
/// `cleanup_policy = "all"`, `{ keep_latest = 3 }` or `{ older_than_days = 30 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicyConfig {
    #[default]
    All,
    KeepLatest(usize),
    OlderThanDays(u32),
}

impl From<CleanupPolicyConfig> for CleanupPolicy {
    fn from(config: CleanupPolicyConfig) -> Self {
        match config {
            CleanupPolicyConfig::All => CleanupPolicy::All,
            CleanupPolicyConfig::KeepLatest(keep) => CleanupPolicy::KeepLatest(keep),
            CleanupPolicyConfig::OlderThanDays(days) => {
                CleanupPolicy::OlderThan(chrono::Duration::days(i64::from(days)))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    #[serde(default = "default_exclude_suffixes")]
    pub exclude_suffixes: Vec<String>,
    /// Characters kept from the head of each file
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Depth limit for the `tree` command
    #[serde(default)]
    pub tree_max_depth: Option<usize>,
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect()
}
fn default_exclude_suffixes() -> Vec<String> {
    DEFAULT_EXCLUDED_SUFFIXES.iter().map(|s| s.to_string()).collect()
}
fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: default_exclude_dirs(),
            exclude_suffixes: default_exclude_suffixes(),
            max_content_chars: default_max_content_chars(),
            tree_max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Extensions the modify workflow may rewrite
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}
fn default_max_file_size_mb() -> u64 {
    DEFAULT_MAX_FILE_SIZE_MB
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientSection {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Override for the Gemini API base URL
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebSearchConfig {
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_initial_query_count")]
    pub initial_query_count: usize,
}

fn default_max_rounds() -> usize {
    1
}
fn default_initial_query_count() -> usize {
    2
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            initial_query_count: default_initial_query_count(),
        }
    }
}

/// Contents of `gencli.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GencliConfig {
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub websearch: WebSearchConfig,
    /// Settings file location; defaults to `~/.gencli/settings.json`
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

impl GencliConfig {
    /// Scanner options with the backup directory always excluded. A
    /// single-segment directory is skipped by name, a nested one only at its
    /// own location.
    pub fn scan_options(&self) -> ScanOptions {
        let mut exclude_dirs = self.scanner.exclude_dirs.clone();
        let mut exclude_paths = Vec::new();
        let backup_dir: PathBuf = Path::new(self.backup.directory.trim())
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        match backup_dir.components().count() {
            0 | 1 => {
                let name = backup_dir
                    .to_str()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(DEFAULT_BACKUP_DIR)
                    .to_string();
                if !exclude_dirs.contains(&name) {
                    exclude_dirs.push(name);
                }
            }
            _ => exclude_paths.push(backup_dir),
        }
        ScanOptions {
            exclude_dirs,
            exclude_paths,
            exclude_suffixes: self.scanner.exclude_suffixes.clone(),
            max_content_chars: self.scanner.max_content_chars,
            tree_max_depth: self.scanner.tree_max_depth,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::with_timeouts(
            self.client.request_timeout_secs,
            self.client.connect_timeout_secs,
        );
        match &self.client.base_url {
            Some(base_url) => config.with_base_url(base_url.trim_end_matches('/')),
            None => config,
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            // 0 turns reflection off; the initial searches still run
            max_rounds: self.websearch.max_rounds,
            initial_query_count: self.websearch.initial_query_count.max(1),
        }
    }
}

/// Locates and loads `gencli.toml`
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: GencliConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Search order: `<workspace>/gencli.toml`, `<workspace>/.gencli/gencli.toml`,
    /// `~/.gencli/gencli.toml`, then built-in defaults.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();

        let config_path = workspace.join(paths::CONFIG_FILE);
        if config_path.exists() {
            return Self::load_from_file(&config_path);
        }

        let fallback_path = workspace.join(paths::CONFIG_DIR).join(paths::CONFIG_FILE);
        if fallback_path.exists() {
            return Self::load_from_file(&fallback_path);
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config_path = home_dir.join(paths::CONFIG_DIR).join(paths::CONFIG_FILE);
            if home_config_path.exists() {
                return Self::load_from_file(&home_config_path);
            }
        }

        Ok(Self {
            config: GencliConfig::default(),
            config_path: None,
        })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: GencliConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    pub fn config(&self) -> &GencliConfig {
        &self.config
    }

    pub fn into_config(self) -> GencliConfig {
        self.config
    }

    /// Path the configuration was read from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_file_uses_defaults() {
        let config: GencliConfig = toml::from_str("").expect("parse");
        assert_eq!(config.backup.directory, "backup");
        assert_eq!(config.backup.failure_policy, BackupFailurePolicy::FailOpen);
        assert_eq!(config.client.request_timeout_secs, 30);
        assert_eq!(config.security.max_file_size_mb, 10);
        assert_eq!(config.websearch.initial_query_count, 2);
        assert!(config.settings_path.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config: GencliConfig = toml::from_str(
            r#"
            settings_path = "/tmp/gencli-settings.json"

            [backup]
            directory = ".snapshots"
            failure_policy = "fail_closed"
            cleanup_policy = { keep_latest = 3 }

            [security]
            allowed_extensions = ["js", "go"]

            [client]
            request_timeout_secs = 5
            "#,
        )
        .expect("parse");

        assert_eq!(config.backup.failure_policy, BackupFailurePolicy::FailClosed);
        assert_eq!(config.backup.cleanup_policy, CleanupPolicyConfig::KeepLatest(3));
        assert_eq!(config.security.allowed_extensions, vec!["js", "go"]);
        assert_eq!(config.client.connect_timeout_secs, 10);
        assert_eq!(config.client_config().request_timeout.as_secs(), 5);
        assert!(config.scan_options().exclude_dirs.contains(&".snapshots".to_string()));
        assert_eq!(
            config.settings_path.as_deref(),
            Some(Path::new("/tmp/gencli-settings.json"))
        );
    }

    #[test]
    fn nested_backup_dir_is_excluded_by_full_path() {
        let config: GencliConfig = toml::from_str("[backup]\ndirectory = \"./tools/backups/\"\n").expect("parse");
        let options = config.scan_options();
        assert_eq!(options.exclude_paths, vec![PathBuf::from("tools/backups")]);
        assert!(!options.exclude_dirs.contains(&"tools".to_string()));

        let config: GencliConfig = toml::from_str("[backup]\ndirectory = \".snapshots\"\n").expect("parse");
        let options = config.scan_options();
        assert!(options.exclude_paths.is_empty());
        assert!(options.exclude_dirs.contains(&".snapshots".to_string()));
    }

    #[test]
    fn zero_search_rounds_are_kept() {
        let config: GencliConfig =
            toml::from_str("[websearch]\nmax_rounds = 0\ninitial_query_count = 0\n").expect("parse");
        let options = config.search_options();
        assert_eq!(options.max_rounds, 0);
        assert_eq!(options.initial_query_count, 1);
    }

    #[test]
    fn workspace_file_wins_over_dot_dir() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join(".gencli")).expect("mkdir");
        fs::write(dir.path().join(".gencli/gencli.toml"), "[websearch]\nmax_rounds = 4\n").expect("write");

        let manager = ConfigManager::load_from_workspace(dir.path()).expect("load");
        assert_eq!(manager.config().websearch.max_rounds, 4);

        fs::write(dir.path().join("gencli.toml"), "[websearch]\nmax_rounds = 2\n").expect("write");
        let manager = ConfigManager::load_from_workspace(dir.path()).expect("load");
        assert_eq!(manager.config().websearch.max_rounds, 2);
        assert_eq!(manager.config_path(), Some(dir.path().join("gencli.toml").as_path()));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("gencli.toml");
        fs::write(&path, "[backup\n").expect("write");
        let err = ConfigManager::load_from_file(&path).expect_err("should fail");
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
