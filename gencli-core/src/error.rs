//! Error taxonomy shared by every gencli workflow.
//!
//! Every variant belongs to one [`ErrorCategory`]. Only a missing API key at
//! launch is fatal, and that is handled by the binary; everything here is
//! recoverable and rendered back to the user with a remediation hint.

use crate::llm::LLMError;
use crate::llm::error_display;
use std::io;

pub type Result<T, E = GencliError> = std::result::Result<T, E>;

/// Coarse grouping used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    ExternalCapability,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum GencliError {
    #[error("No file path was provided")]
    InvalidPath,
    #[error("Path is outside the workspace: {0}")]
    PathTraversal(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("File exceeds the {limit_mb} MB limit: {path}")]
    FileTooLarge { path: String, limit_mb: u64 },
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        suggestions: Vec<String>,
    },
    #[error("Backup not found: {0}")]
    BackupNotFound(String),
    #[error("No files to analyze under {0}")]
    EmptyProject(String),

    #[error(transparent)]
    Capability(#[from] LLMError),
    #[error("Could not classify command: {0}")]
    Classification(String),
    #[error("Unknown action '{0}'")]
    UnknownAction(String),
    #[error("Could not parse model response: {0}")]
    ResponseParse(String),
    #[error("Model returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Backup failed for {path}: {reason}")]
    BackupFailed { path: String, reason: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl GencliError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPath
            | Self::PathTraversal(_)
            | Self::UnsupportedType(_)
            | Self::FileTooLarge { .. }
            | Self::MissingParameter(_)
            | Self::InvalidSetting(_) => ErrorCategory::Validation,
            Self::FileNotFound { .. } | Self::BackupNotFound(_) | Self::EmptyProject(_) => {
                ErrorCategory::NotFound
            }
            Self::Capability(_)
            | Self::Classification(_)
            | Self::UnknownAction(_)
            | Self::ResponseParse(_)
            | Self::InvalidResponse(_) => ErrorCategory::ExternalCapability,
            Self::Write { .. } | Self::BackupFailed { .. } | Self::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Short remediation hint shown under the error message.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::InvalidPath => Some("Name the file you want to work on, e.g. `src/app.js`.".into()),
            Self::PathTraversal(_) => {
                Some("Only files inside the current workspace can be read or modified.".into())
            }
            Self::UnsupportedType(_) => Some(
                "Add the extension to `security.allowed_extensions` in gencli.toml to allow it."
                    .into(),
            ),
            Self::FileTooLarge { .. } => {
                Some("Split the file or raise `security.max_file_size_mb`.".into())
            }
            Self::MissingParameter(_) => {
                Some("Try: \"<file> 수정해줘: <what to change>\" or \"modify <file>: <request>\".".into())
            }
            Self::InvalidSetting(_) => Some("Run `models` or `settings` to see valid values.".into()),
            Self::FileNotFound { suggestions, .. } if !suggestions.is_empty() => {
                Some(format!("Did you mean: {}?", suggestions.join(", ")))
            }
            Self::FileNotFound { .. } => Some("Use `tree` to see the files in this workspace.".into()),
            Self::BackupNotFound(_) => Some("Use `backup list` to see available backups.".into()),
            Self::EmptyProject(_) => None,
            Self::Capability(err) => Some(error_display::error_hint(err).to_string()),
            Self::Classification(_) | Self::UnknownAction(_) => {
                Some("Rephrase the request or type `help` for the command list.".into())
            }
            Self::ResponseParse(_) | Self::InvalidResponse(_) => {
                Some("The file was not changed. Try again with a more specific request.".into())
            }
            Self::Write { .. } => Some(
                "Check that the file is writable and the disk has space. `backup list` shows any copies taken before the write."
                    .into(),
            ),
            Self::BackupFailed { .. } => Some(
                "The file was left untouched. Check permissions on the backup directory.".into(),
            ),
            Self::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(
            GencliError::PathTraversal("../x".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            GencliError::BackupNotFound("a".into()).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            GencliError::Capability(LLMError::RateLimit).category(),
            ErrorCategory::ExternalCapability
        );
    }

    #[test]
    fn not_found_hint_lists_suggestions() {
        let err = GencliError::FileNotFound {
            path: "app.js".into(),
            suggestions: vec!["app.ts".into(), "apps.js".into()],
        };
        let hint = err.hint().unwrap_or_default();
        assert!(hint.contains("app.ts"));
        assert!(hint.contains("apps.js"));
    }

    #[test]
    fn write_hint_does_not_promise_a_backup() {
        let err = GencliError::write(
            ".gencli/settings.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        );
        let hint = err.hint().unwrap_or_default();
        assert!(hint.contains("writable"));
        assert!(!hint.contains("was taken"));
        assert!(!hint.contains("backup restore"));
    }
}
