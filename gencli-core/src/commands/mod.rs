//! User-facing workflows and the dispatcher that routes input to them.

pub mod analyze;
pub mod backup;
pub mod classifier;
pub mod dispatcher;
pub mod help;
pub mod modify;
pub mod readme;
pub mod settings;

pub use analyze::{AnalysisReport, AnalysisTarget, analyze_file, analyze_project};
pub use classifier::{Action, ClassifiedCommand, classify, parse_classification};
pub use dispatcher::{DirectCommand, DispatchOutcome, dispatch, parse_direct_command};
pub use modify::{ModificationOutcome, ModificationResult, modify_file, parse_modification_response};
pub use readme::{ReadmeResult, generate_readme};

use crate::context::AppContext;
use crate::error::{GencliError, Result};
use crate::safety::{is_file_size_allowed, suggest_similar_files, validate_and_normalize_path};
use std::fs;
use std::path::{Path, PathBuf};

const SUGGESTION_LIMIT: usize = 5;

/// Validate `raw` against the workspace and require an existing regular file
/// within the configured size limit.
pub(crate) fn resolve_existing_file(ctx: &AppContext, raw: &str) -> Result<PathBuf> {
    let path = validate_and_normalize_path(raw, ctx.workspace())?;
    ensure_file_exists(&path, raw)?;
    ensure_size_allowed(&path, ctx.config.security.max_file_size_mb)?;
    Ok(path)
}

pub(crate) fn ensure_file_exists(path: &Path, raw: &str) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    Err(GencliError::FileNotFound {
        path: raw.to_string(),
        suggestions: suggest_similar_files(path, SUGGESTION_LIMIT),
    })
}

pub(crate) fn ensure_size_allowed(path: &Path, limit_mb: u64) -> Result<()> {
    if is_file_size_allowed(path, limit_mb) {
        Ok(())
    } else {
        Err(GencliError::FileTooLarge {
            path: path.display().to_string(),
            limit_mb,
        })
    }
}

pub(crate) fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| GencliError::io(path.display().to_string(), err))
}
