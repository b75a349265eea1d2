//! Project and single-file analysis.

use super::{read_text_file, resolve_existing_file};
use crate::context::AppContext;
use crate::error::{GencliError, Result};
use crate::llm::ModelRequest;
use crate::prompts::{PromptKind, get_prompt};
use crate::scanner;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisTarget {
    Project { file_count: usize },
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub target: AnalysisTarget,
    pub analysis: String,
}

/// Scan the workspace and ask the model for a project-level analysis.
pub async fn analyze_project(ctx: &mut AppContext) -> Result<AnalysisReport> {
    let entries = scanner::scan(ctx.workspace(), &ctx.scan_options());
    if entries.is_empty() {
        return Err(GencliError::EmptyProject(ctx.workspace().display().to_string()));
    }
    info!(files = entries.len(), "analyzing project");

    let listing = serde_json::to_string_pretty(&entries)
        .map_err(|err| GencliError::ResponseParse(err.to_string()))?;
    let max_chars = ctx.config.scanner.max_content_chars;
    let message = format!(
        "Analyze the following project files. Each file's content is limited to its first {max_chars} characters.\n\n{listing}"
    );

    let settings = ctx.current_settings();
    let request = ModelRequest::new(
        &settings.model,
        get_prompt(PromptKind::CodeAnalysis, settings.language),
        message,
    )
    .with_temperature(settings.temperature);
    let response = ctx.model.generate(request).await?;

    Ok(AnalysisReport {
        target: AnalysisTarget::Project {
            file_count: entries.len(),
        },
        analysis: response.text,
    })
}

/// Analyze one workspace file. Nothing is written.
pub async fn analyze_file(ctx: &mut AppContext, file_path: &str) -> Result<AnalysisReport> {
    let path = resolve_existing_file(ctx, file_path)?;
    let content = read_text_file(&path)?;
    let relative = path
        .strip_prefix(ctx.workspace())
        .unwrap_or(&path)
        .to_path_buf();
    info!(file = %relative.display(), "analyzing file");

    let settings = ctx.current_settings();
    let message = format!(
        "Analyze the following code from `{}`:\n\n{content}",
        relative.display()
    );
    let request = ModelRequest::new(
        &settings.model,
        get_prompt(PromptKind::CodeAnalysis, settings.language),
        message,
    )
    .with_temperature(settings.temperature);
    let response = ctx.model.generate(request).await?;

    Ok(AnalysisReport {
        target: AnalysisTarget::File(relative),
        analysis: response.text,
    })
}
