//! Routes one line of user input.
//!
//! Direct commands (`help`, `tree`, `settings`, `models`, `set`, `backup`)
//! run without a model call. Everything else is classified and handed to the
//! matching workflow. Plain chat is returned to the caller as
//! [`DispatchOutcome::Chat`].

use super::analyze::{AnalysisTarget, analyze_file, analyze_project};
use super::backup::{self as backup_cmd, BACKUP_USAGE, BackupCommand, parse_backup_command};
use super::classifier::{Action, ClassifiedCommand, classify};
use super::help::help_text;
use super::modify::{ModificationOutcome, modify_file};
use super::readme::generate_readme;
use super::settings::{SET_USAGE, apply_setting, render_models, render_settings};
use crate::context::AppContext;
use crate::error::GencliError;
use crate::safety::{sanitize_input, validate_and_normalize_path};
use crate::scanner::render_tree;
use crate::ui::{MessageStyle, Renderer};
use crate::websearch::WebSearchOrchestrator;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Extensions tried, in order, for a file named without one.
pub const CANDIDATE_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "json", "md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    /// Not a command; the caller should continue the conversation.
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectCommand {
    Help,
    Tree,
    Settings,
    Models,
    Set { key: String, value: String },
    Backup(BackupCommand),
    Usage(&'static str),
}

/// Case-insensitive match of the direct command vocabulary.
pub fn parse_direct_command(input: &str) -> Option<DirectCommand> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let (first, rest) = words.split_first()?;
    match (first.to_lowercase().as_str(), rest) {
        ("help", []) => Some(DirectCommand::Help),
        ("tree", []) => Some(DirectCommand::Tree),
        ("settings", []) => Some(DirectCommand::Settings),
        ("models", []) => Some(DirectCommand::Models),
        ("set", [key, value @ ..]) if !value.is_empty() => Some(DirectCommand::Set {
            key: key.to_string(),
            value: value.join(" "),
        }),
        ("set", _) => Some(DirectCommand::Usage(SET_USAGE)),
        ("backup", args) => Some(
            parse_backup_command(args)
                .map(DirectCommand::Backup)
                .unwrap_or(DirectCommand::Usage(BACKUP_USAGE)),
        ),
        _ => None,
    }
}

/// Handle one line of input. Recoverable failures are rendered with a hint
/// and reported as `Handled`; only renderer failures are returned as errors.
pub async fn dispatch(
    ctx: &mut AppContext,
    input: &str,
    renderer: &mut dyn Renderer,
) -> Result<DispatchOutcome> {
    let input = sanitize_input(input);
    if input.is_empty() {
        return Ok(DispatchOutcome::Handled);
    }

    if let Some(command) = parse_direct_command(&input) {
        run_direct(ctx, command, renderer)?;
        return Ok(DispatchOutcome::Handled);
    }

    let settings = ctx.current_settings();
    let classified = {
        let _spinner = renderer.progress("Understanding your request...");
        classify(ctx.model.as_ref(), &settings, &input).await
    };
    let command = match classified {
        Ok(command) => command,
        Err(err) => {
            render_error(renderer, &err)?;
            return Ok(DispatchOutcome::Handled);
        }
    };
    debug!(action = %command.action, "dispatching classified command");

    if command.action == Action::Chat {
        return Ok(DispatchOutcome::Chat);
    }
    run_classified(ctx, command, &input, renderer).await?;
    Ok(DispatchOutcome::Handled)
}

fn run_direct(ctx: &mut AppContext, command: DirectCommand, renderer: &mut dyn Renderer) -> Result<()> {
    match command {
        DirectCommand::Help => {
            let language = ctx.current_settings().language;
            renderer.block(MessageStyle::Info, help_text(language))
        }
        DirectCommand::Tree => match render_tree(ctx.workspace(), &ctx.scan_options()) {
            Ok(tree) => renderer.block(MessageStyle::Output, &tree),
            Err(err) => render_error(renderer, &err),
        },
        DirectCommand::Settings => {
            let settings = ctx.current_settings();
            render_settings(&settings, &ctx.settings, renderer)
        }
        DirectCommand::Models => {
            let current = ctx.current_settings().model;
            render_models(&current, renderer)
        }
        DirectCommand::Set { key, value } => match apply_setting(ctx, &key, &value) {
            Ok(_) => renderer.line(MessageStyle::Success, &format!("{key} set to {value}")),
            Err(err) => render_error(renderer, &err),
        },
        DirectCommand::Backup(command) => run_backup(ctx, command, renderer),
        DirectCommand::Usage(usage) => renderer.line(MessageStyle::Warning, usage),
    }
}

fn run_backup(ctx: &mut AppContext, command: BackupCommand, renderer: &mut dyn Renderer) -> Result<()> {
    match command {
        BackupCommand::List => match ctx.backups.list_backups() {
            Ok(records) => backup_cmd::render_backup_list(&records, renderer),
            Err(err) => render_error(renderer, &err),
        },
        BackupCommand::Restore(query) => match backup_cmd::restore(ctx, &query) {
            Ok(restored) => {
                renderer.line(
                    MessageStyle::Success,
                    &format!(
                        "Restored {} from {}",
                        restored.target.display(),
                        display_relative(ctx.workspace(), &restored.backup)
                    ),
                )?;
                if restored.candidates > 1 {
                    renderer.line(
                        MessageStyle::Hint,
                        &format!(
                            "{} backups matched '{query}'; the most recent was used. Use `backup list` to pick another.",
                            restored.candidates
                        ),
                    )?;
                }
                Ok(())
            }
            Err(err) => render_error(renderer, &err),
        },
        BackupCommand::Cleanup(policy) => match backup_cmd::cleanup(ctx, policy) {
            Ok(deleted) => renderer.line(MessageStyle::Success, &format!("Deleted {deleted} backup file(s).")),
            Err(err) => render_error(renderer, &err),
        },
    }
}

async fn run_classified(
    ctx: &mut AppContext,
    command: ClassifiedCommand,
    input: &str,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    match command.action {
        Action::Analyze => {
            let result = {
                let _spinner = renderer.progress("Analyzing...");
                match command.file_path.as_deref() {
                    None => analyze_project(ctx).await,
                    Some(raw) => {
                        let resolved = resolve_extension(ctx.workspace(), raw);
                        analyze_file(ctx, &resolved).await
                    }
                }
            };
            match result {
                Ok(report) => {
                    let heading = match &report.target {
                        AnalysisTarget::Project { file_count } => {
                            format!("Project analysis ({file_count} files)")
                        }
                        AnalysisTarget::File(path) => format!("Analysis of {}", path.display()),
                    };
                    renderer.line(MessageStyle::Info, &heading)?;
                    renderer.block(MessageStyle::Response, &report.analysis)
                }
                Err(err) => render_error(renderer, &err),
            }
        }
        Action::Modify => {
            let (Some(raw), Some(request)) = (command.file_path.as_deref(), command.request.as_deref())
            else {
                let missing = if command.file_path.is_none() { "file path" } else { "request" };
                return render_error(renderer, &GencliError::MissingParameter(missing));
            };
            let resolved = resolve_extension(ctx.workspace(), raw);
            let result = {
                let _spinner = renderer.progress("Modifying...");
                modify_file(ctx, &resolved, request).await
            };
            match result {
                Ok(ModificationOutcome::Modified(modified)) => {
                    renderer.line(
                        MessageStyle::Success,
                        &format!("Modified {}", modified.file.display()),
                    )?;
                    match &modified.backup {
                        Some(backup) => renderer.line(
                            MessageStyle::Info,
                            &format!("Backup: {}", display_relative(ctx.workspace(), backup)),
                        )?,
                        None => renderer.line(
                            MessageStyle::Warning,
                            "No backup was taken for this change.",
                        )?,
                    }
                    if !modified.explanation.is_empty() {
                        renderer.block(MessageStyle::Response, &modified.explanation)?;
                    }
                    Ok(())
                }
                Ok(ModificationOutcome::Empty { file }) => renderer.line(
                    MessageStyle::Warning,
                    &format!("{} is empty; nothing to modify.", file.display()),
                ),
                Err(err) => render_error(renderer, &err),
            }
        }
        Action::Readme => {
            let result = {
                let _spinner = renderer.progress("Writing README...");
                generate_readme(ctx).await
            };
            match result {
                Ok(readme) => renderer.line(
                    MessageStyle::Success,
                    &format!(
                        "Wrote {} from {} project files.",
                        readme.file.display(),
                        readme.file_count
                    ),
                ),
                Err(err) => render_error(renderer, &err),
            }
        }
        Action::Backup => run_backup(ctx, BackupCommand::List, renderer),
        Action::Restore => {
            let query = command
                .file_path
                .clone()
                .filter(|query| !query.is_empty())
                .unwrap_or_else(|| command.text.clone());
            run_backup(ctx, BackupCommand::Restore(query), renderer)
        }
        Action::Cleanup => run_backup(ctx, BackupCommand::Cleanup(None), renderer),
        Action::Websearch => {
            let question = command.search_query.as_deref().unwrap_or(input);
            let settings = ctx.current_settings();
            let result = {
                let _spinner = renderer.progress("Searching the web...");
                WebSearchOrchestrator::new(
                    ctx.model.as_ref(),
                    &settings.web_search_model,
                    settings.language,
                )
                .with_options(ctx.config.search_options())
                .search(question)
                .await
            };
            match result {
                Ok(answer) => {
                    renderer.block(MessageStyle::Response, &answer.answer)?;
                    if !answer.sources.is_empty() {
                        renderer.line(MessageStyle::Info, "Sources:")?;
                        for (index, source) in answer.sources.iter().enumerate() {
                            renderer.line(
                                MessageStyle::Output,
                                &format!("  [{}] {} - {}", index + 1, source.title, source.url),
                            )?;
                        }
                    }
                    Ok(())
                }
                Err(err) => render_error(renderer, &err),
            }
        }
        Action::Settings => run_direct(ctx, DirectCommand::Settings, renderer),
        Action::Help => run_direct(ctx, DirectCommand::Help, renderer),
        Action::Chat => Ok(()),
    }
}

/// `raw` unchanged if it has an extension or no candidate exists; otherwise the
/// first `raw.<ext>` that exists inside the workspace.
pub fn resolve_extension(workspace: &Path, raw: &str) -> String {
    if Path::new(raw).extension().is_some() {
        return raw.to_string();
    }
    CANDIDATE_EXTENSIONS
        .iter()
        .map(|ext| format!("{raw}.{ext}"))
        .find(|candidate| {
            validate_and_normalize_path(candidate, workspace)
                .map(|path| path.is_file())
                .unwrap_or(false)
        })
        .unwrap_or_else(|| raw.to_string())
}

/// Message plus remediation hint.
pub fn render_error(renderer: &mut dyn Renderer, err: &GencliError) -> Result<()> {
    renderer.line(MessageStyle::Error, &err.to_string())?;
    if let Some(hint) = err.hint() {
        renderer.line(MessageStyle::Hint, &hint)?;
    }
    Ok(())
}

fn display_relative(workspace: &Path, path: &Path) -> String {
    path.strip_prefix(workspace).unwrap_or(path).display().to_string()
}
