//! `backup list | restore <query> | cleanup [--keep N | --older-than DAYS]`

use crate::backup::{BackupMatch, BackupRecord, CleanupPolicy};
use crate::context::AppContext;
use crate::error::{GencliError, Result};
use crate::safety::validate_and_normalize_path;
use crate::ui::{MessageStyle, Renderer};
use std::path::{Path, PathBuf};

pub const BACKUP_USAGE: &str =
    "Usage: backup list | backup restore <file or backup name> | backup cleanup [--keep N | --older-than DAYS]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupCommand {
    List,
    Restore(String),
    /// `None` uses the configured default policy.
    Cleanup(Option<CleanupPolicy>),
}

/// Parse the words after `backup`. `None` means the usage should be shown.
pub fn parse_backup_command(args: &[&str]) -> Option<BackupCommand> {
    let (subcommand, rest) = args.split_first()?;
    match subcommand.to_ascii_lowercase().as_str() {
        "list" | "ls" if rest.is_empty() => Some(BackupCommand::List),
        "restore" if !rest.is_empty() => Some(BackupCommand::Restore(rest.join(" "))),
        "cleanup" | "clean" => parse_cleanup_flags(rest).map(BackupCommand::Cleanup),
        _ => None,
    }
}

fn parse_cleanup_flags(args: &[&str]) -> Option<Option<CleanupPolicy>> {
    match args {
        [] => Some(None),
        [flag, value] if flag.eq_ignore_ascii_case("--keep") => {
            value.parse().ok().map(|keep| Some(CleanupPolicy::KeepLatest(keep)))
        }
        [flag, value] if flag.eq_ignore_ascii_case("--older-than") => value
            .trim_end_matches(['d', 'D'])
            .parse::<u32>()
            .ok()
            .map(|days| Some(CleanupPolicy::OlderThan(chrono::Duration::days(i64::from(days))))),
        [flag] if flag.eq_ignore_ascii_case("--all") => Some(Some(CleanupPolicy::All)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredBackup {
    pub backup: PathBuf,
    /// Restored file, relative to the workspace
    pub target: PathBuf,
    /// How many backups matched a loose query; 1 for exact matches
    pub candidates: usize,
}

/// Restore by explicit backup path first, then by ranked match.
pub fn restore(ctx: &AppContext, query: &str) -> Result<RestoredBackup> {
    let query = query.trim();
    let manager = &ctx.backups;

    let (backup, candidates) = match explicit_backup_path(ctx, query) {
        Some(path) => (path, 1),
        None => match manager.find_backup(query)? {
            BackupMatch::Exact(record) => (record.path, 1),
            BackupMatch::Partial { record, candidates } => (record.path, candidates),
            BackupMatch::NotFound => return Err(GencliError::BackupNotFound(query.to_string())),
        },
    };

    let target = manager.restore_target(&backup)?;
    if !manager.restore_from_backup(&backup, None)? {
        return Err(GencliError::BackupNotFound(query.to_string()));
    }

    Ok(RestoredBackup {
        target: target
            .strip_prefix(ctx.workspace())
            .unwrap_or(&target)
            .to_path_buf(),
        backup,
        candidates,
    })
}

fn explicit_backup_path(ctx: &AppContext, query: &str) -> Option<PathBuf> {
    let backup_dir = ctx.backups.backup_dir();
    [Path::new(query).to_path_buf(), backup_dir.join(query)]
        .into_iter()
        .filter_map(|candidate| validate_and_normalize_path(candidate, ctx.workspace()).ok())
        .find(|path| path.starts_with(backup_dir) && path.is_file())
}

pub fn cleanup(ctx: &AppContext, policy: Option<CleanupPolicy>) -> Result<usize> {
    let policy = policy.unwrap_or_else(|| ctx.config.backup.cleanup_policy.into());
    ctx.backups.cleanup_backups(policy)
}

pub fn render_backup_list(records: &[BackupRecord], renderer: &mut dyn Renderer) -> anyhow::Result<()> {
    if records.is_empty() {
        renderer.line(MessageStyle::Info, "No backups found.")?;
        return Ok(());
    }
    renderer.line(MessageStyle::Info, &format!("{} backup(s), most recent first:", records.len()))?;
    for record in records {
        let marker = if record.pre_restore { " (pre-restore)" } else { "" };
        renderer.line(
            MessageStyle::Output,
            &format!(
                "  {}  {}  {}{}",
                record.created.format("%Y-%m-%d %H:%M:%S"),
                format_size(record.size),
                record.relative_name(),
                marker
            ),
        )?;
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{bytes:>7} B")
    } else if bytes_f < KB * KB {
        format!("{:>6.1} KB", bytes_f / KB)
    } else {
        format!("{:>6.1} MB", bytes_f / (KB * KB))
    }
}
