//! Project scanning for whole-project analysis and README generation.

use crate::error::{GencliError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "backup", "dist", "build", "target"];
pub const DEFAULT_EXCLUDED_SUFFIXES: &[&str] = &[".log", ".backup", ".lock", ".map"];
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 1000;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory names skipped at any depth.
    pub exclude_dirs: Vec<String>,
    /// Directories skipped by their path relative to the scan root.
    pub exclude_paths: Vec<PathBuf>,
    pub exclude_suffixes: Vec<String>,
    pub max_content_chars: usize,
    /// Depth limit for `render_tree`; `None` renders everything.
    pub tree_max_depth: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            exclude_paths: Vec::new(),
            exclude_suffixes: DEFAULT_EXCLUDED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            tree_max_depth: None,
        }
    }
}

impl ScanOptions {
    fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|dir| dir == name)
    }

    fn is_excluded_file(&self, name: &str) -> bool {
        self.exclude_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    fn is_excluded_path(&self, root: &Path, path: &Path) -> bool {
        path.strip_prefix(root)
            .is_ok_and(|relative| self.exclude_paths.iter().any(|excluded| excluded == relative))
    }

    /// Walk filter: drops symlinks and excluded directories before descending.
    fn keep(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if entry.path_is_symlink() {
            return false;
        }
        if !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !(self.is_excluded_dir(&name) || self.is_excluded_path(root, entry.path()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectFileEntry {
    fn error(path: String, error: impl ToString) -> Self {
        Self {
            path,
            kind: EntryKind::Error,
            content: None,
            error: Some(error.to_string()),
        }
    }
}

/// Depth-first walk of `root` collecting the head of every regular file.
///
/// Unreadable files and directories become `Error` entries instead of
/// aborting the scan. Symbolic links are never followed or listed.
pub fn scan(root: &Path, options: &ScanOptions) -> Vec<ProjectFileEntry> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| options.keep(root, entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|path| relative_display(root, path))
                    .unwrap_or_default();
                warn!(path = %path, error = %err, "scan could not read entry");
                if seen.insert(path.clone()) {
                    entries.push(ProjectFileEntry::error(path, err));
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if options.is_excluded_file(&name) {
            continue;
        }

        let path = relative_display(root, entry.path());
        if !seen.insert(path.clone()) {
            continue;
        }

        match read_head(entry.path(), options.max_content_chars) {
            Ok(content) => entries.push(ProjectFileEntry {
                path,
                kind: EntryKind::File,
                content: Some(content),
                error: None,
            }),
            Err(err) => {
                debug!(path = %path, error = %err, "failed to read file during scan");
                entries.push(ProjectFileEntry::error(path, err));
            }
        }
    }

    entries
}

/// ASCII tree of `root` using the same exclusions as [`scan`].
pub fn render_tree(root: &Path, options: &ScanOptions) -> Result<String> {
    if !root.is_dir() {
        return Err(GencliError::FileNotFound {
            path: root.display().to_string(),
            suggestions: Vec::new(),
        });
    }

    let name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let mut out = format!("{name}/\n");
    render_level(root, root, options, "", 1, &mut out)?;
    Ok(out)
}

fn render_level(
    root: &Path,
    dir: &Path,
    options: &ScanOptions,
    prefix: &str,
    depth: usize,
    out: &mut String,
) -> Result<()> {
    if options.tree_max_depth.is_some_and(|max| depth > max) {
        return Ok(());
    }

    let mut children: Vec<DirEntry> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| options.keep(root, entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_dir() || !options.is_excluded_file(&entry.file_name().to_string_lossy())
        })
        .collect();
    // directories first, then files, each alphabetical
    children.sort_by_key(|entry| !entry.file_type().is_dir());

    let count = children.len();
    for (index, child) in children.iter().enumerate() {
        let last = index + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        let name = child.file_name().to_string_lossy();
        if child.file_type().is_dir() {
            out.push_str(&format!("{prefix}{branch}{name}/\n"));
            let extension = if last { "    " } else { "│   " };
            render_level(root, child.path(), options, &format!("{prefix}{extension}"), depth + 1, out)?;
        } else {
            out.push_str(&format!("{prefix}{branch}{name}\n"));
        }
    }
    Ok(())
}

fn read_head(path: &Path, max_chars: usize) -> std::io::Result<String> {
    // a UTF-8 char is at most 4 bytes
    let limit = (max_chars as u64).saturating_mul(4).saturating_add(4);
    let mut buffer = Vec::new();
    File::open(path)?.take(limit).read_to_end(&mut buffer)?;
    let text = String::from_utf8_lossy(&buffer);
    Ok(text.chars().take(max_chars).collect())
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
