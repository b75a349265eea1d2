//! Timestamped backups of workspace files.
//!
//! Backups live under `<workspace>/<backup dir>/` and mirror the directory
//! layout of the originals. A backup is named
//! `<file>.<timestamp>.backup` where the timestamp is ISO-8601 UTC with
//! milliseconds and every `:` and `.` replaced by `-`, for example
//! `app.js.2024-01-15T10-30-45-123Z.backup`. Backups taken right before a
//! restore overwrites a file use a `pre-restore-` prefixed timestamp.

use crate::error::{GencliError, Result};
use crate::safety::{normalize_root, validate_and_normalize_path};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const DEFAULT_BACKUP_DIR: &str = "backup";
pub const BACKUP_EXTENSION: &str = ".backup";
const PRE_RESTORE_PREFIX: &str = "pre-restore-";
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// What to do when the pre-write backup cannot be taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupFailurePolicy {
    /// Log a warning and let the write proceed without a backup.
    #[default]
    FailOpen,
    /// Abort the write with [`GencliError::BackupFailed`].
    FailClosed,
}

/// Which backups `cleanup_backups` deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Every file under the backup directory.
    #[default]
    All,
    /// Keep the `n` most recent backups of each original file.
    KeepLatest(usize),
    /// Backups created before `now - age`.
    OlderThan(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub original_file: String,
    /// Directory relative to the backup root; empty for top-level files.
    pub directory: String,
    #[serde(skip)]
    pub sequence: u32,
    #[serde(skip)]
    pub pre_restore: bool,
}

impl BackupRecord {
    /// Path of the original file relative to the workspace.
    pub fn original_relative_path(&self) -> PathBuf {
        if self.directory.is_empty() {
            PathBuf::from(&self.original_file)
        } else {
            Path::new(&self.directory).join(&self.original_file)
        }
    }

    /// Path of the backup file relative to the backup root.
    pub fn relative_name(&self) -> String {
        if self.directory.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.directory, self.name)
        }
    }
}

/// Result of [`BackupManager::find_backup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupMatch {
    Exact(BackupRecord),
    /// Best of several loose matches; `candidates` counts all of them.
    Partial {
        record: BackupRecord,
        candidates: usize,
    },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedName {
    original_file: String,
    created: DateTime<Utc>,
    sequence: u32,
    pre_restore: bool,
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    workspace: PathBuf,
    backup_dir: PathBuf,
    failure_policy: BackupFailurePolicy,
}

impl BackupManager {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self::with_directory(workspace, DEFAULT_BACKUP_DIR)
    }

    pub fn with_directory(workspace: impl AsRef<Path>, directory: &str) -> Self {
        let workspace = normalize_root(workspace.as_ref());
        let backup_dir = workspace.join(directory);
        Self {
            workspace,
            backup_dir,
            failure_policy: BackupFailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: BackupFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn failure_policy(&self) -> BackupFailurePolicy {
        self.failure_policy
    }

    pub fn ensure_backup_directory(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|err| GencliError::io(self.backup_dir.display().to_string(), err))?;
        Ok(self.backup_dir.clone())
    }

    /// Write `content` as a new backup of `original` and return its path.
    ///
    /// Never overwrites an existing backup: a `-N` disambiguator is appended to
    /// the timestamp when two backups land in the same millisecond.
    pub fn create_backup(&self, original: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Result<PathBuf> {
        let stamp = backup_timestamp(Utc::now());
        self.write_backup(original.as_ref(), content.as_ref(), &stamp)
    }

    /// Backup step of a mutating workflow, honoring the failure policy.
    ///
    /// Returns `Ok(None)` when the backup failed under `FailOpen`.
    pub fn backup_before_write(
        &self,
        original: impl AsRef<Path>,
        content: impl AsRef<[u8]>,
    ) -> Result<Option<PathBuf>> {
        let original = original.as_ref();
        match self.create_backup(original, content) {
            Ok(path) => Ok(Some(path)),
            Err(err) => match self.failure_policy {
                BackupFailurePolicy::FailOpen => {
                    warn!(file = %original.display(), error = %err, "backup failed, continuing without one");
                    Ok(None)
                }
                BackupFailurePolicy::FailClosed => Err(GencliError::BackupFailed {
                    path: original.display().to_string(),
                    reason: err.to_string(),
                }),
            },
        }
    }

    /// All backups, most recent first. A missing backup directory is empty.
    pub fn list_backups(&self) -> Result<Vec<BackupRecord>> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&self.backup_dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable backup entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(BACKUP_EXTENSION) {
                continue;
            }
            let metadata = entry
                .metadata()
                .map_err(|err| GencliError::io(entry.path().display().to_string(), err.into()))?;

            let directory = entry
                .path()
                .parent()
                .and_then(|parent| parent.strip_prefix(&self.backup_dir).ok())
                .map(|dir| dir.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();

            let record = match parse_backup_name(&name) {
                Some(parsed) => BackupRecord {
                    name,
                    path: entry.path().to_path_buf(),
                    size: metadata.len(),
                    created: parsed.created,
                    original_file: parsed.original_file,
                    directory,
                    sequence: parsed.sequence,
                    pre_restore: parsed.pre_restore,
                },
                None => BackupRecord {
                    original_file: name.trim_end_matches(BACKUP_EXTENSION).to_string(),
                    name,
                    path: entry.path().to_path_buf(),
                    size: metadata.len(),
                    created: metadata
                        .modified()
                        .map(DateTime::<Utc>::from)
                        .unwrap_or_else(|_| Utc::now()),
                    directory,
                    sequence: 0,
                    pre_restore: false,
                },
            };
            records.push(record);
        }

        records.sort_by(|a, b| {
            b.created
                .cmp(&a.created)
                .then_with(|| b.sequence.cmp(&a.sequence))
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(records)
    }

    /// Ranked lookup used by `backup restore <query>`.
    ///
    /// 1. exact backup name or relative backup path
    /// 2. exact original file (relative path or bare file name)
    /// 3. case-insensitive substring of either
    ///
    /// Within tiers 2 and 3 the most recent regular backup wins; a
    /// pre-restore snapshot is picked only when no regular backup matches.
    pub fn find_backup(&self, query: &str) -> Result<BackupMatch> {
        let query = query.trim().trim_start_matches("./");
        if query.is_empty() {
            return Ok(BackupMatch::NotFound);
        }
        let records = self.list_backups()?;

        if let Some(record) = records
            .iter()
            .find(|record| record.name == query || record.relative_name() == query)
        {
            return Ok(BackupMatch::Exact(record.clone()));
        }

        // pre-restore snapshots rank after regular backups so a repeated
        // restore by file name does not undo the previous one
        let mut records = records;
        records.sort_by_key(|record| record.pre_restore);

        let query_path = Path::new(query);
        let by_original: Vec<&BackupRecord> = records
            .iter()
            .filter(|record| {
                record.original_relative_path() == query_path || record.original_file == query
            })
            .collect();
        if let Some(first) = by_original.first() {
            let distinct = by_original
                .iter()
                .map(|record| record.original_relative_path())
                .collect::<std::collections::HashSet<_>>()
                .len();
            return Ok(if distinct == 1 {
                BackupMatch::Exact((*first).clone())
            } else {
                BackupMatch::Partial {
                    record: (*first).clone(),
                    candidates: by_original.len(),
                }
            });
        }

        let needle = query.to_lowercase();
        let loose: Vec<&BackupRecord> = records
            .iter()
            .filter(|record| {
                record.relative_name().to_lowercase().contains(&needle)
                    || record
                        .original_relative_path()
                        .to_string_lossy()
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect();
        Ok(match loose.first() {
            Some(first) => BackupMatch::Partial {
                record: (*first).clone(),
                candidates: loose.len(),
            },
            None => BackupMatch::NotFound,
        })
    }

    /// Copy a backup back over its original.
    ///
    /// `target` defaults to the backup's mirrored path with the timestamp
    /// suffix removed. An existing target is itself backed up first; if that
    /// fails nothing is overwritten. Returns `Ok(false)` when `backup` does not
    /// exist.
    pub fn restore_from_backup(&self, backup: impl AsRef<Path>, target: Option<&Path>) -> Result<bool> {
        let backup = validate_and_normalize_path(backup.as_ref(), &self.workspace)?;
        if !backup.is_file() {
            debug!(backup = %backup.display(), "restore requested for missing backup");
            return Ok(false);
        }

        let target = match target {
            Some(target) => validate_and_normalize_path(target, &self.workspace)?,
            None => self.restore_target(&backup)?,
        };

        let content =
            fs::read(&backup).map_err(|err| GencliError::io(backup.display().to_string(), err))?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| GencliError::io(parent.display().to_string(), err))?;
        }

        if target.is_file() {
            let current = fs::read(&target)
                .map_err(|err| GencliError::io(target.display().to_string(), err))?;
            let stamp = format!("{PRE_RESTORE_PREFIX}{}", backup_timestamp(Utc::now()));
            let saved = self.write_backup(&target, &current, &stamp)?;
            debug!(snapshot = %saved.display(), "saved pre-restore snapshot");
        }

        fs::write(&target, &content)
            .map_err(|err| GencliError::write(target.display().to_string(), err))?;
        info!(backup = %backup.display(), target = %target.display(), "restored backup");
        Ok(true)
    }

    /// Delete backups selected by `policy` and prune emptied directories.
    pub fn cleanup_backups(&self, policy: CleanupPolicy) -> Result<usize> {
        if !self.backup_dir.is_dir() {
            return Ok(0);
        }

        let doomed: Vec<PathBuf> = match policy {
            CleanupPolicy::All => WalkDir::new(&self.backup_dir)
                .follow_links(false)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| !entry.file_type().is_dir())
                .map(|entry| entry.into_path())
                .collect(),
            CleanupPolicy::KeepLatest(keep) => {
                let mut seen: HashMap<PathBuf, usize> = HashMap::new();
                self.list_backups()?
                    .into_iter()
                    .filter(|record| {
                        let count = seen.entry(record.original_relative_path()).or_insert(0);
                        *count += 1;
                        *count > keep
                    })
                    .map(|record| record.path)
                    .collect()
            }
            CleanupPolicy::OlderThan(age) => {
                let cutoff = Utc::now() - age;
                self.list_backups()?
                    .into_iter()
                    .filter(|record| record.created < cutoff)
                    .map(|record| record.path)
                    .collect()
            }
        };

        let mut deleted = 0;
        for path in doomed {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!(backup = %path.display(), "deleted backup");
                    deleted += 1;
                }
                Err(err) => warn!(backup = %path.display(), error = %err, "could not delete backup"),
            }
        }
        self.prune_empty_directories();
        Ok(deleted)
    }

    fn write_backup(&self, original: &Path, content: &[u8], stamp: &str) -> Result<PathBuf> {
        let original = validate_and_normalize_path(original, &self.workspace)?;
        let relative = original
            .strip_prefix(&self.workspace)
            .map_err(|_| GencliError::PathTraversal(original.display().to_string()))?;
        let Some(file_name) = relative.file_name().map(|name| name.to_string_lossy().into_owned())
        else {
            return Err(GencliError::InvalidPath);
        };

        let target_dir = match relative.parent() {
            Some(parent) => self.backup_dir.join(parent),
            None => self.backup_dir.clone(),
        };
        fs::create_dir_all(&target_dir)
            .map_err(|err| GencliError::io(target_dir.display().to_string(), err))?;

        for sequence in 0..MAX_NAME_ATTEMPTS {
            let name = if sequence == 0 {
                format!("{file_name}.{stamp}{BACKUP_EXTENSION}")
            } else {
                format!("{file_name}.{stamp}-{sequence}{BACKUP_EXTENSION}")
            };
            let path = target_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content)
                        .map_err(|err| GencliError::write(path.display().to_string(), err))?;
                    debug!(original = %original.display(), backup = %path.display(), "created backup");
                    return Ok(path);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(GencliError::io(path.display().to_string(), err)),
            }
        }

        Err(GencliError::io(
            target_dir.display().to_string(),
            io::Error::new(io::ErrorKind::AlreadyExists, "no free backup name"),
        ))
    }

    /// Workspace path a backup restores to when no explicit target is given.
    pub fn restore_target(&self, backup: &Path) -> Result<PathBuf> {
        let relative = backup.strip_prefix(&self.backup_dir).map_err(|_| {
            GencliError::BackupNotFound(format!(
                "{} is not inside {}",
                backup.display(),
                self.backup_dir.display()
            ))
        })?;
        let name = relative
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(GencliError::InvalidPath)?;
        let original = match parse_backup_name(&name) {
            Some(parsed) => parsed.original_file,
            None => name.trim_end_matches(BACKUP_EXTENSION).to_string(),
        };
        let target = match relative.parent() {
            Some(parent) => self.workspace.join(parent).join(original),
            None => self.workspace.join(original),
        };
        validate_and_normalize_path(target, &self.workspace)
    }

    fn prune_empty_directories(&self) {
        for entry in WalkDir::new(&self.backup_dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
        {
            // remove_dir only succeeds on empty directories
            if fs::remove_dir(entry.path()).is_ok() {
                debug!(dir = %entry.path().display(), "pruned empty backup directory");
            }
        }
    }
}

/// `2024-01-15T10:30:45.123Z` becomes `2024-01-15T10-30-45-123Z`.
pub fn backup_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

fn parse_backup_name(name: &str) -> Option<ParsedName> {
    let stem = name.strip_suffix(BACKUP_EXTENSION)?;
    let (original_file, stamp) = stem.rsplit_once('.')?;
    if original_file.is_empty() {
        return None;
    }

    let (pre_restore, stamp) = match stamp.strip_prefix(PRE_RESTORE_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, stamp),
    };
    let (timestamp, rest) = stamp.split_once('Z')?;
    let sequence = match rest {
        "" => 0,
        rest => rest.strip_prefix('-')?.parse().ok()?,
    };

    let (date, time) = timestamp.split_once('T')?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let mut parts = time.split('-').map(|part| part.parse::<u32>().ok());
    let (hour, minute, second, milli) = (
        parts.next()??,
        parts.next()??,
        parts.next()??,
        parts.next()??,
    );
    if parts.next().is_some() {
        return None;
    }
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli)?;

    Some(ParsedName {
        original_file: original_file.to_string(),
        created: Utc.from_utc_datetime(&date.and_time(time)),
        sequence,
        pre_restore,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, BackupManager) {
        let dir = TempDir::new().expect("tempdir");
        let manager = BackupManager::new(dir.path());
        (dir, manager)
    }

    fn write_named_backup(manager: &BackupManager, relative: &str) -> PathBuf {
        let path = manager.backup_dir().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, relative).expect("write");
        path
    }

    #[test]
    fn timestamp_replaces_colons_and_dots() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).single().expect("date")
            + Duration::milliseconds(123);
        assert_eq!(backup_timestamp(at), "2024-01-15T10-30-45-123Z");
    }

    #[test]
    fn parses_plain_sequenced_and_pre_restore_names() {
        let plain = parse_backup_name("app.test.js.2024-01-15T10-30-45-123Z.backup").expect("plain");
        assert_eq!(plain.original_file, "app.test.js");
        assert_eq!(plain.sequence, 0);
        assert!(!plain.pre_restore);

        let sequenced = parse_backup_name("app.js.2024-01-15T10-30-45-123Z-2.backup").expect("seq");
        assert_eq!(sequenced.sequence, 2);
        assert_eq!(sequenced.created, plain.created);

        let pre = parse_backup_name("app.js.pre-restore-2024-01-15T10-30-45-123Z.backup")
            .expect("pre-restore");
        assert!(pre.pre_restore);
        assert_eq!(pre.original_file, "app.js");

        assert!(parse_backup_name("notes.backup").is_none());
        assert!(parse_backup_name("app.js.yesterday.backup").is_none());
    }

    #[test]
    fn backups_taken_in_the_same_millisecond_never_collide() {
        let (dir, manager) = workspace();
        let file = dir.path().join("app.js");
        fs::write(&file, "v1").expect("write");

        let stamp = "2024-01-15T10-30-45-123Z";
        let first = manager.write_backup(&file, b"one", stamp).expect("first");
        let second = manager.write_backup(&file, b"two", stamp).expect("second");
        let third = manager.write_backup(&file, b"three", stamp).expect("third");

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("123Z-1.backup"));
        assert!(third.to_string_lossy().ends_with("123Z-2.backup"));
        assert_eq!(fs::read_to_string(first).expect("read"), "one");
        assert_eq!(manager.list_backups().expect("list").len(), 3);
    }

    #[test]
    fn backup_mirrors_directories_and_rejects_outside_files() {
        let (dir, manager) = workspace();
        let nested = dir.path().join("src/lib/util.js");
        fs::create_dir_all(nested.parent().expect("parent")).expect("mkdir");
        fs::write(&nested, "x").expect("write");

        let backup = manager.create_backup(&nested, "x").expect("backup");
        assert!(backup.starts_with(manager.backup_dir().join("src/lib")));

        let records = manager.list_backups().expect("list");
        assert_eq!(records[0].directory, "src/lib");
        assert_eq!(records[0].original_file, "util.js");
        assert_eq!(records[0].size, 1);

        let outside = manager.create_backup("../elsewhere.js", "x");
        assert!(matches!(outside, Err(GencliError::PathTraversal(_))));
    }

    #[test]
    fn listing_is_most_recent_first_and_missing_dir_is_empty() {
        let (_dir, manager) = workspace();
        assert!(manager.list_backups().expect("list").is_empty());

        write_named_backup(&manager, "a.js.2024-01-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "b.js.2024-03-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "c.js.2024-02-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "ignored.txt");

        let names: Vec<String> = manager
            .list_backups()
            .expect("list")
            .into_iter()
            .map(|record| record.original_file)
            .collect();
        assert_eq!(names, vec!["b.js", "c.js", "a.js"]);
    }

    #[test]
    fn restore_round_trip_snapshots_current_content() {
        let (dir, manager) = workspace();
        let file = dir.path().join("src/app.js");
        fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
        fs::write(&file, "original").expect("write");

        let backup = manager.create_backup(&file, "original").expect("backup");
        fs::write(&file, "edited").expect("edit");

        assert!(manager.restore_from_backup(&backup, None).expect("restore"));
        assert_eq!(fs::read_to_string(&file).expect("read"), "original");

        let records = manager.list_backups().expect("list");
        let snapshot = records
            .iter()
            .find(|record| record.pre_restore)
            .expect("pre-restore snapshot");
        assert_eq!(snapshot.original_file, "app.js");
        assert_eq!(fs::read_to_string(&snapshot.path).expect("read"), "edited");
    }

    #[test]
    fn restore_recreates_missing_target_and_reports_missing_backup() {
        let (dir, manager) = workspace();
        let backup = write_named_backup(&manager, "deep/dir/x.md.2024-01-01T00-00-00-000Z.backup");

        assert!(manager.restore_from_backup(&backup, None).expect("restore"));
        assert!(dir.path().join("deep/dir/x.md").is_file());

        let missing = manager.backup_dir().join("nope.js.2024-01-01T00-00-00-000Z.backup");
        assert!(!manager.restore_from_backup(missing, None).expect("missing"));
    }

    #[test]
    fn find_backup_ranks_exact_before_substring() {
        let (_dir, manager) = workspace();
        write_named_backup(&manager, "app.js.2024-01-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "app.js.2024-02-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "myapp.js.2024-03-01T00-00-00-000Z.backup");

        match manager.find_backup("app.js").expect("find") {
            BackupMatch::Exact(record) => {
                assert_eq!(record.name, "app.js.2024-02-01T00-00-00-000Z.backup")
            }
            other => panic!("expected exact match, got {other:?}"),
        }

        match manager
            .find_backup("app.js.2024-01-01T00-00-00-000Z.backup")
            .expect("find")
        {
            BackupMatch::Exact(record) => assert!(record.name.contains("2024-01-01")),
            other => panic!("expected exact match, got {other:?}"),
        }

        match manager.find_backup("APP").expect("find") {
            BackupMatch::Partial { record, candidates } => {
                assert_eq!(record.original_file, "myapp.js");
                assert_eq!(candidates, 3);
            }
            other => panic!("expected partial match, got {other:?}"),
        }

        assert_eq!(manager.find_backup("zzz").expect("find"), BackupMatch::NotFound);
        assert_eq!(manager.find_backup("  ").expect("find"), BackupMatch::NotFound);
    }

    #[test]
    fn keep_latest_retains_newest_per_original() {
        let (_dir, manager) = workspace();
        write_named_backup(&manager, "a.js.2024-01-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "a.js.2024-01-02T00-00-00-000Z.backup");
        write_named_backup(&manager, "a.js.2024-01-03T00-00-00-000Z.backup");
        write_named_backup(&manager, "b.js.2024-01-01T00-00-00-000Z.backup");

        let deleted = manager.cleanup_backups(CleanupPolicy::KeepLatest(1)).expect("cleanup");
        assert_eq!(deleted, 2);
        let left: Vec<String> = manager
            .list_backups()
            .expect("list")
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(
            left,
            vec![
                "a.js.2024-01-03T00-00-00-000Z.backup".to_string(),
                "b.js.2024-01-01T00-00-00-000Z.backup".to_string(),
            ]
        );
    }

    #[test]
    fn older_than_only_removes_stale_backups() {
        let (dir, manager) = workspace();
        write_named_backup(&manager, "old.js.2020-01-01T00-00-00-000Z.backup");
        let fresh = dir.path().join("fresh.js");
        fs::write(&fresh, "x").expect("write");
        manager.create_backup(&fresh, "x").expect("backup");

        let deleted = manager
            .cleanup_backups(CleanupPolicy::OlderThan(Duration::days(30)))
            .expect("cleanup");
        assert_eq!(deleted, 1);
        assert_eq!(manager.list_backups().expect("list")[0].original_file, "fresh.js");
    }

    #[test]
    fn cleanup_all_empties_listing_and_prunes_directories() {
        let (_dir, manager) = workspace();
        write_named_backup(&manager, "src/a.js.2024-01-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "src/deep/b.js.2024-01-01T00-00-00-000Z.backup");
        write_named_backup(&manager, "stray.txt");

        assert_eq!(manager.cleanup_backups(CleanupPolicy::All).expect("cleanup"), 3);
        assert!(manager.list_backups().expect("list").is_empty());
        assert!(!manager.backup_dir().join("src").exists());
    }

    #[test]
    fn failure_policy_controls_backup_errors() {
        let dir = TempDir::new().expect("tempdir");
        // a regular file where the backup directory should be
        fs::write(dir.path().join(DEFAULT_BACKUP_DIR), "blocker").expect("write");
        let file = dir.path().join("app.js");
        fs::write(&file, "x").expect("write");

        let open = BackupManager::new(dir.path());
        assert_eq!(open.backup_before_write(&file, "x").expect("fail open"), None);

        let closed = BackupManager::new(dir.path()).with_failure_policy(BackupFailurePolicy::FailClosed);
        assert!(matches!(
            closed.backup_before_write(&file, "x"),
            Err(GencliError::BackupFailed { .. })
        ));
    }
}
