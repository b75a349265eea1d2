//! Path and input validation for workspace file operations
//!
//! Resolution here is lexical: paths are joined and normalized without
//! touching the filesystem, so a path that does not exist yet is validated the
//! same way as one that does. Symbolic links are not resolved.

use crate::error::{GencliError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Extensions the modification workflow may rewrite.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "js", "ts", "jsx", "tsx", "json", "md", "txt", "py", "java", "c", "cpp", "h", "css", "html",
    "xml", "yaml", "yml", "rs", "toml",
];

pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// Resolve `input` against `root` and reject anything that escapes `root`.
///
/// The returned path is either `root` itself or strictly below it.
pub fn validate_and_normalize_path(input: impl AsRef<Path>, root: impl AsRef<Path>) -> Result<PathBuf> {
    let input = input.as_ref();
    let raw = input.to_string_lossy();
    if raw.trim().is_empty() {
        return Err(GencliError::InvalidPath);
    }

    let root = normalize_root(root.as_ref());
    let joined = if input.is_absolute() {
        input.to_path_buf()
    } else {
        root.join(input)
    };
    let normalized = normalize_lexically(&joined);

    if normalized == root || normalized.starts_with(&root) {
        Ok(normalized)
    } else {
        Err(GencliError::PathTraversal(raw.into_owned()))
    }
}

/// Absolute, lexically normalized form of a workspace root.
pub fn normalize_root(root: &Path) -> PathBuf {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
    };
    normalize_lexically(&absolute)
}

/// Collapse `.` and `..` segments. `..` never climbs above the filesystem root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}

/// Case-insensitive extension check. Entries may be written with or without
/// the leading dot.
pub fn is_allowed_file_extension<S: AsRef<str>>(path: impl AsRef<Path>, allowed: &[S]) -> bool {
    let Some(extension) = path.as_ref().extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    allowed
        .iter()
        .any(|entry| entry.as_ref().trim_start_matches('.').eq_ignore_ascii_case(&extension))
}

/// Size gate used before reading a file into a prompt. Fails closed when the
/// file cannot be stat'ed.
pub fn is_file_size_allowed(path: impl AsRef<Path>, max_size_mb: u64) -> bool {
    match fs::metadata(path.as_ref()) {
        Ok(metadata) => metadata.len() <= max_size_mb.saturating_mul(1024 * 1024),
        Err(_) => false,
    }
}

pub fn is_directory_accessible(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref())
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

/// Narrow text filter for input forwarded to the model and the command parser.
///
/// Strips `<` and `>`, escapes `&`, drops ASCII control characters and trims.
/// This is not an HTML sanitizer and is not meant for rendering contexts.
pub fn sanitize_input(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' | '>' => {}
            '&' => sanitized.push_str("&amp;"),
            c if c.is_ascii_control() => {}
            c => sanitized.push(c),
        }
    }
    sanitized.trim().to_string()
}

/// Files in the same directory whose names contain the stem of `path`.
pub fn suggest_similar_files(path: &Path, limit: usize) -> Vec<String> {
    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return Vec::new();
    };
    let stem = stem.to_lowercase();
    let Some(dir) = path.parent() else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut matches: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.to_lowercase().contains(&stem))
        .collect();
    matches.sort();
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_parent_traversal() {
        let result = validate_and_normalize_path("../../etc/passwd", "/home/user/project");
        assert!(matches!(result, Err(GencliError::PathTraversal(_))));
    }

    #[test]
    fn rejects_sibling_with_shared_prefix() {
        let result = validate_and_normalize_path("/home/user/project2/a.js", "/home/user/project");
        assert!(matches!(result, Err(GencliError::PathTraversal(_))));
    }

    #[test]
    fn accepts_root_and_nested_paths() {
        let root = Path::new("/home/user/project");
        assert_eq!(validate_and_normalize_path(".", root).unwrap(), root);
        assert_eq!(
            validate_and_normalize_path("src/../lib/./a.js", root).unwrap(),
            root.join("lib/a.js")
        );
        assert_eq!(
            validate_and_normalize_path("/home/user/project/src/a.js", root).unwrap(),
            root.join("src/a.js")
        );
    }

    #[test]
    fn empty_path_is_invalid() {
        assert!(matches!(
            validate_and_normalize_path("  ", "/tmp"),
            Err(GencliError::InvalidPath)
        ));
    }

    #[test]
    fn normalized_results_never_escape_root() {
        let root = Path::new("/srv/ws");
        let inputs = [
            "a/../../b",
            "./././x",
            "a/b/c/../../../..",
            "/srv/ws/../ws/ok.txt",
            "/etc",
            "..",
            "a/../b/../c.js",
        ];
        for input in inputs {
            if let Ok(path) = validate_and_normalize_path(input, root) {
                assert!(path == root || path.starts_with(root), "{input} -> {path:?}");
            }
        }
    }

    #[test]
    fn extension_allow_list_is_case_insensitive() {
        assert!(is_allowed_file_extension("a.js", DEFAULT_ALLOWED_EXTENSIONS));
        assert!(is_allowed_file_extension("a.JS", DEFAULT_ALLOWED_EXTENSIONS));
        assert!(!is_allowed_file_extension("a.exe", DEFAULT_ALLOWED_EXTENSIONS));
        assert!(!is_allowed_file_extension("Makefile", DEFAULT_ALLOWED_EXTENSIONS));
        assert!(is_allowed_file_extension("notes.txt", &[".txt"]));
    }

    #[test]
    fn size_check_fails_closed() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("small.txt");
        fs::write(&file, "hello").unwrap();
        assert!(is_file_size_allowed(&file, 10));
        assert!(!is_file_size_allowed(dir.path().join("missing.txt"), 10));
    }

    #[test]
    fn sanitize_strips_markup_and_controls() {
        assert_eq!(sanitize_input("  <b>fix</b> a & b\u{0007}\n"), "bfix/b a &amp; b");
        assert_eq!(sanitize_input("\u{7f}app.js 분석해줘\t"), "app.js 분석해줘");
    }

    #[test]
    fn suggests_files_containing_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.ts"), "").unwrap();
        fs::write(dir.path().join("my_app.js"), "").unwrap();
        fs::write(dir.path().join("other.js"), "").unwrap();
        let suggestions = suggest_similar_files(&dir.path().join("app.js"), 5);
        assert_eq!(suggestions, vec!["app.ts".to_string(), "my_app.js".to_string()]);
    }
}
