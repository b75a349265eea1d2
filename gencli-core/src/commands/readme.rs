//! README generation from a project scan.

use crate::context::AppContext;
use crate::error::{GencliError, Result};
use crate::llm::ModelRequest;
use crate::prompts::{PromptKind, get_prompt};
use crate::scanner;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeResult {
    /// Path of the written file, relative to the workspace
    pub file: PathBuf,
    pub file_count: usize,
}

/// Generate a README and write it next to any existing one as
/// `README_<YYYYMMDD_HHMMSS>.md`. An existing file is never overwritten.
pub async fn generate_readme(ctx: &mut AppContext) -> Result<ReadmeResult> {
    let entries = scanner::scan(ctx.workspace(), &ctx.scan_options());
    if entries.is_empty() {
        return Err(GencliError::EmptyProject(ctx.workspace().display().to_string()));
    }

    let listing = serde_json::to_string_pretty(&entries)
        .map_err(|err| GencliError::ResponseParse(err.to_string()))?;
    let settings = ctx.current_settings();
    let request = ModelRequest::new(
        &settings.model,
        get_prompt(PromptKind::ReadmeWriter, settings.language),
        format!("Write a README for this project:\n\n{listing}"),
    )
    .with_temperature(settings.temperature);
    let response = ctx.model.generate(request).await?;

    let path = write_unique(ctx.workspace(), Local::now(), response.text.trim())?;
    let file = path
        .strip_prefix(ctx.workspace())
        .unwrap_or(&path)
        .to_path_buf();
    info!(file = %file.display(), "wrote README");
    Ok(ReadmeResult {
        file,
        file_count: entries.len(),
    })
}

fn write_unique(dir: &Path, now: DateTime<Local>, content: &str) -> Result<PathBuf> {
    let stamp = now.format("%Y%m%d_%H%M%S");
    for attempt in 0..100u32 {
        let name = if attempt == 0 {
            format!("README_{stamp}.md")
        } else {
            format!("README_{stamp}_{attempt}.md")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                writeln!(file, "{content}")
                    .map_err(|err| GencliError::write(path.display().to_string(), err))?;
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(GencliError::write(path.display().to_string(), err)),
        }
    }
    Err(GencliError::write(
        dir.display().to_string(),
        io::Error::new(io::ErrorKind::AlreadyExists, "no free README name"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn never_overwrites_existing_readmes() {
        let dir = TempDir::new().expect("tempdir");
        let now = Local
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .single()
            .expect("unambiguous time");
        fs::write(dir.path().join("README.md"), "keep me").expect("write");

        let first = write_unique(dir.path(), now, "# One").expect("first");
        let second = write_unique(dir.path(), now, "# Two").expect("second");

        assert_eq!(first.file_name().and_then(|n| n.to_str()), Some("README_20240501_123000.md"));
        assert_eq!(second.file_name().and_then(|n| n.to_str()), Some("README_20240501_123000_1.md"));
        assert_eq!(fs::read_to_string(dir.path().join("README.md")).expect("read"), "keep me");
        assert_eq!(fs::read_to_string(first).expect("read"), "# One\n");
    }
}
