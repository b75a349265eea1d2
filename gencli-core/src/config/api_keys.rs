//! API key lookup from the environment and `.env` files.

use super::constants::env_vars;
use anyhow::{Result, anyhow};
use std::env;
use std::path::Path;
use tracing::{debug, warn};

/// Load `.env` from the workspace, then from the current directory.
///
/// Variables already set in the process environment are never overridden.
/// A missing file is not an error.
pub fn load_dotenv(workspace: &Path) {
    let candidates = [workspace.join(".env"), Path::new(".env").to_path_buf()];
    for path in candidates.iter().filter(|path| path.is_file()) {
        match dotenvy::from_path(path) {
            Ok(()) => debug!(path = %path.display(), "loaded environment file"),
            Err(err) => warn!(path = %path.display(), error = %err, "failed to load environment file"),
        }
    }
}

/// Gemini API key from `primary_env`, falling back to `GOOGLE_API_KEY`.
pub fn get_gemini_api_key(primary_env: &str) -> Result<String> {
    let mut names = vec![primary_env];
    if primary_env != env_vars::GOOGLE_API_KEY {
        names.push(env_vars::GOOGLE_API_KEY);
    }

    for name in &names {
        if let Ok(key) = env::var(name) {
            let key = key.trim();
            if !key.is_empty() {
                debug!(source = name, "using API key from environment");
                return Ok(key.to_string());
            }
        }
    }

    Err(anyhow!(
        "No API key found. Set {} (or add it to a .env file in the workspace)",
        primary_env
    ))
}
