//! Backup-safe file modification.
//!
//! The target file is only written after the model's reply has been parsed
//! and validated; every earlier failure leaves it byte-identical.

use super::{ensure_file_exists, ensure_size_allowed, read_text_file};
use crate::context::AppContext;
use crate::error::{GencliError, Result};
use crate::llm::ModelRequest;
use crate::prompts::{PromptKind, get_prompt};
use crate::safety::{is_allowed_file_extension, validate_and_normalize_path};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?P<lang>[A-Za-z0-9_+.-]*)[^\n]*\n(?P<body>.*?)\n?```")
        .expect("fenced code pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationResult {
    /// Path relative to the workspace
    pub file: PathBuf,
    /// `None` when the backup failed under the fail-open policy
    pub backup: Option<PathBuf>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationOutcome {
    Modified(ModificationResult),
    /// The file is empty or whitespace only; nothing was sent or written.
    Empty { file: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationReply {
    pub code: String,
    pub explanation: String,
}

pub fn modification_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "code": {"type": "STRING"},
            "explanation": {"type": "STRING"}
        },
        "required": ["code", "explanation"]
    })
}

pub async fn modify_file(
    ctx: &mut AppContext,
    file_path: &str,
    request: &str,
) -> Result<ModificationOutcome> {
    let request = request.trim();
    if request.is_empty() {
        return Err(GencliError::MissingParameter("request"));
    }

    let path = validate_and_normalize_path(file_path, ctx.workspace())?;
    if !is_allowed_file_extension(&path, &ctx.config.security.allowed_extensions) {
        let shown = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| file_path.to_string());
        return Err(GencliError::UnsupportedType(shown));
    }
    ensure_file_exists(&path, file_path)?;
    ensure_size_allowed(&path, ctx.config.security.max_file_size_mb)?;

    let relative = path
        .strip_prefix(ctx.workspace())
        .unwrap_or(&path)
        .to_path_buf();
    let content = read_text_file(&path)?;
    if content.trim().is_empty() {
        return Ok(ModificationOutcome::Empty { file: relative });
    }

    let backup = ctx.backups.backup_before_write(&path, &content)?;

    let settings = ctx.current_settings();
    let message = format!(
        "Modify the following code from `{}`.\n\n{content}\n\nRequested change: {request}",
        relative.display()
    );
    let model_request = ModelRequest::new(
        &settings.model,
        get_prompt(PromptKind::CodeModification, settings.language),
        message,
    )
    .with_temperature(settings.temperature)
    .with_schema(modification_schema());
    let response = ctx.model.generate(model_request).await?;

    let reply = parse_modification_response(&response.text)?;
    fs::write(&path, &reply.code)
        .map_err(|err| GencliError::write(path.display().to_string(), err))?;
    info!(file = %relative.display(), backup = ?backup, "modified file");

    Ok(ModificationOutcome::Modified(ModificationResult {
        file: relative,
        backup,
        explanation: reply.explanation,
    }))
}

/// Strict JSON first, then the first fenced code block with the surrounding
/// prose as the explanation.
pub fn parse_modification_response(raw: &str) -> Result<ModificationReply> {
    let trimmed = raw.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(object)) => return reply_from_object(&object),
        Ok(_) => {
            return Err(GencliError::InvalidResponse(
                "expected a JSON object with `code` and `explanation`".to_string(),
            ));
        }
        Err(err) => debug!(error = %err, "modification reply is not strict JSON, trying fenced code"),
    }

    let Some(captures) = FENCED_CODE.captures(trimmed) else {
        return Err(GencliError::ResponseParse(
            "reply is neither JSON nor a fenced code block".to_string(),
        ));
    };
    let lang = captures.name("lang").map(|m| m.as_str()).unwrap_or_default();
    let body = captures.name("body").map(|m| m.as_str()).unwrap_or_default();

    if lang.eq_ignore_ascii_case("json") {
        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) {
            return reply_from_object(&object);
        }
    }

    if body.trim().is_empty() {
        return Err(GencliError::InvalidResponse("code block is empty".to_string()));
    }

    let whole = captures.get(0).map(|m| m.range()).unwrap_or(0..0);
    let explanation = format!("{}\n{}", &trimmed[..whole.start], &trimmed[whole.end..])
        .trim()
        .to_string();

    let mut code = body.to_string();
    if !code.ends_with('\n') {
        code.push('\n');
    }
    Ok(ModificationReply { code, explanation })
}

fn reply_from_object(object: &Map<String, Value>) -> Result<ModificationReply> {
    let code = object
        .get("code")
        .and_then(Value::as_str)
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| GencliError::InvalidResponse("`code` is missing or empty".to_string()))?;
    let explanation = object
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(ModificationReply {
        code: code.to_string(),
        explanation: explanation.trim().to_string(),
    })
}
