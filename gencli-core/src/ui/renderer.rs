use super::spinner::Spinner;
use anyhow::Result;
use console::{Style, Term};
use std::io::Write;

/// Styles available for rendering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Warning,
    Error,
    /// Tool-like output such as listings and trees
    Output,
    /// Model answers
    Response,
    /// Remediation hints under errors
    Hint,
}

impl MessageStyle {
    fn style(self) -> Style {
        match self {
            Self::Info => Style::new().cyan(),
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red().bold(),
            Self::Output => Style::new(),
            Self::Response => Style::new(),
            Self::Hint => Style::new().dim(),
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Error => "✖ ",
            Self::Warning => "! ",
            Self::Success => "✔ ",
            Self::Hint => "  ↳ ",
            _ => "",
        }
    }
}

/// Where user-facing output goes. Workflows only ever write through this.
pub trait Renderer {
    fn line(&mut self, style: MessageStyle, text: &str) -> Result<()>;

    /// Multi-line text, one `line` per input line.
    fn block(&mut self, style: MessageStyle, text: &str) -> Result<()> {
        for line in text.lines() {
            self.line(style, line)?;
        }
        Ok(())
    }

    /// Progress indicator shown while awaiting the model. Dropped to clear.
    fn progress(&self, _message: &str) -> Option<Spinner> {
        None
    }
}

/// Colored output on stdout.
pub struct TerminalRenderer {
    term: Term,
    spinners: bool,
}

impl TerminalRenderer {
    pub fn stdout() -> Self {
        let term = Term::stdout();
        let spinners = term.is_term();
        Self { term, spinners }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Renderer for TerminalRenderer {
    fn line(&mut self, style: MessageStyle, text: &str) -> Result<()> {
        let rendered = style.style().apply_to(format!("{}{}", style.prefix(), text));
        writeln!(self.term, "{rendered}")?;
        self.term.flush()?;
        Ok(())
    }

    fn progress(&self, message: &str) -> Option<Spinner> {
        self.spinners.then(|| Spinner::new(message))
    }
}

/// Records every line; used by tests and by callers that post-process output.
#[derive(Debug, Default)]
pub struct CaptureRenderer {
    pub lines: Vec<(MessageStyle, String)>,
}

impl CaptureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured text joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_style(&self, style: MessageStyle) -> bool {
        self.lines.iter().any(|(s, _)| *s == style)
    }
}

impl Renderer for CaptureRenderer {
    fn line(&mut self, style: MessageStyle, text: &str) -> Result<()> {
        self.lines.push((style, text.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_splits_lines() {
        let mut renderer = CaptureRenderer::new();
        renderer.block(MessageStyle::Response, "one\ntwo\n").expect("block");
        assert_eq!(renderer.lines.len(), 2);
        assert_eq!(renderer.text(), "one\ntwo");
        assert!(renderer.has_style(MessageStyle::Response));
        assert!(renderer.progress("thinking").is_none());
    }
}
