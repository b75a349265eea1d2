//! CLI argument parsing

use clap::{Parser, Subcommand};
use gencli_core::config::constants::env_vars;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gencli",
    version,
    about = "Gemini-powered terminal assistant: analyze projects, modify files with backups, search the web"
)]
pub struct Cli {
    /// Workspace root directory; defaults to current directory
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configuration file path; defaults to gencli.toml lookup from the workspace
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API key environment variable to read (falls back to GOOGLE_API_KEY)
    #[arg(long, global = true, default_value = env_vars::GEMINI_API_KEY)]
    pub api_key_env: String,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive session (default)
    Chat,

    /// Handle a single request and exit
    Ask {
        /// The request, in natural language or as a direct command
        #[arg(required = true)]
        prompt: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_session() {
        let cli = Cli::try_parse_from(["gencli"]).expect("parse");
        assert_eq!(cli.command, None);
        assert_eq!(cli.api_key_env, "GEMINI_API_KEY");
        assert!(!cli.verbose);
    }

    #[test]
    fn ask_collects_words() {
        let cli = Cli::try_parse_from(["gencli", "ask", "app.js", "분석해줘", "--verbose"]).expect("parse");
        assert_eq!(
            cli.command,
            Some(Commands::Ask {
                prompt: vec!["app.js".into(), "분석해줘".into()]
            })
        );
        assert!(cli.verbose);
    }

    #[test]
    fn ask_requires_a_prompt() {
        assert!(Cli::try_parse_from(["gencli", "ask"]).is_err());
    }

    #[test]
    fn global_options_parse() {
        let cli = Cli::try_parse_from([
            "gencli",
            "--workspace",
            "/tmp/project",
            "--api-key-env",
            "MY_KEY",
            "chat",
        ])
        .expect("parse");
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.api_key_env, "MY_KEY");
        assert_eq!(cli.command, Some(Commands::Chat));
    }
}
