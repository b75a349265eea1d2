//! gencli - Gemini-powered terminal assistant
//!
//! Bootstraps logging, configuration and the API key, then runs either the
//! interactive session or a single request.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use console::style;
use gencli_core::config::api_keys::{get_gemini_api_key, load_dotenv};
use gencli_core::config::constants::{env_vars, urls};
use gencli_core::config::{ConfigManager, SettingsStore};
use gencli_core::llm::error_display::format_llm_error;
use gencli_core::llm::{GeminiProvider, LanguageModel};
use gencli_core::safety::is_directory_accessible;
use gencli_core::AppContext;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let workspace = match args.workspace.clone() {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    if !is_directory_accessible(&workspace) {
        anyhow::bail!("Workspace is not a directory: {}", workspace.display());
    }
    load_dotenv(&workspace);

    let manager = match &args.config {
        Some(path) => ConfigManager::load_from_file(path)?,
        None => ConfigManager::load_from_workspace(&workspace)?,
    };
    match manager.config_path() {
        Some(path) => info!(config = %path.display(), "loaded configuration"),
        None => debug!("no gencli.toml found, using defaults"),
    }
    let config = manager.into_config();

    let api_key = match get_gemini_api_key(&args.api_key_env) {
        Ok(key) => key,
        Err(err) => {
            print_api_key_help(&args.api_key_env, &workspace, &err);
            std::process::exit(1);
        }
    };

    let provider = match GeminiProvider::new(api_key, config.client_config()) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("{}", format_llm_error("Gemini", &err));
            std::process::exit(1);
        }
    };
    let model: Arc<dyn LanguageModel> = Arc::new(provider);
    let settings = SettingsStore::new(
        config
            .settings_path
            .clone()
            .unwrap_or_else(SettingsStore::default_path),
    );
    debug!(settings = %settings.path().display(), provider = model.name(), "starting session");

    let mut ctx = AppContext::new(&workspace, config, settings, model);
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => cli::handle_chat_command(&mut ctx).await,
        Commands::Ask { prompt } => cli::handle_ask_command(&mut ctx, &prompt.join(" ")).await,
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_api_key_help(primary_env: &str, workspace: &Path, err: &anyhow::Error) {
    eprintln!("{} {err}", style("Error:").red().bold());
    eprintln!();
    eprintln!("Set your Gemini API key in one of these ways:");
    eprintln!("  export {primary_env}=your_api_key");
    if primary_env != env_vars::GOOGLE_API_KEY {
        eprintln!("  export {}=your_api_key", env_vars::GOOGLE_API_KEY);
    }
    eprintln!(
        "  or add {primary_env}=your_api_key to {}",
        workspace.join(".env").display()
    );
    eprintln!();
    eprintln!("Get a key at {}", style(urls::API_KEY_HELP).cyan().underlined());
}
