use anyhow::{Context, Result};
use console::style;
use gencli_core::commands::dispatcher::render_error;
use gencli_core::commands::{DispatchOutcome, dispatch};
use gencli_core::ui::{MessageStyle, Renderer, TerminalRenderer};
use gencli_core::{AppContext, ChatSession};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::debug;

/// Interactive session. Ctrl-C at the prompt exits; during a turn it
/// abandons that turn and prompts again.
pub async fn handle_chat_command(ctx: &mut AppContext) -> Result<()> {
    let mut renderer = TerminalRenderer::stdout();
    print_banner(ctx, &mut renderer)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = ChatSession::default();

    loop {
        print!("{} ", style("gencli>").cyan().bold());
        io::stdout().flush().ok();

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "clear" => {
                session.clear();
                renderer.line(MessageStyle::Info, "Conversation history cleared.")?;
                continue;
            }
            _ => {}
        }

        let cancelled = {
            let turn = run_turn(ctx, &mut session, input, &mut renderer);
            tokio::select! {
                result = turn => {
                    result?;
                    false
                }
                _ = signal::ctrl_c() => true,
            }
        };
        if cancelled {
            debug!("turn cancelled by user");
            renderer.line(MessageStyle::Warning, "Cancelled.")?;
        }
    }

    renderer.line(MessageStyle::Info, "Goodbye!")?;
    Ok(())
}

async fn run_turn(
    ctx: &mut AppContext,
    session: &mut ChatSession,
    input: &str,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    if dispatch(ctx, input, renderer).await? == DispatchOutcome::Handled {
        return Ok(());
    }

    let settings = ctx.current_settings();
    let reply = {
        let _spinner = renderer.progress("Thinking...");
        session.send(ctx.model.as_ref(), &settings, input).await
    };
    match reply {
        Ok(text) => renderer.block(MessageStyle::Response, &text),
        Err(err) => render_error(renderer, &err),
    }
}

fn print_banner(ctx: &mut AppContext, renderer: &mut dyn Renderer) -> Result<()> {
    let settings = ctx.current_settings();
    renderer.line(MessageStyle::Info, "gencli interactive session")?;
    renderer.line(MessageStyle::Output, &format!("Model: {}", settings.model))?;
    renderer.line(
        MessageStyle::Output,
        &format!("Language: {}", settings.language.display_name()),
    )?;
    renderer.line(
        MessageStyle::Output,
        &format!("Workspace: {}", ctx.workspace().display()),
    )?;
    renderer.line(
        MessageStyle::Hint,
        "Type 'help' for commands, 'clear' to reset the conversation, 'exit' to quit.",
    )?;
    Ok(())
}
