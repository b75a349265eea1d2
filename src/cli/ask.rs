use anyhow::{Result, bail};
use gencli_core::commands::dispatcher::render_error;
use gencli_core::commands::{DispatchOutcome, dispatch};
use gencli_core::ui::{MessageStyle, Renderer, TerminalRenderer};
use gencli_core::{AppContext, ChatSession};

/// Handle one request, falling back to plain chat, then exit.
pub async fn handle_ask_command(ctx: &mut AppContext, prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        bail!("No prompt provided. Use: gencli ask \"Your request here\"");
    }

    let mut renderer = TerminalRenderer::stdout();
    if dispatch(ctx, prompt, &mut renderer).await? == DispatchOutcome::Handled {
        return Ok(());
    }

    let settings = ctx.current_settings();
    let mut session = ChatSession::default();
    let reply = {
        let _spinner = renderer.progress("Thinking...");
        session.send(ctx.model.as_ref(), &settings, prompt).await
    };
    match reply {
        Ok(text) => renderer.block(MessageStyle::Response, &text)?,
        Err(err) => render_error(&mut renderer, &err)?,
    }
    Ok(())
}
