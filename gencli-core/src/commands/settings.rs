//! `settings`, `models` and `set <key> <value>`.

use crate::config::constants::model_info::ModelInfo;
use crate::config::{Settings, SettingsStore};
use crate::context::AppContext;
use crate::error::Result;
use crate::ui::{MessageStyle, Renderer};

pub const SET_USAGE: &str = "Usage: set <model|language|webSearchModel|temperature> <value>";

pub fn render_settings(settings: &Settings, store: &SettingsStore, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
    renderer.line(MessageStyle::Info, &format!("Settings ({})", store.path().display()))?;
    renderer.line(MessageStyle::Output, &format!("  model           {}", settings.model))?;
    renderer.line(
        MessageStyle::Output,
        &format!(
            "  language        {} ({})",
            settings.language,
            settings.language.display_name()
        ),
    )?;
    renderer.line(MessageStyle::Output, &format!("  webSearchModel  {}", settings.web_search_model))?;
    renderer.line(MessageStyle::Output, &format!("  temperature     {}", settings.temperature))?;
    Ok(())
}

pub fn render_models(current: &str, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
    renderer.line(MessageStyle::Info, "Available models:")?;
    for ModelInfo {
        name,
        description,
        capabilities,
    } in SettingsStore::available_models()
    {
        let marker = if *name == current { "*" } else { " " };
        renderer.line(MessageStyle::Output, &format!("{marker} {name}"))?;
        renderer.line(MessageStyle::Output, &format!("    {description}"))?;
        renderer.line(MessageStyle::Hint, &format!("    {}", capabilities.join(", ")))?;
    }
    Ok(())
}

pub fn apply_setting(ctx: &mut AppContext, key: &str, value: &str) -> Result<Settings> {
    ctx.settings.update(key, value)
}
