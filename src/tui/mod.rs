// Interactive terminal chat
mod app;
mod chat_view;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use std::path::PathBuf;

use anyhow::{Context, Result};
pub use app::{App, AppSettings, Focus};
pub use chat_view::{ChatView, ScrollMode, Viewport};
pub use events::Action;
use terminal::TerminalManager;

use crate::config::UserConfig;
use crate::responder::{KnowledgeBase, Responder};
use crate::transcript::{load_transcript, restore_session};

/// Run the interactive chat until the user quits.
///
/// If the configured transcript already exists the conversation continues
/// from it. Returns the path the transcript was saved to, if any.
pub fn run_interactive(config: &UserConfig) -> Result<Option<PathBuf>> {
    let responder = KnowledgeBase::new().with_topics(config.topics.clone());
    let mut app = open_session(responder, AppSettings::from_config(config))?;

    let mut manager = TerminalManager::new()?;
    let res = app.run(manager.terminal_mut());
    manager.restore()?;
    res?;

    app.save_transcript()
}

/// Start a fresh session, or resume the transcript if it already exists
pub fn open_session<R: Responder>(responder: R, settings: AppSettings) -> Result<App<R>> {
    let Some(path) = settings.transcript.clone().filter(|path| path.exists()) else {
        return Ok(App::new(responder, settings));
    };

    let lines = load_transcript(&path)
        .with_context(|| format!("Failed to resume transcript: {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = lines.len(), "resuming transcript");
    Ok(App::resume(responder, settings, restore_session(&lines)))
}
