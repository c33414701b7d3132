//! Interactive chat state and event handling.
//!
//! `App` owns the message store, reactions, the responder and the live search,
//! and runs the main event loop via `run()`. It manages:
//!
//! - **Compose**: Enter sends the input, the responder's reply (or the
//!   fallback reply) is appended right after it
//! - **Live search**: keystrokes in the search pane are debounced before the
//!   store is scanned
//! - **Navigation**: selecting a result scrolls the chat to the entry and
//!   emphasises it for a fixed time
//! - **Status messages**: transient feedback for clipboard, reactions, errors
//! - **Dirty state tracking**: redraw only when state changes
//!
//! Everything time-dependent takes an explicit `Instant`, so tests drive the
//! app through `handle_action` and `tick` without a terminal.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use uuid::Uuid;

use super::chat_view::ChatView;
use super::events::{Action, poll_event};
use super::rendering::{RenderState, SearchPane, render_ui};
use crate::clipboard::{ClipboardProvider, copy_entry, copy_entry_with};
use crate::config::UserConfig;
use crate::markup::plain_text;
use crate::models::{Reaction, Role};
use crate::responder::{Responder, WELCOME_MESSAGE, reply_or_fallback};
use crate::search::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_EMPHASIS_MS, LiveSearch, SearchEngine, select_result,
};
use crate::store::{MessageStore, ReactionBoard};
use crate::transcript::{RestoredSession, SessionLog, save_transcript};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Longest search query accepted from the input field
const MAX_SEARCH_CHARS: usize = 256;
/// Longest message accepted from the compose field
const MAX_COMPOSE_CHARS: usize = 4000;
/// Upper bound on how long the loop blocks waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Result rows skipped by PageUp/PageDown in the search pane
const RESULT_PAGE: isize = 10;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Which input receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Compose,
    Search,
}

/// Timings and persistence for one interactive session
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub search_debounce: Duration,
    pub emphasis: Duration,
    pub transcript: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            emphasis: Duration::from_millis(DEFAULT_EMPHASIS_MS),
            transcript: None,
        }
    }
}

impl AppSettings {
    pub fn from_config(config: &UserConfig) -> Self {
        Self {
            search_debounce: config.search_debounce(),
            emphasis: config.emphasis(),
            transcript: config.transcript.clone(),
        }
    }
}

pub struct App<R: Responder> {
    store: MessageStore,
    reactions: ReactionBoard,
    responder: R,
    live: LiveSearch,
    chat: ChatView,
    focus: Focus,
    search_open: bool,
    compose_input: String,
    search_input: String,
    selected_result: usize,
    status_message: Option<StatusMessage>,
    clipboard: Option<Box<dyn ClipboardProvider>>,
    sessions: SessionLog,
    transcript: Option<PathBuf>,
    should_quit: bool,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl<R: Responder> App<R> {
    /// Fresh session starting with the welcome message
    pub fn new(responder: R, settings: AppSettings) -> Self {
        Self::resume(responder, settings, RestoredSession::default())
    }

    /// Continue from restored history. The welcome message is only added to
    /// an empty history; restored entries keep their original session ids.
    pub fn resume(responder: R, settings: AppSettings, restored: RestoredSession) -> Self {
        let RestoredSession { mut store, reactions, sessions } = restored;
        if store.is_empty()
            && let Err(e) = store.append(Role::Assistant, WELCOME_MESSAGE)
        {
            tracing::warn!(error = %e, "could not add welcome message");
        }

        let now = Instant::now();
        let session_id = Uuid::new_v4();
        tracing::info!(%session_id, entries = store.len(), "chat session started");

        Self {
            store,
            reactions,
            responder,
            live: LiveSearch::new(SearchEngine::new(), settings.search_debounce),
            chat: ChatView::new(settings.emphasis, now),
            focus: Focus::Compose,
            search_open: false,
            compose_input: String::new(),
            search_input: String::new(),
            selected_result: 0,
            status_message: None,
            clipboard: None,
            sessions: SessionLog::resumed(session_id, sessions),
            transcript: settings.transcript,
            should_quit: false,
            needs_redraw: true, // Initial draw needed
            last_draw_time: now,
        }
    }

    /// Use this clipboard instead of the system one
    pub fn with_clipboard(mut self, provider: Box<dyn ClipboardProvider>) -> Self {
        self.clipboard = Some(provider);
        self
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn reactions(&self) -> &ReactionBoard {
        &self.reactions
    }

    /// Set a transient status message with automatic expiry
    fn set_status(
        &mut self,
        text: impl Into<String>,
        message_type: MessageType,
        duration_ms: u64,
        now: Instant,
    ) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: now + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn set_error(&mut self, text: impl Into<String>, now: Instant) {
        self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS, now);
    }

    fn set_success(&mut self, text: impl Into<String>, now: Instant) {
        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS, now);
    }

    /// Advance timers: due searches, emphasis expiry, status expiry
    pub fn tick(&mut self, now: Instant) {
        if self.live.tick(&self.store, now) {
            self.selected_result = 0;
            self.needs_redraw = true;
        }

        if !self.chat.emphasis.expire(now).is_empty() {
            self.needs_redraw = true;
        }

        let expired = self.status_message.as_ref().is_some_and(|msg| now >= msg.expires_at);
        if expired {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    /// How long the loop may wait for input before a timer needs servicing
    fn poll_timeout(&self, now: Instant) -> Duration {
        [
            self.live.deadline(),
            self.chat.emphasis.next_expiry(),
            self.status_message.as_ref().map(|msg| msg.expires_at),
        ]
        .into_iter()
        .flatten()
        .map(|deadline| deadline.saturating_duration_since(now))
        .fold(POLL_INTERVAL, Duration::min)
    }

    fn render_state(&self) -> RenderState<'_> {
        RenderState {
            store: &self.store,
            reactions: &self.reactions,
            chat: &self.chat,
            compose_input: &self.compose_input,
            focus: self.focus,
            search: self.search_open.then(|| SearchPane {
                query: &self.search_input,
                state: self.live.state(),
                pending: self.live.is_pending(),
                selected: self.selected_result,
            }),
            status_message: self.status_message.as_ref(),
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.tick(now);

            // Draw if dirty or if it's been a while (terminal resize handling)
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= POLL_INTERVAL {
                let mut viewport = self.chat.viewport;
                terminal.draw(|f| {
                    viewport = render_ui(f, &self.render_state());
                })?;
                self.chat.viewport = viewport;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(self.poll_timeout(Instant::now()))?;
            self.handle_action(action, Instant::now());
        }

        Ok(())
    }

    /// Write the session to the configured transcript path, if any
    pub fn save_transcript(&self) -> Result<Option<PathBuf>> {
        let Some(path) = &self.transcript else {
            return Ok(None);
        };
        save_transcript(path, &self.sessions, &self.store, &self.reactions)?;
        Ok(Some(path.clone()))
    }

    /// Handle a user action
    pub fn handle_action(&mut self, action: Action, now: Instant) {
        self.chat.set_clock(now);
        if action != Action::None {
            self.needs_redraw = true;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Escape => self.escape(),
            Action::Submit => match self.focus {
                Focus::Compose => self.send_message(now),
                Focus::Search => self.jump_to_selected(now),
            },
            Action::ToggleSearch => {
                if self.search_open {
                    self.close_search();
                } else {
                    self.open_search();
                }
            }
            Action::ToggleFocus => match self.focus {
                Focus::Compose => self.open_search(),
                Focus::Search => self.focus = Focus::Compose,
            },
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.page(-1),
            Action::PageDown => self.page(1),
            Action::CopyMessage => self.copy_target(now),
            Action::React(reaction) => self.react(reaction, now),
            Action::Input(c) => self.insert_char(c, now),
            Action::DeleteChar => self.delete_char(now),
            Action::None => {}
        }
    }

    fn escape(&mut self) {
        match self.focus {
            Focus::Search if !self.search_input.is_empty() => {
                self.search_input.clear();
                self.live.clear();
                self.selected_result = 0;
            }
            Focus::Search => self.close_search(),
            Focus::Compose if !self.compose_input.is_empty() => self.compose_input.clear(),
            Focus::Compose if self.chat.focused.is_some() => self.chat.follow_latest(),
            Focus::Compose => self.should_quit = true,
        }
    }

    fn open_search(&mut self) {
        self.search_open = true;
        self.focus = Focus::Search;
    }

    fn close_search(&mut self) {
        self.search_open = false;
        self.focus = Focus::Compose;
        self.search_input.clear();
        self.live.clear();
        self.selected_result = 0;
    }

    fn send_message(&mut self, now: Instant) {
        let prompt = self.compose_input.trim().to_string();
        if prompt.is_empty() {
            return;
        }
        // The store keeps markup-only turns, but typed ones would render blank
        if plain_text(&prompt).is_empty() {
            self.set_error("✗ Message has no visible text", now);
            return;
        }

        if let Err(e) = self.store.append(Role::User, &prompt) {
            self.set_error(format!("✗ {}", e), now);
            return;
        }
        self.compose_input.clear();

        let reply = reply_or_fallback(&mut self.responder, &prompt);
        if let Err(e) = self.store.append(Role::Assistant, &reply) {
            tracing::warn!(error = %e, "assistant reply not stored");
        }
        self.chat.follow_latest();

        // Open results should see the new entries too
        if self.search_open {
            self.live.on_input(&self.search_input, now);
        }
    }

    fn jump_to_selected(&mut self, now: Instant) {
        // Enter before the quiet period ends runs the search right away
        if self.live.flush(&self.store) {
            self.selected_result = 0;
        }

        let Some(result) =
            self.live.results().and_then(|results| results.get(self.selected_result)).cloned()
        else {
            return;
        };

        match select_result(&self.store, &result, &mut self.chat).map(|e| e.sequence_index) {
            Ok(index) => {
                tracing::debug!(index, "jumped to search result");
                self.close_search();
                self.set_success(format!("✓ Jumped to message {}", index + 1), now);
            }
            Err(e) => self.set_error(format!("✗ {}", e), now),
        }
    }

    fn result_count(&self) -> usize {
        self.live.results().map_or(0, <[_]>::len)
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Compose => self.chat.move_focus(delta, self.store.len()),
            Focus::Search => {
                let total = self.result_count();
                if total == 0 {
                    self.selected_result = 0;
                    return;
                }
                self.selected_result =
                    self.selected_result.saturating_add_signed(delta).min(total - 1);
            }
        }
    }

    fn page(&mut self, pages: isize) {
        match self.focus {
            Focus::Compose => self.chat.page(pages),
            Focus::Search => self.move_selection(pages * RESULT_PAGE),
        }
    }

    fn copy_target(&mut self, now: Instant) {
        let Some(index) = self.chat.target(self.store.len()) else {
            self.set_error("✗ No message to copy", now);
            return;
        };
        let entry = match self.store.get(index) {
            Ok(entry) => entry,
            Err(e) => {
                self.set_error(format!("✗ {}", e), now);
                return;
            }
        };

        let copied = match self.clipboard.as_mut() {
            Some(provider) => copy_entry_with(entry, provider.as_mut()),
            None => copy_entry(entry),
        };

        match copied {
            Ok(()) => self.set_success("✓ Copied to clipboard", now),
            Err(e) => self.set_error(format!("✗ Clipboard error: {}", e), now),
        }
    }

    fn react(&mut self, reaction: Reaction, now: Instant) {
        let Some(index) = self.chat.target(self.store.len()) else {
            return;
        };
        match self.reactions.toggle(&self.store, index, reaction) {
            Ok(true) => self.set_success(format!("✓ {} added", reaction), now),
            Ok(false) => self.set_success(format!("✓ {} removed", reaction), now),
            Err(e) => self.set_error(format!("✗ {}", e), now),
        }
    }

    fn insert_char(&mut self, c: char, now: Instant) {
        match self.focus {
            Focus::Compose => {
                if self.compose_input.chars().count() < MAX_COMPOSE_CHARS {
                    self.compose_input.push(c);
                }
            }
            Focus::Search => {
                // Limit search query to prevent pathological scans
                if self.search_input.chars().count() < MAX_SEARCH_CHARS {
                    self.search_input.push(c);
                    self.live.on_input(&self.search_input, now);
                    self.selected_result = 0;
                }
            }
        }
    }

    fn delete_char(&mut self, now: Instant) {
        match self.focus {
            Focus::Compose => {
                self.compose_input.pop();
            }
            Focus::Search => {
                if self.search_input.pop().is_some() {
                    self.live.on_input(&self.search_input, now);
                    self.selected_result = 0;
                }
            }
        }
    }
}
