use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::models::Reaction;

/// User actions from keyboard events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Escape,
    Submit,
    ToggleSearch,
    ToggleFocus,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    CopyMessage,
    React(Reaction),
    Input(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Escape,

        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ToggleSearch,
        (KeyCode::Tab, _) => Action::ToggleFocus,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyMessage,

        // Navigation (arrows plus Emacs-style)
        (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        // Reactions on the focused message
        (KeyCode::F(1), _) => Action::React(Reaction::Superposition),
        (KeyCode::F(2), _) => Action::React(Reaction::Entangled),
        (KeyCode::F(3), _) => Action::React(Reaction::Collapsed),
        (KeyCode::F(4), _) => Action::React(Reaction::Wave),

        // Text input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}
