//! Key event handlers

use crate::input_key::InputKey;
use crate::message::{Message, RefreshTrigger};
use crate::state::AppState;

/// Convert key events to messages based on dropdown state
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Ctrl+C quits from anywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    if state.dropdown.expanded {
        handle_key_dropdown(key)
    } else {
        handle_key_normal(state, key)
    }
}

fn handle_key_normal(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Char(' ') | InputKey::Down | InputKey::Char('j') => {
            Some(Message::ToggleDropdown)
        }
        InputKey::Char('r') if !state.loading => Some(Message::RefreshTargets {
            trigger: RefreshTrigger::Manual,
        }),
        InputKey::Char('d') => Some(Message::DismissNotice),
        InputKey::Char('q') | InputKey::Esc => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_dropdown(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Char(' ') => Some(Message::CommitHighlighted),
        InputKey::Down | InputKey::Char('j') | InputKey::Tab => Some(Message::HighlightNext),
        InputKey::Up | InputKey::Char('k') => Some(Message::HighlightPrevious),
        InputKey::Home => Some(Message::HighlightFirst),
        InputKey::End => Some(Message::HighlightLast),
        InputKey::Esc => Some(Message::CloseDropdown),
        _ => None,
    }
}
