//! Abstract input key event, independent of terminal library.
//!
//! Keeps tsel-app free of crossterm so the headless runner can drive the
//! engine without a terminal.

/// Abstract input key event.
/// Converted from crossterm::event::KeyEvent at the TUI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKey {
    /// Regular character key (a-z, 0-9, symbols, space)
    Char(char),
    /// Character with Ctrl modifier (Ctrl+c, ...)
    CharCtrl(char),

    Up,
    Down,
    Home,
    End,

    Enter,
    Esc,
    Tab,
}
