//! Semantic style builders

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use tsel_app::NoticeLevel;

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

/// Controls that ignore input while a fetch is outstanding
pub fn disabled() -> Style {
    text_muted().add_modifier(Modifier::DIM)
}

/// "Black on Cyan" for the highlighted dropdown option
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Style::default().fg(palette::BORDER_ACTIVE)
        } else {
            Style::default().fg(palette::BORDER_DIM)
        })
}

// --- Notices ---

/// `(icon, Style)` for a notice level
pub fn notice_indicator(level: NoticeLevel) -> (&'static str, Style) {
    match level {
        NoticeLevel::Info => ("●", Style::default().fg(palette::NOTICE_INFO)),
        NoticeLevel::Danger => (
            "✗",
            Style::default()
                .fg(palette::NOTICE_DANGER)
                .add_modifier(Modifier::BOLD),
        ),
    }
}
