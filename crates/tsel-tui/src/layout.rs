//! Screen layout definitions for the TUI
//!
//! The target card sits in the top-left corner, taking two thirds of the
//! width (one third in compact mode). Notices stack below it.

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// The "Target JVM" card
    pub card: Rect,

    /// Toast area below the card (zero height when there are no notices)
    pub notices: Rect,
}

/// Fraction of the screen width the card takes
pub fn card_width_ratio(compact: bool) -> (u32, u32) {
    if compact {
        (1, 3)
    } else {
        (2, 3)
    }
}

/// Create the main screen layout.
///
/// # Arguments
/// * `area` - Total screen area
/// * `compact` - Narrow card
/// * `card_height` - Rows the card wants (grows while the dropdown is open)
/// * `notice_rows` - Rows the toast area wants, 0 for none
pub fn create(area: Rect, compact: bool, card_height: u16, notice_rows: u16) -> ScreenAreas {
    let (num, den) = card_width_ratio(compact);
    let [column, _] =
        Layout::horizontal([Constraint::Ratio(num, den), Constraint::Fill(1)]).areas(area);

    let [card, notices, _] = Layout::vertical([
        Constraint::Length(card_height),
        Constraint::Length(notice_rows),
        Constraint::Fill(1),
    ])
    .areas(column);

    ScreenAreas { card, notices }
}
