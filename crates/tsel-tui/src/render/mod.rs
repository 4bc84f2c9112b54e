//! Main render/view function (View in TEA pattern)


use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use tsel_app::AppState;

use super::{layout, widgets};
use crate::theme::palette;

/// Render the complete UI (View function in TEA)
///
/// A pure function of the state.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let card = widgets::TargetSelect::new(state);
    let toasts = widgets::NoticeToasts::new(&state.notices);

    let areas = layout::create(
        area,
        state.is_compact(),
        card.desired_height(),
        toasts.desired_height(),
    );

    frame.render_widget(card, areas.card);
    frame.render_widget(toasts, areas.notices);
}
