//! The "Target JVM" card
//!
//! A refresh control in the title bar, a select box showing the current
//! selection and, while expanded, the option list with a highlight cursor.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use tsel_app::AppState;
use tsel_core::Target;

use super::fit_width;
use crate::theme::{palette, styles};

/// Text shown for the sentinel selection
pub const PLACEHOLDER: &str = "Select Target...";

/// Refresh control in the card title
pub const REFRESH_LABEL: &str = "[↻ Refresh]";

const CARD_TITLE: &str = " Target JVM ";

/// Rows besides the option list: two borders, select box, status line
const CHROME_ROWS: u16 = 4;

/// Dropdown row text for a target
pub fn option_label(target: &Target) -> String {
    target.display_label()
}

/// Card with the target select box
pub struct TargetSelect<'a> {
    state: &'a AppState,
}

impl<'a> TargetSelect<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Rows the card needs to show everything
    pub fn desired_height(&self) -> u16 {
        let options = if self.state.dropdown.expanded {
            u16::try_from(self.state.option_count()).unwrap_or(u16::MAX)
        } else {
            0
        };
        CHROME_ROWS.saturating_add(options)
    }

    fn refresh_control(&self) -> Line<'static> {
        let style = if self.state.loading {
            styles::disabled()
        } else {
            styles::accent()
        };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(REFRESH_LABEL, style),
            Span::raw(" "),
        ])
        .right_aligned()
    }

    fn select_box(&self, width: u16) -> Line<'static> {
        let state = self.state;
        let arrow = if state.dropdown.expanded { "▴" } else { "▾" };

        let (label, style) = if state.selected.is_none() {
            (PLACEHOLDER.to_string(), styles::text_muted())
        } else {
            (state.selected.alias.clone(), styles::text_primary())
        };
        let style = if state.loading {
            styles::disabled()
        } else {
            style
        };

        // "▾ " prefix takes two columns
        let label = fit_width(&label, usize::from(width.saturating_sub(2)));
        Line::from(vec![
            Span::styled(format!("{arrow} "), styles::accent()),
            Span::styled(label, style),
        ])
    }

    fn status_line(&self, width: u16) -> Line<'static> {
        let state = self.state;
        let text = if state.loading {
            "Loading targets…".to_string()
        } else if state.dropdown.expanded {
            "Enter select · Esc close".to_string()
        } else {
            match state.targets.len() {
                1 => "1 target · Enter open · r refresh".to_string(),
                n => format!("{n} targets · Enter open · r refresh"),
            }
        };
        Line::from(Span::styled(
            fit_width(&text, usize::from(width)),
            styles::text_secondary(),
        ))
    }

    /// Option rows for the visible window, keeping the highlight on screen
    fn option_lines(&self, rows: u16, width: u16) -> Vec<Line<'static>> {
        let state = self.state;
        let rows = usize::from(rows);
        if rows == 0 {
            return Vec::new();
        }

        let highlighted = state.dropdown.highlighted;
        let current = state.selected_option_index();
        let offset = highlighted.saturating_sub(rows - 1);

        let labels = std::iter::once(PLACEHOLDER.to_string())
            .chain(state.targets.iter().map(option_label));

        labels
            .enumerate()
            .skip(offset)
            .take(rows)
            .map(|(index, label)| {
                let marker = if index == current { "● " } else { "  " };
                // Marker takes two columns
                let text = format!(
                    "{marker}{}",
                    fit_width(&label, usize::from(width.saturating_sub(2)))
                );
                let style = if index == highlighted {
                    styles::focused_selected()
                } else if index == 0 {
                    styles::text_muted()
                } else {
                    styles::text_primary()
                };
                Line::from(Span::styled(text, style))
            })
            .collect()
    }
}

impl Widget for TargetSelect<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.state.dropdown.expanded)
            .title(Line::from(Span::styled(CARD_TITLE, styles::accent_bold())))
            .title_top(self.refresh_control())
            .style(Style::default().bg(palette::CARD_BG));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines = vec![self.select_box(inner.width)];
        if inner.height >= 2 {
            if self.state.dropdown.expanded {
                let rows = inner.height - 2;
                lines.extend(self.option_lines(rows, inner.width));
            }
            // Status line always on the last row
            while lines.len() < usize::from(inner.height - 1) {
                lines.push(Line::default());
            }
            lines.push(self.status_line(inner.width));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
