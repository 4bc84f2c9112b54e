//! Toast area listing recent notices, newest first

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use tsel_app::{Notice, Notices};

use super::fit_width;
use crate::theme::{palette, styles};

pub struct NoticeToasts<'a> {
    notices: &'a Notices,
}

impl<'a> NoticeToasts<'a> {
    pub fn new(notices: &'a Notices) -> Self {
        Self { notices }
    }

    /// Rows needed: one per notice plus borders, 0 when empty
    pub fn desired_height(&self) -> u16 {
        if self.notices.is_empty() {
            return 0;
        }
        u16::try_from(self.notices.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    }

    fn notice_line(notice: &Notice, width: u16) -> Line<'static> {
        let (icon, icon_style) = styles::notice_indicator(notice.level);
        let time = notice.created_at.format("%H:%M:%S").to_string();

        // icon + space + time + space
        let prefix_width = 2 + time.len() + 1;
        let body = fit_width(
            &format!("{}: {}", notice.title, notice.message),
            usize::from(width).saturating_sub(prefix_width),
        );

        Line::from(vec![
            Span::styled(format!("{icon} "), icon_style),
            Span::styled(format!("{time} "), styles::text_muted()),
            Span::styled(body, styles::text_primary()),
        ])
    }
}

impl Widget for NoticeToasts<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.notices.is_empty() || area.height == 0 {
            return;
        }

        let block = styles::glass_block(false)
            .title(Line::from(Span::styled(" Notices ", styles::text_secondary())))
            .title_top(Line::from(Span::styled(" d dismiss ", styles::text_muted())).right_aligned())
            .style(Style::default().bg(palette::POPUP_BG));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .notices
            .iter()
            .rev()
            .map(|notice| Self::notice_line(notice, inner.width))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
