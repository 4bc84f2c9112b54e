//! Custom widget components

mod notices;
mod target_select;

pub use notices::NoticeToasts;
pub use target_select::{option_label, TargetSelect, PLACEHOLDER, REFRESH_LABEL};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `width` columns, ending in `…` when shortened.
pub(crate) fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        // Leave a column for the ellipsis
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
