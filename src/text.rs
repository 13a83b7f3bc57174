//! Display-text helpers shared by width measurement and rendering.

use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ELLIPSIS: char = '…';

/// Reduce a label to something that renders on exactly one terminal line.
///
/// ANSI escape sequences are removed and any remaining control character
/// (newline, tab, ...) becomes a single space. Labels that need no change are
/// borrowed.
#[must_use]
pub fn sanitize_label(label: &str) -> Cow<'_, str> {
    let needs_strip = label.contains('\x1b');
    let needs_fold = label.chars().any(char::is_control);
    if !needs_strip && !needs_fold {
        return Cow::Borrowed(label);
    }
    let stripped = if needs_strip {
        strip_ansi_escapes::strip_str(label)
    } else {
        label.to_string()
    };
    Cow::Owned(
        stripped
            .chars()
            .map(|ch| if ch.is_control() { ' ' } else { ch })
            .collect(),
    )
}

#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

#[must_use]
pub fn truncate_display(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Clip `text` to `max_width` columns, ending in `…` when anything was cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = truncate_display(text, max_width - 1);
    out.push(ELLIPSIS);
    out
}
