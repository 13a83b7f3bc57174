//! Ratatui rendering for a recipient strip: the clipped list, the `+N` badge,
//! and the hover tooltip with the full list.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Clear, Widget},
};

use crate::strip::RecipientStrip;
use crate::text::{display_width, sanitize_label, truncate_with_ellipsis};

/// Tooltip offset from the top-right corner of the screen.
pub const TOOLTIP_INSET: u16 = 1;
const BADGE_PADDING: u16 = 1;
const TOOLTIP_PADDING: u16 = 1;

const PILL_BG: Color = Color::Rgb(0x66, 0x66, 0x66);
const PILL_FG: Color = Color::Rgb(0xf0, 0xf0, 0xf0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripTheme {
    pub list: Style,
    pub badge: Style,
    pub tooltip: Style,
}

impl Default for StripTheme {
    fn default() -> Self {
        let pill = Style::default().fg(PILL_FG).bg(PILL_BG);
        Self {
            list: Style::default(),
            badge: pill.add_modifier(Modifier::BOLD),
            tooltip: pill,
        }
    }
}

impl StripTheme {
    /// No colors; the badge is still set apart with reverse video.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            list: Style::default(),
            badge: Style::default().add_modifier(Modifier::REVERSED),
            tooltip: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Where each part of the strip lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub list: Rect,
    pub badge: Option<Rect>,
    pub tooltip: Option<Rect>,
}

impl StripLayout {
    /// Hit-test a pointer position against the badge.
    #[must_use]
    pub fn badge_contains(&self, column: u16, row: u16) -> bool {
        self.badge.is_some_and(|badge| {
            column >= badge.x && column < badge.right() && row >= badge.y && row < badge.bottom()
        })
    }
}

fn badge_text(label: &str) -> String {
    let pad = " ".repeat(usize::from(BADGE_PADDING));
    format!("{pad}{label}{pad}")
}

fn full_list_text(strip: &RecipientStrip) -> String {
    strip
        .recipients()
        .iter()
        .map(|label| sanitize_label(label))
        .collect::<Vec<_>>()
        .join(", ")
}

fn visible_list_text(strip: &RecipientStrip) -> String {
    strip
        .state()
        .fit
        .visible
        .iter()
        .map(|label| sanitize_label(label))
        .collect::<Vec<_>>()
        .join(", ")
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Lay the strip out on the first row of `area`; the tooltip is anchored to
/// `screen`.
#[must_use]
pub fn layout_strip(area: Rect, screen: Rect, strip: &RecipientStrip) -> StripLayout {
    let row = Rect::new(area.x, area.y, area.width, area.height.min(1));
    let state = strip.state();

    let badge = state.fit.badge_label().and_then(|label| {
        let width = clamp_u16(display_width(&badge_text(&label))).min(row.width);
        (width > 0 && row.height > 0)
            .then(|| Rect::new(row.right() - width, row.y, width, row.height))
    });
    let list_width = match badge {
        Some(badge) => row
            .width
            .saturating_sub(badge.width)
            .saturating_sub(strip.badge_gap()),
        None => row.width,
    };
    let list = Rect::new(row.x, row.y, list_width, row.height);

    let tooltip = state
        .tooltip_visible
        .then(|| {
            let max_width = screen.width.saturating_sub(TOOLTIP_INSET * 2);
            let wanted = clamp_u16(display_width(&full_list_text(strip)))
                .saturating_add(TOOLTIP_PADDING * 2);
            let width = wanted.min(max_width);
            (width > 0 && screen.height > TOOLTIP_INSET).then(|| {
                Rect::new(
                    screen.right() - TOOLTIP_INSET - width,
                    screen.y + TOOLTIP_INSET,
                    width,
                    1,
                )
            })
        })
        .flatten();

    StripLayout {
        list,
        badge,
        tooltip,
    }
}

/// Widget drawing a [`RecipientStrip`] with a theme.
pub struct RecipientStripView<'a> {
    strip: &'a RecipientStrip,
    theme: StripTheme,
}

impl<'a> RecipientStripView<'a> {
    #[must_use]
    pub fn new(strip: &'a RecipientStrip) -> Self {
        Self {
            strip,
            theme: StripTheme::default(),
        }
    }

    #[must_use]
    pub fn theme(mut self, theme: StripTheme) -> Self {
        self.theme = theme;
        self
    }
}

impl Widget for RecipientStripView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let screen = *buf.area();
        let area = area.intersection(screen);
        if area.is_empty() {
            return;
        }
        let layout = layout_strip(area, screen, self.strip);

        if !layout.list.is_empty() {
            buf.set_style(layout.list, self.theme.list);
            let width = usize::from(layout.list.width);
            let text = truncate_with_ellipsis(&visible_list_text(self.strip), width);
            buf.set_stringn(layout.list.x, layout.list.y, text, width, self.theme.list);
        }

        if let (Some(badge), Some(label)) = (layout.badge, self.strip.state().fit.badge_label()) {
            buf.set_style(badge, self.theme.badge);
            buf.set_stringn(
                badge.x,
                badge.y,
                badge_text(&label),
                usize::from(badge.width),
                self.theme.badge,
            );
        }

        if let Some(tooltip) = layout.tooltip {
            let tooltip = tooltip.intersection(screen);
            Clear.render(tooltip, buf);
            buf.set_style(tooltip, self.theme.tooltip);
            let inner = usize::from(tooltip.width.saturating_sub(TOOLTIP_PADDING * 2));
            let text = truncate_with_ellipsis(&full_list_text(self.strip), inner);
            buf.set_stringn(
                tooltip.x + TOOLTIP_PADDING,
                tooltip.y,
                text,
                inner,
                self.theme.tooltip,
            );
        }
    }
}
