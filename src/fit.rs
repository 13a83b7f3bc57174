//! Fit calculation: decide which recipients fit a container and how to label
//! the rest.

use serde::{Deserialize, Serialize};

/// Appended in place to the last visible label when more recipients follow.
pub const TRUNCATION_MARKER: &str = ", ...";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitResult {
    /// Labels that fit, in input order. The last one carries
    /// [`TRUNCATION_MARKER`] when the list was cut short.
    pub visible: Vec<String>,
    /// Recipients left out of `visible`.
    pub hidden_count: usize,
}

impl FitResult {
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.hidden_count > 0
    }

    /// Overflow badge text, `+N`, when anything is hidden.
    #[must_use]
    pub fn badge_label(&self) -> Option<String> {
        self.is_truncated().then(|| format!("+{}", self.hidden_count))
    }

    #[must_use]
    pub fn joined(&self) -> String {
        self.visible.join(", ")
    }
}

/// Walk `labels` in order and keep each one whose width still leaves the
/// running total strictly below `container_width`.
///
/// `widths` runs parallel to `labels`; a label without a width is treated as
/// not fitting. A zero-width container fits nothing.
#[must_use]
pub fn fit(labels: &[String], widths: &[usize], container_width: usize) -> FitResult {
    let mut cumulative = 0usize;
    let mut visible = Vec::new();
    for (label, width) in labels.iter().zip(widths) {
        let next = cumulative.saturating_add(*width);
        if next >= container_width {
            break;
        }
        cumulative = next;
        visible.push(label.clone());
    }

    if visible.len() == labels.len() {
        return FitResult {
            visible,
            hidden_count: 0,
        };
    }

    if let Some(last) = visible.last_mut() {
        last.push_str(TRUNCATION_MARKER);
    }
    let hidden_count = labels.len() - visible.len();
    FitResult {
        visible,
        hidden_count,
    }
}
