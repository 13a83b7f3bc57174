//! Width measurement for recipient labels.
//!
//! Measurement goes through an injected [`MeasureSurface`] so the fit logic can
//! be exercised with fabricated width tables. A surface hands out one probe at
//! a time; [`WidthMeasurer`] holds it for a whole batch and always detaches it
//! before returning, including when a measurement fails part way.

use std::fmt;

use crate::text::{display_width, sanitize_label};

/// Columns added to every label to cover the `", "` separator between items.
pub const DEFAULT_SPACING: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasureError {
    ProbeUnavailable(String),
    Measurement(String),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbeUnavailable(msg) => write!(f, "measurement probe unavailable: {msg}"),
            Self::Measurement(msg) => write!(f, "measurement failed: {msg}"),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Something that can lay out a line of text off-screen and report its width.
pub trait MeasureSurface {
    /// Create the off-flow probe. Fails if a probe is already attached.
    fn attach_probe(&mut self) -> Result<(), MeasureError>;

    /// Put `text` into the probe and read back its rendered width.
    fn probe_width(&mut self, text: &str) -> Result<usize, MeasureError>;

    /// Remove the probe. Must be safe to call when nothing is attached.
    fn detach_probe(&mut self);
}

/// Terminal surface: the probe is a detached single-line buffer measured in
/// display columns.
#[derive(Debug, Default)]
pub struct CellSurface {
    probe: Option<String>,
}

impl CellSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_probe_attached(&self) -> bool {
        self.probe.is_some()
    }
}

impl MeasureSurface for CellSurface {
    fn attach_probe(&mut self) -> Result<(), MeasureError> {
        if self.probe.is_some() {
            return Err(MeasureError::ProbeUnavailable(
                "probe already attached".to_string(),
            ));
        }
        self.probe = Some(String::new());
        Ok(())
    }

    fn probe_width(&mut self, text: &str) -> Result<usize, MeasureError> {
        let probe = self
            .probe
            .as_mut()
            .ok_or_else(|| MeasureError::ProbeUnavailable("no probe attached".to_string()))?;
        probe.clear();
        probe.push_str(&sanitize_label(text));
        Ok(display_width(probe))
    }

    fn detach_probe(&mut self) {
        self.probe = None;
    }
}

struct ProbeGuard<'a, S: MeasureSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: MeasureSurface + ?Sized> ProbeGuard<'a, S> {
    fn attach(surface: &'a mut S) -> Result<Self, MeasureError> {
        surface.attach_probe()?;
        tracing::trace!("measurement probe attached");
        Ok(Self { surface })
    }

    fn width(&mut self, text: &str) -> Result<usize, MeasureError> {
        self.surface.probe_width(text)
    }
}

impl<S: MeasureSurface + ?Sized> Drop for ProbeGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.detach_probe();
        tracing::trace!("measurement probe detached");
    }
}

/// Turns labels into occupied widths: raw probe width plus a fixed spacing
/// allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthMeasurer {
    spacing: usize,
}

impl Default for WidthMeasurer {
    fn default() -> Self {
        Self::new(DEFAULT_SPACING)
    }
}

impl WidthMeasurer {
    #[must_use]
    pub fn new(spacing: usize) -> Self {
        Self { spacing }
    }

    #[must_use]
    pub fn spacing(&self) -> usize {
        self.spacing
    }

    pub fn measure<S: MeasureSurface + ?Sized>(
        &self,
        surface: &mut S,
        label: &str,
    ) -> Result<usize, MeasureError> {
        let mut probe = ProbeGuard::attach(surface)?;
        let width = probe.width(label)?;
        Ok(width.saturating_add(self.spacing))
    }

    /// Measure every label with a single probe.
    ///
    /// # Errors
    ///
    /// Returns the first probe failure. The probe is detached either way.
    pub fn measure_all<S: MeasureSurface + ?Sized>(
        &self,
        surface: &mut S,
        labels: &[String],
    ) -> Result<Vec<usize>, MeasureError> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let mut probe = ProbeGuard::attach(surface)?;
        let mut widths = Vec::with_capacity(labels.len());
        for label in labels {
            widths.push(probe.width(label)?.saturating_add(self.spacing));
        }
        Ok(widths)
    }
}
