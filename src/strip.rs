//! Presentation state for one recipient strip and the triggers that rebuild it.
//!
//! Two independent pieces of state live here. The fit result is rebuilt from
//! scratch (measure, then fit) whenever the recipients or the container width
//! change. Tooltip visibility follows pointer enter/leave over the badge and
//! is never touched by a recompute.

use crate::config::StripSettings;
use crate::fit::{fit, FitResult};
use crate::measure::{MeasureError, MeasureSurface, WidthMeasurer};
use crate::resize::{ResizeBus, ResizeDelivery, ResizeSubscription};
use crate::Recipient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationState {
    pub fit: FitResult,
    pub tooltip_visible: bool,
}

pub struct RecipientStrip {
    recipients: Vec<Recipient>,
    measurer: WidthMeasurer,
    delivery: ResizeDelivery,
    badge_gap: u16,
    container_width: Option<u16>,
    state: PresentationState,
    subscription: Option<ResizeSubscription>,
    recomputes: u64,
}

impl RecipientStrip {
    #[must_use]
    pub fn new(settings: StripSettings) -> Self {
        Self {
            recipients: Vec::new(),
            measurer: WidthMeasurer::new(settings.spacing),
            delivery: settings.delivery,
            badge_gap: settings.badge_gap,
            container_width: None,
            state: PresentationState::default(),
            subscription: None,
            recomputes: 0,
        }
    }

    #[must_use]
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    #[must_use]
    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    #[must_use]
    pub fn container_width(&self) -> Option<u16> {
        self.container_width
    }

    #[must_use]
    pub fn badge_gap(&self) -> u16 {
        self.badge_gap
    }

    /// Number of measure+fit passes run so far.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Start listening for resize signals. Replaces any earlier subscription.
    pub fn activate(&mut self, bus: &ResizeBus) {
        self.subscription = Some(bus.subscribe());
    }

    /// Stop listening for resize signals.
    pub fn deactivate(&mut self) {
        self.subscription = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the recipient list, recomputing only if the content changed.
    ///
    /// # Errors
    ///
    /// Propagates measurement failures; the previous fit is kept.
    pub fn set_recipients<S: MeasureSurface + ?Sized>(
        &mut self,
        recipients: Vec<Recipient>,
        surface: &mut S,
    ) -> Result<(), MeasureError> {
        if recipients == self.recipients {
            return Ok(());
        }
        self.recipients = recipients;
        self.recompute(surface)
    }

    /// Recompute against a new container width, even if the width is
    /// unchanged. The width is only recorded once the recompute succeeds.
    ///
    /// # Errors
    ///
    /// Propagates measurement failures; the previous width and fit are kept.
    pub fn on_resize<S: MeasureSurface + ?Sized>(
        &mut self,
        width: u16,
        surface: &mut S,
    ) -> Result<(), MeasureError> {
        self.refit(Some(width), surface)
    }

    /// Handle queued resize signals. Returns how many recomputes ran.
    ///
    /// # Errors
    ///
    /// Stops at the first measurement failure.
    pub fn pump_resize<S: MeasureSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<usize, MeasureError> {
        let pending = match &self.subscription {
            Some(subscription) => subscription.take_pending(self.delivery),
            None => return Ok(0),
        };
        for width in &pending {
            self.on_resize(*width, surface)?;
        }
        Ok(pending.len())
    }

    /// Measure every recipient and fit the result into the container.
    ///
    /// An unmeasured container counts as zero width, so nothing fits.
    ///
    /// # Errors
    ///
    /// Returns the measurement failure and leaves the previous fit in place.
    pub fn recompute<S: MeasureSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<(), MeasureError> {
        self.refit(self.container_width, surface)
    }

    fn refit<S: MeasureSurface + ?Sized>(
        &mut self,
        container_width: Option<u16>,
        surface: &mut S,
    ) -> Result<(), MeasureError> {
        let container = usize::from(container_width.unwrap_or(0));
        let span = tracing::debug_span!(
            "recompute",
            recipients = self.recipients.len(),
            container
        );
        let _entered = span.enter();

        let widths = match self.measurer.measure_all(surface, &self.recipients) {
            Ok(widths) => widths,
            Err(err) => {
                tracing::warn!(error = %err, "recipient measurement failed; keeping previous fit");
                return Err(err);
            }
        };
        self.container_width = container_width;
        self.state.fit = fit(&self.recipients, &widths, container);
        self.recomputes += 1;
        tracing::debug!(
            visible = self.state.fit.visible.len(),
            hidden = self.state.fit.hidden_count,
            "recomputed recipient fit"
        );
        Ok(())
    }

    pub fn pointer_enter(&mut self) {
        self.state.tooltip_visible = true;
    }

    pub fn pointer_leave(&mut self) {
        self.state.tooltip_visible = false;
    }

    /// Translate pointer motion into enter/leave transitions. Returns whether
    /// the tooltip visibility changed.
    pub fn pointer_moved(&mut self, inside_badge: bool) -> bool {
        if inside_badge == self.state.tooltip_visible {
            return false;
        }
        if inside_badge {
            self.pointer_enter();
        } else {
            self.pointer_leave();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::CellSurface;

    struct BrokenSurface;

    impl MeasureSurface for BrokenSurface {
        fn attach_probe(&mut self) -> Result<(), MeasureError> {
            Err(MeasureError::ProbeUnavailable("no layout".to_string()))
        }

        fn probe_width(&mut self, _text: &str) -> Result<usize, MeasureError> {
            unreachable!("probe never attaches")
        }

        fn detach_probe(&mut self) {}
    }

    fn recipients() -> Vec<Recipient> {
        ["alice@x.com", "bob@x.com", "carol@x.com"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    // Cell widths with default spacing: alice 13, bob 11, carol 13.
    fn strip_with(width: Option<u16>) -> (RecipientStrip, CellSurface) {
        let mut surface = CellSurface::new();
        let mut strip = RecipientStrip::new(StripSettings::default());
        if let Some(width) = width {
            strip.on_resize(width, &mut surface).expect("resize");
        }
        strip
            .set_recipients(recipients(), &mut surface)
            .expect("recipients");
        (strip, surface)
    }

    #[test]
    fn unmeasured_container_fits_nothing() {
        let (strip, _) = strip_with(None);
        assert!(strip.state().fit.visible.is_empty());
        assert_eq!(strip.state().fit.hidden_count, 3);
    }

    #[test]
    fn resize_recomputes_fit() {
        let (mut strip, mut surface) = strip_with(Some(30));
        assert_eq!(strip.state().fit.visible, vec!["alice@x.com", "bob@x.com, ..."]);
        assert_eq!(strip.state().fit.hidden_count, 1);

        strip.on_resize(100, &mut surface).expect("resize");
        assert_eq!(strip.state().fit.visible, recipients());
        assert_eq!(strip.state().fit.hidden_count, 0);
    }

    #[test]
    fn same_recipients_do_not_recompute_but_same_width_does() {
        let (mut strip, mut surface) = strip_with(Some(30));
        let before = strip.recompute_count();
        strip
            .set_recipients(recipients(), &mut surface)
            .expect("same list");
        assert_eq!(strip.recompute_count(), before);
        strip.on_resize(30, &mut surface).expect("same width");
        assert_eq!(strip.recompute_count(), before + 1);
    }

    #[test]
    fn tooltip_survives_recompute() {
        let (mut strip, mut surface) = strip_with(Some(30));
        let fit_before = strip.state().fit.clone();
        strip.pointer_enter();
        assert!(strip.state().tooltip_visible);
        assert_eq!(strip.state().fit, fit_before);

        strip.on_resize(100, &mut surface).expect("resize");
        assert!(strip.state().tooltip_visible);

        strip.pointer_leave();
        assert!(!strip.state().tooltip_visible);
    }

    #[test]
    fn pointer_moved_reports_transitions_only() {
        let (mut strip, _) = strip_with(Some(30));
        assert!(!strip.pointer_moved(false));
        assert!(strip.pointer_moved(true));
        assert!(!strip.pointer_moved(true));
        assert!(strip.pointer_moved(false));
        assert!(!strip.state().tooltip_visible);
    }

    #[test]
    fn pump_resize_recomputes_once_per_signal() {
        let bus = ResizeBus::new();
        let (mut strip, mut surface) = strip_with(None);
        strip.activate(&bus);
        let before = strip.recompute_count();
        bus.emit(20);
        bus.emit(100);
        assert_eq!(strip.pump_resize(&mut surface).expect("pump"), 2);
        assert_eq!(strip.recompute_count(), before + 2);
        assert_eq!(strip.container_width(), Some(100));
        assert_eq!(strip.state().fit.hidden_count, 0);
    }

    #[test]
    fn pump_resize_conflates_when_configured() {
        let bus = ResizeBus::new();
        let mut surface = CellSurface::new();
        let mut strip = RecipientStrip::new(StripSettings {
            delivery: ResizeDelivery::Conflate,
            ..StripSettings::default()
        });
        strip
            .set_recipients(recipients(), &mut surface)
            .expect("recipients");
        strip.activate(&bus);
        bus.emit(20);
        bus.emit(30);
        assert_eq!(strip.pump_resize(&mut surface).expect("pump"), 1);
        assert_eq!(strip.container_width(), Some(30));
        assert_eq!(strip.state().fit.hidden_count, 1);
    }

    #[test]
    fn deactivated_strip_stops_listening() {
        let bus = ResizeBus::new();
        let (mut strip, mut surface) = strip_with(Some(30));
        strip.activate(&bus);
        assert_eq!(bus.listener_count(), 1);
        strip.deactivate();
        assert_eq!(bus.listener_count(), 0);
        bus.emit(100);
        assert_eq!(strip.pump_resize(&mut surface).expect("pump"), 0);
        assert_eq!(strip.container_width(), Some(30));
    }

    #[test]
    fn dropping_strip_releases_listener() {
        let bus = ResizeBus::new();
        {
            let mut strip = RecipientStrip::new(StripSettings::default());
            strip.activate(&bus);
            assert!(strip.is_active());
            assert_eq!(bus.listener_count(), 1);
        }
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn measurement_failure_keeps_previous_fit() {
        let (mut strip, _) = strip_with(Some(30));
        let before = strip.state().clone();
        let err = strip
            .on_resize(100, &mut BrokenSurface)
            .expect_err("broken surface");
        assert!(matches!(err, MeasureError::ProbeUnavailable(_)));
        assert_eq!(strip.state(), &before);
        assert_eq!(strip.container_width(), Some(30));

        let mut surface = CellSurface::new();
        strip.recompute(&mut surface).expect("recompute");
        assert_eq!(strip.state(), &before);
    }

    #[test]
    fn huge_spacing_fits_nothing() {
        let mut surface = CellSurface::new();
        let mut strip = RecipientStrip::new(StripSettings {
            spacing: usize::MAX,
            ..StripSettings::default()
        });
        strip.on_resize(u16::MAX, &mut surface).expect("resize");
        strip
            .set_recipients(recipients(), &mut surface)
            .expect("recipients");
        assert!(strip.state().fit.visible.is_empty());
        assert_eq!(strip.state().fit.hidden_count, 3);
    }
}
