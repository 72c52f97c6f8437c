//! Visibility Observer - per-section viewport intersection.
//!
//! An observer owns the [`VisibilityState`] of one target and exposes it as a
//! reactive `Signal<bool>`. The host notifies geometry changes by calling
//! [`VisibilityObserver::sync`], which re-tests the target against the
//! margin-adjusted viewport and reports a [`Crossing`] when it changes.
//!
//! # Semantics
//!
//! - A target already inside at observation start is visible immediately.
//! - `once`: the first entering crossing pins `is_visible` true and
//!   disconnects the observer. Later geometry is ignored.
//! - Without `once`, every entering/leaving crossing toggles `is_visible`.
//! - A host without intersection support yields an observer that is
//!   visible from the start and never changes.
//!
//! Observers share no state; overlapping targets with different margins
//! are tracked independently.

use spark_signals::{Signal, signal};
use tracing::debug;

use super::margin::Margin;
use crate::error::{MotionError, Result};
use crate::host::Host;
use crate::types::ElementId;

// =============================================================================
// OPTIONS
// =============================================================================

/// Options for [`observe_visibility`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Pin visible after the first entering crossing.
    pub once: bool,
    /// Margin applied to the viewport before testing.
    pub margin: Margin,
    /// Fraction of the target (0..=1) that must be inside. 0 = any contact.
    threshold: f32,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            once: false,
            margin: Margin::default(),
            threshold: 0.0,
        }
    }
}

impl ObserveOptions {
    pub fn once() -> Self {
        Self {
            once: true,
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Set the visible fraction required to count as intersecting.
    pub fn with_threshold(mut self, threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MotionError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Snapshot of an observer's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityState {
    pub target: ElementId,
    pub margin: Margin,
    pub once: bool,
    pub is_visible: bool,
    pub has_triggered: bool,
}

/// Direction of a viewport crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Entered,
    Left,
}

/// Per-target viewport intersection detector.
pub struct VisibilityObserver {
    target: ElementId,
    options: ObserveOptions,
    visible: Signal<bool>,
    has_triggered: bool,
    connected: bool,
    degraded: bool,
}

/// Start observing a target.
///
/// Tests the current geometry immediately, so a target that is already in
/// view reports visible without any further event.
pub fn observe_visibility(
    host: &dyn Host,
    target: ElementId,
    options: ObserveOptions,
) -> VisibilityObserver {
    if !host.supports_intersection() {
        debug!(%target, "intersection unsupported, observer pinned visible");
        return VisibilityObserver {
            target,
            options,
            visible: signal(true),
            has_triggered: true,
            connected: false,
            degraded: true,
        };
    }

    let mut observer = VisibilityObserver {
        target,
        options,
        visible: signal(false),
        has_triggered: false,
        connected: true,
        degraded: false,
    };
    observer.sync(host);
    observer
}

impl VisibilityObserver {
    /// Current visibility.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Reactive visibility signal (read-only by convention).
    pub fn signal(&self) -> Signal<bool> {
        self.visible.clone()
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn options(&self) -> &ObserveOptions {
        &self.options
    }

    /// Whether the observer still reacts to geometry.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether the host lacked intersection support.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn state(&self) -> VisibilityState {
        VisibilityState {
            target: self.target,
            margin: self.options.margin,
            once: self.options.once,
            is_visible: self.is_visible(),
            has_triggered: self.has_triggered,
        }
    }

    /// Test whether the target currently intersects the adjusted viewport.
    ///
    /// A target the host cannot locate is treated as outside.
    pub fn intersects(&self, host: &dyn Host) -> bool {
        let Some(target) = host.element_rect(self.target) else {
            return false;
        };
        let root = self.options.margin.apply(host.viewport());
        let Some(overlap) = target.intersection(&root) else {
            return false;
        };
        if self.options.threshold <= 0.0 {
            return true;
        }
        let area = target.area();
        let ratio = if area > 0.0 { overlap.area() / area } else { 1.0 };
        ratio >= self.options.threshold
    }

    /// Re-test geometry and apply any crossing.
    pub fn sync(&mut self, host: &dyn Host) -> Option<Crossing> {
        if !self.connected {
            return None;
        }
        let inside = self.intersects(host);
        self.record(inside)
    }

    /// Apply an intersection notification directly.
    ///
    /// Hosts with their own intersection machinery call this instead of
    /// [`sync`](Self::sync).
    pub fn record(&mut self, inside: bool) -> Option<Crossing> {
        if !self.connected || inside == self.visible.get() {
            return None;
        }

        self.visible.set(inside);
        let crossing = if inside { Crossing::Entered } else { Crossing::Left };
        debug!(target = %self.target, ?crossing, "visibility crossing");

        if inside && !self.has_triggered {
            self.has_triggered = true;
            if self.options.once {
                self.disconnect();
            }
        }
        Some(crossing)
    }

    /// Stop observing. Visibility keeps its last value.
    pub fn disconnect(&mut self) {
        if self.connected {
            debug!(target = %self.target, "observer disconnected");
        }
        self.connected = false;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Document, ElementKind};
    use crate::types::Rect;
    use spark_signals::effect;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 1000x800 viewport over a 4000px page with a section at 1200..1700.
    fn setup() -> (Document, ElementId) {
        let doc = Document::new(1000.0, 800.0);
        doc.insert(ElementKind::Generic, Rect::new(0.0, 0.0, 1000.0, 4000.0));
        let section = doc.insert(ElementKind::Generic, Rect::new(0.0, 1200.0, 1000.0, 500.0));
        (doc, section)
    }

    #[test]
    fn test_initially_visible_without_events() {
        let (doc, section) = setup();
        doc.scroll_to(1000.0);

        let observer = observe_visibility(&doc, section, ObserveOptions::default());
        assert!(observer.is_visible());
        assert!(observer.state().has_triggered);
    }

    #[test]
    fn test_initially_hidden() {
        let (doc, section) = setup();
        let observer = observe_visibility(&doc, section, ObserveOptions::default());
        assert!(!observer.is_visible());
        assert!(!observer.state().has_triggered);
    }

    #[test]
    fn test_toggles_without_once() {
        let (doc, section) = setup();
        let mut observer = observe_visibility(&doc, section, ObserveOptions::default());

        doc.scroll_to(600.0);
        assert_eq!(observer.sync(&doc), Some(Crossing::Entered));
        assert!(observer.is_visible());

        // No change, no crossing
        doc.scroll_to(700.0);
        assert_eq!(observer.sync(&doc), None);

        doc.scroll_to(0.0);
        assert_eq!(observer.sync(&doc), Some(Crossing::Left));
        assert!(!observer.is_visible());

        doc.scroll_to(1500.0);
        assert_eq!(observer.sync(&doc), Some(Crossing::Entered));
    }

    #[test]
    fn test_once_pins_visible() {
        let (doc, section) = setup();
        let mut observer = observe_visibility(&doc, section, ObserveOptions::once());

        doc.scroll_to(1000.0);
        assert_eq!(observer.sync(&doc), Some(Crossing::Entered));
        assert!(!observer.is_connected());

        doc.scroll_to(0.0);
        assert_eq!(observer.sync(&doc), None);
        assert!(observer.is_visible());
    }

    #[test]
    fn test_negative_margin_delays_trigger() {
        let (doc, section) = setup();
        let options = ObserveOptions::default().with_margin(Margin::px(-100.0));
        let mut observer = observe_visibility(&doc, section, options);

        // Viewport 450..1250 overlaps by 50px, but the shrunk root ends at 1150
        doc.scroll_to(450.0);
        assert_eq!(observer.sync(&doc), None);
        assert!(!observer.is_visible());

        // Shrunk root 650..1250 overlaps 1200..1250
        doc.scroll_to(550.0);
        assert_eq!(observer.sync(&doc), Some(Crossing::Entered));
    }

    #[test]
    fn test_threshold() {
        let (doc, section) = setup();
        let options = ObserveOptions::default().with_threshold(0.5).unwrap();
        let mut observer = observe_visibility(&doc, section, options);

        // 100 of 500px visible = 0.2
        doc.scroll_to(500.0);
        assert_eq!(observer.sync(&doc), None);

        // 300 of 500px visible = 0.6
        doc.scroll_to(700.0);
        assert_eq!(observer.sync(&doc), Some(Crossing::Entered));

        assert!(ObserveOptions::default().with_threshold(1.5).is_err());
    }

    #[test]
    fn test_degrades_to_visible() {
        let (doc, section) = setup();
        doc.set_intersection_support(false);

        let mut observer = observe_visibility(&doc, section, ObserveOptions::default());
        assert!(observer.is_visible());
        assert!(observer.is_degraded());

        doc.scroll_to(3000.0);
        assert_eq!(observer.sync(&doc), None);
        assert!(observer.is_visible());
    }

    #[test]
    fn test_missing_target_is_outside() {
        let (doc, section) = setup();
        doc.scroll_to(1000.0);
        let mut observer = observe_visibility(&doc, section, ObserveOptions::default());
        assert!(observer.is_visible());

        doc.remove(section);
        assert_eq!(observer.sync(&doc), Some(Crossing::Left));
    }

    #[test]
    fn test_overlapping_observers_independent() {
        let (doc, section) = setup();
        let mut plain = observe_visibility(&doc, section, ObserveOptions::default());
        let mut inset = observe_visibility(
            &doc,
            section,
            ObserveOptions::default().with_margin(Margin::px(-200.0)),
        );

        doc.scroll_to(500.0);
        assert_eq!(plain.sync(&doc), Some(Crossing::Entered));
        assert_eq!(inset.sync(&doc), None);
        assert!(plain.is_visible());
        assert!(!inset.is_visible());
    }

    #[test]
    fn test_signal_notifies_on_crossing() {
        let (doc, section) = setup();
        let mut observer = observe_visibility(&doc, section, ObserveOptions::default());

        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let visible = observer.signal();
        let _stop = effect(move || {
            let _ = visible.get();
            runs_clone.set(runs_clone.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        doc.scroll_to(1000.0);
        observer.sync(&doc);
        assert_eq!(runs.get(), 2);

        // Same geometry: no write, no notification
        observer.sync(&doc);
        assert_eq!(runs.get(), 2);
    }
}
