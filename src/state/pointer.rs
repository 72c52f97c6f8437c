//! Pointer Tracker - latest pointer position.
//!
//! Subscribes to host pointer-move notifications and mirrors the most recent
//! coordinate into a reactive signal. No throttling: every notification the
//! host delivers is applied synchronously.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{Signal, signal};
use tracing::debug;

use crate::host::{Host, ListenerId};
use crate::types::Point;

/// Pointer position tracker.
pub struct PointerTracker {
    position: Signal<Point>,
    moves: Rc<Cell<u64>>,
    listener: Option<ListenerId>,
    alive: Rc<Cell<bool>>,
}

impl PointerTracker {
    /// A tracker not yet attached to any host. Position starts at the origin.
    pub fn detached() -> Self {
        Self {
            position: signal(Point::ORIGIN),
            moves: Rc::new(Cell::new(0)),
            listener: None,
            alive: Rc::new(Cell::new(true)),
        }
    }

    /// Create a tracker subscribed to the host's pointer moves.
    pub fn attach(host: &dyn Host) -> Self {
        let mut tracker = Self::detached();
        let position = tracker.position.clone();
        let moves = tracker.moves.clone();
        let alive = tracker.alive.clone();

        let id = host.add_pointer_listener(Rc::new(move |point| {
            if alive.get() {
                position.set(point);
                moves.set(moves.get() + 1);
            }
        }));
        tracker.listener = Some(id);
        debug!(listener = id.0, "pointer tracker attached");
        tracker
    }

    /// Apply a move directly (hosts that push instead of subscribing).
    pub fn handle_move(&self, point: Point) {
        if self.alive.get() {
            self.position.set(point);
            self.moves.set(self.moves.get() + 1);
        }
    }

    /// Latest pointer position.
    pub fn position(&self) -> Point {
        self.position.get()
    }

    /// Reactive pointer position.
    pub fn position_signal(&self) -> Signal<Point> {
        self.position.clone()
    }

    /// Number of move notifications applied.
    pub fn move_count(&self) -> u64 {
        self.moves.get()
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Unsubscribe from the host. Further notifications are ignored.
    pub fn detach(&mut self, host: &dyn Host) {
        self.alive.set(false);
        if let Some(id) = self.listener.take() {
            host.remove_listener(id);
            debug!(listener = id.0, "pointer tracker detached");
        }
    }
}

impl Drop for PointerTracker {
    fn drop(&mut self) {
        // Listener may outlive us in the host; make it inert
        self.alive.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Document;

    fn setup() -> Document {
        Document::new(800.0, 600.0)
    }

    #[test]
    fn test_tracks_every_move() {
        let doc = setup();
        let tracker = PointerTracker::attach(&doc);
        assert_eq!(tracker.position(), Point::ORIGIN);

        doc.move_pointer(10.0, 20.0);
        doc.move_pointer(11.0, 21.0);
        doc.move_pointer(12.0, 22.0);

        assert_eq!(tracker.position(), Point::new(12.0, 22.0));
        assert_eq!(tracker.move_count(), 3);
    }

    #[test]
    fn test_detach_removes_listener() {
        let doc = setup();
        let mut tracker = PointerTracker::attach(&doc);
        assert_eq!(doc.listener_count(), 1);

        tracker.detach(&doc);
        assert_eq!(doc.listener_count(), 0);

        doc.move_pointer(50.0, 50.0);
        assert_eq!(tracker.position(), Point::ORIGIN);
        assert!(!tracker.is_attached());
    }

    #[test]
    fn test_dropped_tracker_listener_is_inert() {
        let doc = setup();
        let tracker = PointerTracker::attach(&doc);
        let position = tracker.position_signal();
        drop(tracker);

        doc.move_pointer(5.0, 5.0);
        assert_eq!(position.get(), Point::ORIGIN);
    }

    #[test]
    fn test_handle_move_push_model() {
        let tracker = PointerTracker::detached();
        tracker.handle_move(Point::new(3.0, 4.0));
        assert_eq!(tracker.position(), Point::new(3.0, 4.0));
    }
}
