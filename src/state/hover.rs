//! Hover Registry - interactive elements and the cursor mode they drive.
//!
//! Two ways in:
//!
//! - [`HoverRegistry::discover`] enumerates the elements rendered at
//!   initialization that match an [`Interactive`] filter. This runs once;
//!   elements inserted later are not picked up.
//! - [`HoverRegistry::register`] / [`HoverRegistry::unregister`] let an
//!   element add itself on mount and remove itself on unmount.
//!
//! The registry keeps one [`HoverEntry`] per element and a reactive count of
//! hovered entries. [`CursorMode`] is derived from that count on read.
//!
//! # Example
//!
//! ```
//! use spark_motion::host::{Document, ElementKind, Interactive};
//! use spark_motion::state::{CursorMode, HoverRegistry};
//! use spark_motion::types::Rect;
//!
//! let doc = Document::new(800.0, 600.0);
//! doc.insert(ElementKind::Button, Rect::new(0.0, 0.0, 100.0, 40.0));
//!
//! let registry = HoverRegistry::discover(&doc, Interactive::default());
//! doc.move_pointer(10.0, 10.0);
//! assert_eq!(registry.mode(), CursorMode::Hover);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{Signal, signal};
use tracing::debug;

use crate::host::{Host, HoverPhase, Interactive, ListenerId};
use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// Cursor visual mode, derived from hover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Default,
    Hover,
}

/// One registered interactive element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverEntry {
    pub element: ElementId,
    pub is_hovered: bool,
}

struct Registered {
    entry: HoverEntry,
    listener: ListenerId,
}

struct Entries {
    items: Vec<Registered>,
}

impl Entries {
    fn hovered_count(&self) -> usize {
        self.items.iter().filter(|r| r.entry.is_hovered).count()
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Registry of hover-tracked elements.
pub struct HoverRegistry {
    entries: Rc<RefCell<Entries>>,
    hovered: Signal<usize>,
    alive: Rc<Cell<bool>>,
}

impl HoverRegistry {
    /// An empty registry (push model only).
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Entries { items: Vec::new() })),
            hovered: signal(0),
            alive: Rc::new(Cell::new(true)),
        }
    }

    /// Register every currently rendered element matching `filter`.
    pub fn discover(host: &dyn Host, filter: Interactive) -> Self {
        let mut registry = Self::new();
        let mut count = 0;
        for info in host.query_elements() {
            if info.matches(filter) && registry.register(host, info.id) {
                count += 1;
            }
        }
        debug!(count, "hover registry discovered elements");
        registry
    }

    /// Attach hover listeners to one element.
    ///
    /// Returns false if the registry is torn down or the element is
    /// already registered.
    pub fn register(&mut self, host: &dyn Host, element: ElementId) -> bool {
        if !self.alive.get() || self.is_registered(element) {
            return false;
        }

        let entries = Rc::downgrade(&self.entries);
        let hovered = self.hovered.clone();
        let alive = self.alive.clone();
        let listener = host.add_hover_listener(
            element,
            Rc::new(move |phase| {
                if alive.get() {
                    apply_hover(&entries, &hovered, element, phase == HoverPhase::Enter);
                }
            }),
        );

        self.entries.borrow_mut().items.push(Registered {
            entry: HoverEntry {
                element,
                is_hovered: false,
            },
            listener,
        });
        true
    }

    /// Detach one element. A hovered element stops counting immediately.
    pub fn unregister(&mut self, host: &dyn Host, element: ElementId) -> bool {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let position = entries.items.iter().position(|r| r.entry.element == element);
            position.map(|i| entries.items.remove(i))
        };
        match removed {
            Some(registered) => {
                host.remove_listener(registered.listener);
                self.sync_count();
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, element: ElementId) -> bool {
        self.entries
            .borrow()
            .items
            .iter()
            .any(|r| r.entry.element == element)
    }

    /// Whether a registered element is hovered. Unregistered elements never are.
    pub fn is_hovered(&self, element: ElementId) -> bool {
        self.entries
            .borrow()
            .items
            .iter()
            .any(|r| r.entry.element == element && r.entry.is_hovered)
    }

    /// Snapshot of all entries in registration order.
    pub fn entries(&self) -> Vec<HoverEntry> {
        self.entries.borrow().items.iter().map(|r| r.entry).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries currently hovered.
    pub fn hovered_count(&self) -> usize {
        self.hovered.get()
    }

    /// Reactive hovered count.
    pub fn hovered_signal(&self) -> Signal<usize> {
        self.hovered.clone()
    }

    /// Hover iff at least one entry is hovered.
    pub fn mode(&self) -> CursorMode {
        if self.hovered_count() > 0 {
            CursorMode::Hover
        } else {
            CursorMode::Default
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Detach every listener. Nothing fires afterward.
    pub fn teardown(&mut self, host: &dyn Host) {
        self.alive.set(false);
        let drained: Vec<Registered> = self.entries.borrow_mut().items.drain(..).collect();
        for registered in &drained {
            host.remove_listener(registered.listener);
        }
        self.sync_count();
        debug!(detached = drained.len(), "hover registry torn down");
    }

    fn sync_count(&self) {
        let count = self.entries.borrow().hovered_count();
        if self.hovered.get() != count {
            self.hovered.set(count);
        }
    }
}

impl Default for HoverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HoverRegistry {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

/// Listener body: flip one entry, then publish the count if it changed.
fn apply_hover(
    entries: &Weak<RefCell<Entries>>,
    hovered: &Signal<usize>,
    element: ElementId,
    is_hovered: bool,
) {
    let Some(entries) = entries.upgrade() else {
        return;
    };
    let count = {
        let mut entries = entries.borrow_mut();
        let Some(registered) = entries
            .items
            .iter_mut()
            .find(|r| r.entry.element == element)
        else {
            return;
        };
        if registered.entry.is_hovered == is_hovered {
            return;
        }
        registered.entry.is_hovered = is_hovered;
        entries.hovered_count()
    };
    // Entries borrow released before notifying signal subscribers
    hovered.set(count);
}

// =============================================================================
// TESTS
// =============================================================================
