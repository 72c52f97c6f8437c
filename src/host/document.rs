//! Document - In-memory host environment.
//!
//! A scrollable page of positioned elements with pointer and hover listener
//! registries. Used by tests, demos, and terminal-backed hosts (see
//! [`super::terminal`]).
//!
//! # Hover model
//!
//! An element is hovered while the pointer lies inside its rect. Overlapping
//! rects behave like nested elements: the pointer can be inside several at
//! once, and each gets its own enter/leave. Hover is re-evaluated on pointer
//! moves and on scroll, since scrolling moves content under a still pointer.
//!
//! Removing an element drops its listeners without firing leave, as a
//! browser does when a node is detached.
//!
//! # Example
//!
//! ```
//! use spark_motion::host::{Document, ElementKind, Host};
//! use spark_motion::types::Rect;
//!
//! let doc = Document::new(1280.0, 800.0);
//! let button = doc.insert(ElementKind::Button, Rect::new(100.0, 100.0, 120.0, 40.0));
//!
//! doc.scroll_to(50.0);
//! assert_eq!(doc.viewport().y, 50.0);
//! assert!(doc.element_rect(button).is_some());
//! ```

use std::cell::RefCell;

use tracing::trace;

use super::{
    ElementInfo, ElementKind, Host, HostEvent, HoverListener, HoverPhase, ListenerId,
    PointerListener,
};
use crate::types::{ElementId, Point, Rect};

// =============================================================================
// STATE
// =============================================================================

struct ElementRecord {
    info: ElementInfo,
    rect: Rect,
}

struct DocumentState {
    viewport: Rect,
    elements: Vec<ElementRecord>,
    pointer: Option<Point>,
    hovered: Vec<ElementId>,
    pointer_listeners: Vec<(ListenerId, PointerListener)>,
    hover_listeners: Vec<(ListenerId, ElementId, HoverListener)>,
    supports_intersection: bool,
    fine_pointer: bool,
    next_listener: u64,
    next_element: u32,
}

impl DocumentState {
    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    fn content_height(&self) -> f32 {
        self.elements
            .iter()
            .map(|e| e.rect.bottom())
            .fold(self.viewport.height, f32::max)
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport.height).max(0.0)
    }

    /// Elements under a client-space point, in insertion order.
    fn hit_all(&self, client: Point) -> Vec<ElementId> {
        let page = Point::new(client.x + self.viewport.x, client.y + self.viewport.y);
        self.elements
            .iter()
            .filter(|e| e.rect.contains(page))
            .map(|e| e.info.id)
            .collect()
    }
}

/// In-memory host document.
pub struct Document {
    state: RefCell<DocumentState>,
}

impl Document {
    /// Create an empty document with the given viewport size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            state: RefCell::new(DocumentState {
                viewport: Rect::new(0.0, 0.0, width, height),
                elements: Vec::new(),
                pointer: None,
                hovered: Vec::new(),
                pointer_listeners: Vec::new(),
                hover_listeners: Vec::new(),
                supports_intersection: true,
                fine_pointer: true,
                next_listener: 0,
                next_element: 0,
            }),
        }
    }

    /// Toggle intersection-detection support.
    pub fn set_intersection_support(&self, supported: bool) {
        self.state.borrow_mut().supports_intersection = supported;
    }

    /// Toggle fine-pointer availability (false = touch-only).
    pub fn set_fine_pointer(&self, fine: bool) {
        self.state.borrow_mut().fine_pointer = fine;
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    /// Insert an element at a page-coordinate rect.
    pub fn insert(&self, kind: ElementKind, rect: Rect) -> ElementId {
        self.insert_with(kind, rect, |info| info)
    }

    /// Insert an element, customizing its info (role, actionable flag).
    pub fn insert_with<F>(&self, kind: ElementKind, rect: Rect, customize: F) -> ElementId
    where
        F: FnOnce(ElementInfo) -> ElementInfo,
    {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = ElementId(state.next_element);
            state.next_element += 1;
            let info = customize(ElementInfo::new(id, kind));
            state.elements.push(ElementRecord { info, rect });
            id
        };
        self.refresh_hover();
        id
    }

    /// Remove an element and its hover listeners. No leave is fired.
    pub fn remove(&self, id: ElementId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.elements.len();
        state.elements.retain(|e| e.info.id != id);
        state.hover_listeners.retain(|(_, element, _)| *element != id);
        state.hovered.retain(|h| *h != id);
        state.elements.len() != before
    }

    /// Move or resize an element.
    pub fn set_rect(&self, id: ElementId, rect: Rect) -> bool {
        let found = {
            let mut state = self.state.borrow_mut();
            match state.elements.iter_mut().find(|e| e.info.id == id) {
                Some(record) => {
                    record.rect = rect;
                    true
                }
                None => false,
            }
        };
        if found {
            self.refresh_hover();
        }
        found
    }

    // -------------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------------

    /// Scroll to an absolute vertical offset, clamped to the content.
    pub fn scroll_to(&self, y: f32) {
        {
            let mut state = self.state.borrow_mut();
            let max = state.max_scroll();
            state.viewport.y = y.clamp(0.0, max);
        }
        self.refresh_hover();
    }

    /// Scroll by a vertical delta.
    pub fn scroll_by(&self, dy: f32) {
        let y = self.state.borrow().viewport.y;
        self.scroll_to(y + dy);
    }

    /// Resize the viewport, keeping the scroll offset in range.
    pub fn resize(&self, width: f32, height: f32) {
        {
            let mut state = self.state.borrow_mut();
            state.viewport.width = width.max(0.0);
            state.viewport.height = height.max(0.0);
            let max = state.max_scroll();
            state.viewport.y = state.viewport.y.min(max);
        }
        self.refresh_hover();
    }

    // -------------------------------------------------------------------------
    // Pointer dispatch
    // -------------------------------------------------------------------------

    /// Last pointer position in client coordinates.
    pub fn pointer(&self) -> Option<Point> {
        self.state.borrow().pointer
    }

    /// Move the pointer (client coordinates).
    ///
    /// Fires pointer listeners first, then hover leave/enter.
    pub fn move_pointer(&self, x: f32, y: f32) {
        let point = Point::new(x, y);
        let listeners: Vec<PointerListener> = {
            let mut state = self.state.borrow_mut();
            state.pointer = Some(point);
            state.pointer_listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        // Borrow released: listeners may call back into the document
        for listener in listeners {
            listener(point);
        }
        self.refresh_hover();
    }

    /// Apply a translated host event.
    pub fn apply(&self, event: HostEvent) {
        match event {
            HostEvent::PointerMove(point) => self.move_pointer(point.x, point.y),
            HostEvent::Scroll { dy } => self.scroll_by(dy),
            HostEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Recompute hovered elements and fire enter/leave for changes.
    fn refresh_hover(&self) {
        let (left, entered) = {
            let mut state = self.state.borrow_mut();
            let Some(pointer) = state.pointer else {
                return;
            };
            let now = state.hit_all(pointer);
            let left: Vec<ElementId> = state
                .hovered
                .iter()
                .copied()
                .filter(|id| !now.contains(id))
                .collect();
            let entered: Vec<ElementId> = now
                .iter()
                .copied()
                .filter(|id| !state.hovered.contains(id))
                .collect();
            state.hovered = now;
            (left, entered)
        };

        for id in left {
            self.fire_hover(id, HoverPhase::Leave);
        }
        for id in entered {
            self.fire_hover(id, HoverPhase::Enter);
        }
    }

    fn fire_hover(&self, element: ElementId, phase: HoverPhase) {
        let listeners: Vec<HoverListener> = {
            let state = self.state.borrow();
            state
                .hover_listeners
                .iter()
                .filter(|(_, el, _)| *el == element)
                .map(|(_, _, l)| l.clone())
                .collect()
        };
        trace!(%element, ?phase, count = listeners.len(), "hover dispatch");
        for listener in listeners {
            listener(phase);
        }
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    /// Total number of attached listeners (pointer + hover).
    pub fn listener_count(&self) -> usize {
        let state = self.state.borrow();
        state.pointer_listeners.len() + state.hover_listeners.len()
    }

    /// Elements currently under the pointer.
    pub fn hovered(&self) -> Vec<ElementId> {
        self.state.borrow().hovered.clone()
    }
}

// =============================================================================
// HOST IMPL
// =============================================================================

impl Host for Document {
    fn viewport(&self) -> Rect {
        self.state.borrow().viewport
    }

    fn supports_intersection(&self) -> bool {
        self.state.borrow().supports_intersection
    }

    fn has_fine_pointer(&self) -> bool {
        self.state.borrow().fine_pointer
    }

    fn element_rect(&self, id: ElementId) -> Option<Rect> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|e| e.info.id == id)
            .map(|e| e.rect)
    }

    fn query_elements(&self) -> Vec<ElementInfo> {
        let state = self.state.borrow();
        state.elements.iter().map(|e| e.info.clone()).collect()
    }

    fn add_pointer_listener(&self, listener: PointerListener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener_id();
        state.pointer_listeners.push((id, listener));
        id
    }

    fn add_hover_listener(&self, element: ElementId, listener: HoverListener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener_id();
        state.hover_listeners.push((id, element, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.pointer_listeners.len() + state.hover_listeners.len();
        state.pointer_listeners.retain(|(lid, _)| *lid != id);
        state.hover_listeners.retain(|(lid, _, _)| *lid != id);
        state.pointer_listeners.len() + state.hover_listeners.len() != before
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() -> Document {
        Document::new(1000.0, 800.0)
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let doc = setup();
        doc.insert(ElementKind::Generic, Rect::new(0.0, 0.0, 1000.0, 2000.0));

        doc.scroll_to(5000.0);
        assert_eq!(doc.viewport().y, 1200.0);

        doc.scroll_by(-5000.0);
        assert_eq!(doc.viewport().y, 0.0);
    }

    #[test]
    fn test_pointer_listener_receives_moves() {
        let doc = setup();
        let last = Rc::new(Cell::new(Point::ORIGIN));
        let last_clone = last.clone();

        let id = doc.add_pointer_listener(Rc::new(move |p| last_clone.set(p)));
        doc.move_pointer(10.0, 20.0);
        assert_eq!(last.get(), Point::new(10.0, 20.0));

        assert!(doc.remove_listener(id));
        doc.move_pointer(30.0, 40.0);
        assert_eq!(last.get(), Point::new(10.0, 20.0));
        assert!(!doc.remove_listener(id));
    }

    #[test]
    fn test_hover_enter_leave() {
        let doc = setup();
        let button = doc.insert(ElementKind::Button, Rect::new(100.0, 100.0, 50.0, 50.0));

        let enters = Rc::new(Cell::new(0));
        let leaves = Rc::new(Cell::new(0));
        let (e, l) = (enters.clone(), leaves.clone());
        doc.add_hover_listener(
            button,
            Rc::new(move |phase| match phase {
                HoverPhase::Enter => e.set(e.get() + 1),
                HoverPhase::Leave => l.set(l.get() + 1),
            }),
        );

        doc.move_pointer(0.0, 0.0);
        assert_eq!((enters.get(), leaves.get()), (0, 0));

        doc.move_pointer(120.0, 120.0);
        assert_eq!((enters.get(), leaves.get()), (1, 0));

        // Moving within the element does not re-enter
        doc.move_pointer(125.0, 125.0);
        assert_eq!((enters.get(), leaves.get()), (1, 0));

        doc.move_pointer(300.0, 300.0);
        assert_eq!((enters.get(), leaves.get()), (1, 1));
    }

    #[test]
    fn test_scroll_moves_content_under_pointer() {
        let doc = setup();
        doc.insert(ElementKind::Generic, Rect::new(0.0, 0.0, 1000.0, 3000.0));
        let link = doc.insert(ElementKind::Link, Rect::new(0.0, 500.0, 200.0, 50.0));

        doc.move_pointer(10.0, 110.0);
        assert!(!doc.hovered().contains(&link));

        // Page y = 110 + 400 = 510 is inside the link
        doc.scroll_to(400.0);
        assert!(doc.hovered().contains(&link));
    }

    #[test]
    fn test_nested_rects_both_hovered() {
        let doc = setup();
        let outer = doc.insert(ElementKind::Generic, Rect::new(0.0, 0.0, 500.0, 500.0));
        let inner = doc.insert(ElementKind::Button, Rect::new(10.0, 10.0, 50.0, 50.0));

        doc.move_pointer(20.0, 20.0);
        assert_eq!(doc.hovered(), vec![outer, inner]);
    }

    #[test]
    fn test_remove_element_drops_listeners() {
        let doc = setup();
        let button = doc.insert(ElementKind::Button, Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.add_hover_listener(button, Rc::new(|_| {}));
        assert_eq!(doc.listener_count(), 1);

        assert!(doc.remove(button));
        assert_eq!(doc.listener_count(), 0);
        assert!(doc.element_rect(button).is_none());
    }

    #[test]
    fn test_apply_host_events() {
        let doc = setup();
        doc.insert(ElementKind::Generic, Rect::new(0.0, 0.0, 1000.0, 3000.0));

        doc.apply(HostEvent::Scroll { dy: 120.0 });
        assert_eq!(doc.viewport().y, 120.0);

        doc.apply(HostEvent::PointerMove(Point::new(5.0, 6.0)));
        assert_eq!(doc.pointer(), Some(Point::new(5.0, 6.0)));

        doc.apply(HostEvent::Resize { width: 640.0, height: 480.0 });
        assert_eq!(doc.viewport().width, 640.0);
    }

    #[test]
    fn test_listener_may_reenter_document() {
        let doc = Rc::new(setup());
        let doc_clone = doc.clone();
        let id_cell = Rc::new(Cell::new(None));
        let id_clone = id_cell.clone();

        // Listener removes itself on first call
        let id = doc.add_pointer_listener(Rc::new(move |_| {
            if let Some(id) = id_clone.get() {
                doc_clone.remove_listener(id);
            }
        }));
        id_cell.set(Some(id));

        doc.move_pointer(1.0, 1.0);
        assert_eq!(doc.listener_count(), 0);
    }
}
