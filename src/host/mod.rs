//! Host Module - The boundary to the rendering environment.
//!
//! Everything the engine needs from the outside world goes through [`Host`]:
//! element geometry, the viewport, capability probes, and listener
//! subscription. The engine never reaches into the host any other way.
//!
//! - [`document`] - In-memory host with hit testing and listener registries
//! - [`terminal`] - crossterm event translation for terminal-backed hosts

pub mod document;
pub mod terminal;

use std::rc::Rc;

use bitflags::bitflags;

use crate::types::{ElementId, Point, Rect};

pub use document::Document;
pub use terminal::{HostEvent, TerminalScale, translate_event};

// =============================================================================
// ELEMENTS
// =============================================================================

/// Element tag as far as interactivity is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Link,
    Button,
    Input,
    TextArea,
    Select,
    Generic,
}

/// ARIA role relevant to interactivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Button,
    Link,
}

bitflags! {
    /// Categories of interactive element.
    ///
    /// Used both to describe an element and as the discovery filter for the
    /// hover registry. An element is interactive when its traits intersect
    /// the filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Interactive: u8 {
        const LINK = 1 << 0;
        const BUTTON = 1 << 1;
        const FORM_CONTROL = 1 << 2;
        const ROLE_BUTTON = 1 << 3;
        const ACTIONABLE = 1 << 4;
    }
}

impl Default for Interactive {
    fn default() -> Self {
        Self::all()
    }
}

/// What the host reports about an element at enumeration time.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInfo {
    pub id: ElementId,
    pub kind: ElementKind,
    pub role: Option<Role>,
    /// Explicitly flagged as actionable by the page author.
    pub actionable: bool,
}

impl ElementInfo {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            role: None,
            actionable: false,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn actionable(mut self) -> Self {
        self.actionable = true;
        self
    }

    /// Interactive categories this element belongs to.
    pub fn traits(&self) -> Interactive {
        let mut traits = match self.kind {
            ElementKind::Link => Interactive::LINK,
            ElementKind::Button => Interactive::BUTTON,
            ElementKind::Input | ElementKind::TextArea | ElementKind::Select => {
                Interactive::FORM_CONTROL
            }
            ElementKind::Generic => Interactive::empty(),
        };
        if self.role == Some(Role::Button) {
            traits |= Interactive::ROLE_BUTTON;
        }
        if self.actionable {
            traits |= Interactive::ACTIONABLE;
        }
        traits
    }

    /// Check the element against a discovery filter.
    pub fn matches(&self, filter: Interactive) -> bool {
        self.traits().intersects(filter)
    }
}

// =============================================================================
// LISTENERS
// =============================================================================

/// Hover notification phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPhase {
    Enter,
    Leave,
}

/// Listener for pointer-move notifications.
pub type PointerListener = Rc<dyn Fn(Point)>;

/// Listener for hover-enter/leave on a single element.
pub type HoverListener = Rc<dyn Fn(HoverPhase)>;

/// Subscription handle returned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

// =============================================================================
// HOST TRAIT
// =============================================================================

/// The host rendering environment.
///
/// All methods take `&self`; implementations use interior mutability for
/// their listener tables, the same way the engine's own registries do.
pub trait Host {
    /// Current viewport in page coordinates (scroll offset applied).
    fn viewport(&self) -> Rect;

    /// Whether viewport intersection can be detected at all.
    fn supports_intersection(&self) -> bool {
        true
    }

    /// Whether a fine pointer (mouse, trackpad) is available.
    fn has_fine_pointer(&self) -> bool {
        true
    }

    /// Page-coordinate bounds of an element, if it is rendered.
    fn element_rect(&self, id: ElementId) -> Option<Rect>;

    /// Enumerate currently rendered elements.
    fn query_elements(&self) -> Vec<ElementInfo>;

    /// Subscribe to pointer moves.
    fn add_pointer_listener(&self, listener: PointerListener) -> ListenerId;

    /// Subscribe to hover enter/leave on one element.
    fn add_hover_listener(&self, element: ElementId, listener: HoverListener) -> ListenerId;

    /// Detach a listener. Returns false if it was not attached.
    fn remove_listener(&self, id: ListenerId) -> bool;
}
