//! Interaction Context - owner of pointer and hover state.
//!
//! Created when the root mounts and torn down when it unmounts. Consumers
//! (the cursor renderer, sections that want hover state) receive it by
//! reference; nothing reaches for ambient globals.

use tracing::debug;

use super::hover::{CursorMode, HoverRegistry};
use super::pointer::PointerTracker;
use crate::host::{Host, Interactive};
use crate::types::Point;

/// Pointer and hover state for one mounted root.
pub struct InteractionContext {
    pointer: PointerTracker,
    hover: HoverRegistry,
    mounted: bool,
}

impl InteractionContext {
    /// Attach to the host and discover interactive elements.
    pub fn mount(host: &dyn Host, filter: Interactive) -> Self {
        let pointer = PointerTracker::attach(host);
        let hover = HoverRegistry::discover(host, filter);
        debug!(registered = hover.len(), "interaction context mounted");
        Self {
            pointer,
            hover,
            mounted: true,
        }
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn hover(&self) -> &HoverRegistry {
        &self.hover
    }

    /// Mutable access for push-model registration.
    pub fn hover_mut(&mut self) -> &mut HoverRegistry {
        &mut self.hover
    }

    /// Latest pointer position.
    pub fn pointer_position(&self) -> Point {
        self.pointer.position()
    }

    /// Current cursor mode.
    pub fn mode(&self) -> CursorMode {
        self.hover.mode()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Detach all listeners from the host. Idempotent.
    pub fn teardown(&mut self, host: &dyn Host) {
        if !self.mounted {
            return;
        }
        self.pointer.detach(host);
        self.hover.teardown(host);
        self.mounted = false;
        debug!("interaction context torn down");
    }
}
