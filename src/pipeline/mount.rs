//! Mount API - the stage that owns every per-page piece.
//!
//! A [`Stage`] is created when the root mounts. It owns the interaction
//! context, the custom cursor, the scheduler and every mounted section, and
//! tears all of them down together.
//!
//! The host drives it once per animation frame with [`Stage::frame`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_motion::host::{Document, ElementKind};
//! use spark_motion::motion::{NodeId, Pose, presets};
//! use spark_motion::pipeline::{SectionSpec, Stage, StageConfig, Trigger};
//! use spark_motion::types::Rect;
//!
//! let doc = Document::new(1280.0, 800.0);
//! let hero = doc.insert(ElementKind::Generic, Rect::new(0.0, 0.0, 1280.0, 800.0));
//!
//! let mut stage = Stage::mount(&doc, StageConfig::default());
//! stage.mount_section(
//!     &doc,
//!     SectionSpec { trigger: Trigger::in_view_once(hero), tree: presets::hero() },
//!     |_node: NodeId, _pose: &Pose| {},
//! );
//!
//! let frame = stage.frame(&doc, Duration::from_millis(16));
//! assert!(frame.cursor.is_some());
//! stage.unmount(&doc);
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use super::section::{PoseSink, Section, SectionSpec, Trigger};
use crate::cursor::{CursorConfig, CursorFrame, CustomCursor};
use crate::host::{Host, Interactive};
use crate::motion::Scheduler;
use crate::observe::Crossing;
use crate::state::InteractionContext;
use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// Stage configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StageConfig {
    pub cursor: CursorConfig,
    /// Which elements hover discovery picks up at mount
    pub interactive: Interactive,
}

/// Handle to a mounted section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub u64);

/// Result of one [`Stage::frame`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageFrame {
    pub crossings: Vec<(SectionId, Crossing)>,
    /// Hover-triggered sections that flipped this frame
    pub hover_flips: Vec<SectionId>,
    pub timers_fired: usize,
    pub poses_written: usize,
    pub cursor: Option<CursorFrame>,
}

// =============================================================================
// STAGE
// =============================================================================

/// Root controller.
pub struct Stage {
    context: InteractionContext,
    cursor: CustomCursor,
    scheduler: Scheduler,
    sections: BTreeMap<SectionId, Section>,
    next_section: u64,
    mounted: bool,
}

impl Stage {
    /// Build the interaction context and mount the cursor.
    pub fn mount(host: &dyn Host, config: StageConfig) -> Self {
        let context = InteractionContext::mount(host, config.interactive);
        let cursor = CustomCursor::mount(host, config.cursor);
        debug!("stage mounted");
        Self {
            context,
            cursor,
            scheduler: Scheduler::new(),
            sections: BTreeMap::new(),
            next_section: 0,
            mounted: true,
        }
    }

    pub fn context(&self) -> &InteractionContext {
        &self.context
    }

    pub fn cursor(&self) -> &CustomCursor {
        &self.cursor
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Register an element mounted after the stage for hover tracking.
    pub fn register_hover(&mut self, host: &dyn Host, element: ElementId) -> bool {
        self.mounted && self.context.hover_mut().register(host, element)
    }

    pub fn unregister_hover(&mut self, host: &dyn Host, element: ElementId) -> bool {
        self.context.hover_mut().unregister(host, element)
    }

    /// Mount a section at the current stage time.
    ///
    /// A hover-triggered section registers its element for hover tracking
    /// if discovery did not already pick it up.
    pub fn mount_section<S>(&mut self, host: &dyn Host, spec: SectionSpec, sink: S) -> SectionId
    where
        S: PoseSink + 'static,
    {
        let id = SectionId(self.next_section);
        self.next_section += 1;
        if let Trigger::Hover(element) = spec.trigger {
            self.register_hover(host, element);
        }
        let section = Section::mount(host, &mut self.scheduler, spec, sink);
        self.sections.insert(id, section);
        id
    }

    /// Unmount one section. Returns false if it was not mounted.
    pub fn unmount_section(&mut self, id: SectionId) -> bool {
        match self.sections.remove(&id) {
            Some(mut section) => {
                section.unmount(&mut self.scheduler);
                true
            }
            None => false,
        }
    }

    /// Run one frame.
    ///
    /// Sections sync their triggers first, then due timers fire, then
    /// poses are written, and finally the cursor steps.
    pub fn frame(&mut self, host: &dyn Host, now: Duration) -> StageFrame {
        let mut frame = StageFrame::default();
        if !self.mounted {
            return frame;
        }
        let now = now.max(self.scheduler.now());

        for (&id, section) in self.sections.iter_mut() {
            if let Some(crossing) = section.sync(host, &mut self.scheduler, now) {
                frame.crossings.push((id, crossing));
            }
            if section.sync_hover(self.context.hover(), &mut self.scheduler, now) {
                frame.hover_flips.push(id);
            }
        }

        frame.timers_fired = self.scheduler.advance(now);

        for section in self.sections.values_mut() {
            frame.poses_written += section.frame(now);
        }

        frame.cursor = self.cursor.frame(&self.context, now);
        frame
    }

    /// Tear everything down. Idempotent.
    pub fn unmount(&mut self, host: &dyn Host) {
        if !self.mounted {
            return;
        }
        for (_, mut section) in std::mem::take(&mut self.sections) {
            section.unmount(&mut self.scheduler);
        }
        self.cursor.unmount();
        self.context.teardown(host);
        self.mounted = false;
        debug!("stage unmounted");
    }
}
