//! Section - one scroll-revealed block.
//!
//! A section owns one timeline and the trigger that drives it: a visibility
//! observer, the hover state of one element, or nothing for sections that
//! animate on mount. Each frame it:
//!
//! 1. re-syncs its trigger and flips the timeline on a change
//! 2. lets scheduler timers mark nodes as started
//! 3. writes the pose of every started, unfinished node to its sink
//!
//! Start timers live in the section's scheduler scope and capture only a
//! weak reference to the section state. Unmounting closes the scope, so
//! no pose is written for the section after teardown.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

use crate::host::Host;
use crate::motion::{NodeId, Pose, PoseNode, PoseTree, Scheduler, ScopeId, TimerId, Timeline};
use crate::observe::{Crossing, ObserveOptions, VisibilityObserver, observe_visibility};
use crate::state::HoverRegistry;
use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// What drives a section's timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Follow the visibility of an element.
    InView {
        target: ElementId,
        options: ObserveOptions,
    },
    /// Follow the hover state of an element: visible while hovered.
    ///
    /// The element must be registered with the [`HoverRegistry`] passed to
    /// [`Section::sync_hover`]; the stage does this on mount.
    Hover(ElementId),
    /// Reveal as soon as the section mounts.
    Immediate,
}

impl Trigger {
    /// Reveal once when `target` scrolls into view.
    pub fn in_view_once(target: ElementId) -> Self {
        Trigger::InView {
            target,
            options: ObserveOptions::once(),
        }
    }
}

/// Declaration of a section: trigger plus pose tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    pub trigger: Trigger,
    pub tree: PoseNode,
}

/// Destination for animated node poses.
pub trait PoseSink {
    fn apply(&mut self, node: NodeId, pose: &Pose);
}

impl<F> PoseSink for F
where
    F: FnMut(NodeId, &Pose),
{
    fn apply(&mut self, node: NodeId, pose: &Pose) {
        self(node, pose)
    }
}

struct SectionState {
    timeline: Timeline,
    /// Start timer fired for the current flip
    started: Vec<bool>,
    /// Final pose of the current flip already written
    finished: Vec<bool>,
    sink: Box<dyn PoseSink>,
    writes: usize,
    live: bool,
}

impl SectionState {
    fn write(&mut self, node: NodeId, pose: &Pose) {
        self.sink.apply(node, pose);
        self.writes += 1;
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// A mounted section.
pub struct Section {
    state: Rc<RefCell<SectionState>>,
    observer: Option<VisibilityObserver>,
    hover_target: Option<ElementId>,
    scope: ScopeId,
    pending: Vec<TimerId>,
}

impl Section {
    /// Mount a section at the scheduler's current time.
    ///
    /// Every node is written once with its hidden pose. An `Immediate`
    /// trigger, or a target already in view, flips to visible right away.
    /// A hover trigger starts hidden.
    pub fn mount<S>(
        host: &dyn Host,
        scheduler: &mut Scheduler,
        spec: SectionSpec,
        sink: S,
    ) -> Self
    where
        S: PoseSink + 'static,
    {
        let tree = Rc::new(PoseTree::compile(&spec.tree));
        let nodes = tree.len();
        let timeline = Timeline::new(tree.clone());

        let mut state = SectionState {
            timeline,
            started: vec![false; nodes],
            finished: vec![false; nodes],
            sink: Box::new(sink),
            writes: 0,
            live: true,
        };
        for id in tree.ids() {
            if let Some(hidden) = tree.target(id, false) {
                state.write(id, hidden);
            }
        }

        let (observer, hover_target) = match &spec.trigger {
            Trigger::InView { target, options } => {
                (Some(observe_visibility(host, *target, *options)), None)
            }
            Trigger::Hover(element) => (None, Some(*element)),
            Trigger::Immediate => (None, None),
        };

        let mut section = Self {
            state: Rc::new(RefCell::new(state)),
            observer,
            hover_target,
            scope: scheduler.open_scope(),
            pending: Vec::new(),
        };
        debug!(nodes, trigger = ?spec.trigger, "section mounted");

        let visible = match (&section.observer, section.hover_target) {
            (Some(observer), _) => observer.is_visible(),
            (None, Some(_)) => false,
            (None, None) => true,
        };
        if visible {
            let now = scheduler.now();
            section.flip(scheduler, true, now);
        }
        section
    }

    /// Re-test visibility and flip the timeline if it changed.
    pub fn sync(
        &mut self,
        host: &dyn Host,
        scheduler: &mut Scheduler,
        now: Duration,
    ) -> Option<Crossing> {
        if !self.is_mounted() {
            return None;
        }
        let observer = self.observer.as_mut()?;
        let crossing = observer.sync(host);
        let visible = observer.is_visible();

        if visible != self.state.borrow().timeline.signal() {
            self.flip(scheduler, visible, now);
        }
        crossing
    }

    /// Follow the hover state of the trigger element.
    ///
    /// Returns true if the timeline flipped. No-op for other triggers.
    pub fn sync_hover(
        &mut self,
        hover: &HoverRegistry,
        scheduler: &mut Scheduler,
        now: Duration,
    ) -> bool {
        let Some(element) = self.hover_target else {
            return false;
        };
        let hovered = hover.is_hovered(element);
        if hovered == self.is_visible() {
            return false;
        }
        self.flip(scheduler, hovered, now)
    }

    /// Element whose hover state drives this section, if any.
    pub fn hover_target(&self) -> Option<ElementId> {
        self.hover_target
    }

    /// Drive the timeline to `visible` at `at` and schedule node starts.
    ///
    /// Pending starts from the previous flip are cancelled first.
    pub fn flip(&mut self, scheduler: &mut Scheduler, visible: bool, at: Duration) -> bool {
        if !self.is_mounted() {
            return false;
        }
        for id in self.pending.drain(..) {
            scheduler.cancel(id);
        }

        let starts: Vec<(NodeId, Duration)> = {
            let mut state = self.state.borrow_mut();
            if !state.timeline.drive(visible, at) {
                return false;
            }
            state.started.iter_mut().for_each(|s| *s = false);
            state.finished.iter_mut().for_each(|f| *f = false);
            state
                .timeline
                .tree()
                .ids()
                .filter_map(|id| state.timeline.start_of(id).map(|start| (id, start)))
                .collect()
        };

        for (id, start) in starts {
            let weak: Weak<RefCell<SectionState>> = Rc::downgrade(&self.state);
            let timer = scheduler.schedule(self.scope, start, move |_| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let mut state = state.borrow_mut();
                if state.live {
                    state.started[id.0] = true;
                }
            });
            if let Some(timer) = timer {
                self.pending.push(timer);
            }
        }
        true
    }

    /// Write poses for started, unfinished nodes at `now`.
    ///
    /// Returns the number of poses written.
    pub fn frame(&mut self, now: Duration) -> usize {
        let mut state = self.state.borrow_mut();
        if !state.live {
            return 0;
        }
        let mut written = 0;
        let ids: Vec<NodeId> = state.timeline.tree().ids().collect();
        for id in ids {
            if !state.started[id.0] || state.finished[id.0] {
                continue;
            }
            let Some(pose) = state.timeline.node_pose(id, now) else {
                continue;
            };
            state.write(id, &pose);
            written += 1;
            if state.timeline.is_settled(id, now) {
                state.finished[id.0] = true;
            }
        }
        written
    }

    /// Whether every node has been written at its final pose.
    pub fn is_idle(&self) -> bool {
        self.state.borrow().finished.iter().all(|f| *f)
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().timeline.signal()
    }

    pub fn observer(&self) -> Option<&VisibilityObserver> {
        self.observer.as_ref()
    }

    /// Sampled pose of one node, independent of what has been written.
    pub fn pose(&self, node: NodeId, now: Duration) -> Option<Pose> {
        self.state.borrow().timeline.node_pose(node, now)
    }

    pub fn node_count(&self) -> usize {
        self.state.borrow().timeline.tree().len()
    }

    /// Total poses handed to the sink, including the initial hidden writes.
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().live
    }

    /// Cancel pending starts, disconnect the observer and stop writing.
    pub fn unmount(&mut self, scheduler: &mut Scheduler) {
        if !self.is_mounted() {
            return;
        }
        self.state.borrow_mut().live = false;
        let cancelled = scheduler.close_scope(self.scope);
        self.pending.clear();
        if let Some(observer) = self.observer.as_mut() {
            observer.disconnect();
        }
        debug!(cancelled, "section unmounted");
    }
}
