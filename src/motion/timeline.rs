//! Timeline - deterministic interpretation of a pose tree.
//!
//! A [`PoseTree`] is a [`PoseNode`] flattened in pre-order, with every
//! node's start offset (relative to a signal flip) precomputed:
//!
//! ```text
//! start(root)    = root.delay
//! start(child_i) = start(parent) + parent.delay_children
//!                  + i * parent.stagger_children + child.delay
//! ```
//!
//! A [`Timeline`] folds a history of signal flips into one [`Segment`] per
//! node. Each flip snapshots the node's pose at that instant and heads for
//! the new target, so the end state always follows the latest signal and
//! the pose at any instant depends only on the flip history and `now`.

use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use super::pose::{Pose, PoseNode, Transition};

/// Pre-order index of a node within its [`PoseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

// =============================================================================
// COMPILED TREE
// =============================================================================

#[derive(Debug, Clone)]
struct CompiledNode {
    hidden: Pose,
    visible: Pose,
    forward: Transition,
    reverse: Transition,
    parent: Option<NodeId>,
    depth: usize,
    /// Start offset from a flip to visible.
    enter_offset: Duration,
    /// Start offset from a flip to hidden.
    exit_offset: Duration,
}

/// Immutable, flattened pose tree.
#[derive(Debug, Clone)]
pub struct PoseTree {
    nodes: Vec<CompiledNode>,
}

impl PoseTree {
    /// Flatten a node tree and precompute start offsets.
    pub fn compile(root: &PoseNode) -> Self {
        let mut nodes = Vec::with_capacity(root.len());
        compile_node(
            root,
            None,
            0,
            root.transition().delay,
            root.reverse_transition().delay,
            &mut nodes,
        );
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes.get(id.0).map(|n| n.depth).unwrap_or(0)
    }

    /// Start offset of a node after a flip in the given direction.
    pub fn offset(&self, id: NodeId, visible: bool) -> Duration {
        self.nodes
            .get(id.0)
            .map(|n| if visible { n.enter_offset } else { n.exit_offset })
            .unwrap_or_default()
    }

    /// Target pose of a node for a signal value.
    pub fn target(&self, id: NodeId, visible: bool) -> Option<&Pose> {
        self.nodes
            .get(id.0)
            .map(|n| if visible { &n.visible } else { &n.hidden })
    }

    fn transition(&self, id: NodeId, visible: bool) -> Transition {
        self.nodes
            .get(id.0)
            .map(|n| if visible { n.forward } else { n.reverse })
            .unwrap_or_default()
    }
}

fn compile_node(
    node: &PoseNode,
    parent: Option<NodeId>,
    depth: usize,
    enter_offset: Duration,
    exit_offset: Duration,
    out: &mut Vec<CompiledNode>,
) {
    let id = NodeId(out.len());
    out.push(CompiledNode {
        hidden: node.hidden().clone(),
        visible: node.visible().clone(),
        forward: *node.transition(),
        reverse: *node.reverse_transition(),
        parent,
        depth,
        enter_offset,
        exit_offset,
    });

    for (index, child) in node.children().iter().enumerate() {
        let sequence = node.children_delay() + node.stagger() * index as u32;
        compile_node(
            child,
            Some(id),
            depth + 1,
            enter_offset + sequence + child.transition().delay,
            exit_offset + sequence + child.reverse_transition().delay,
            out,
        );
    }
}

// =============================================================================
// SEGMENT
// =============================================================================

/// One node's active interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Pose,
    pub to: Pose,
    /// Absolute start time.
    pub start: Duration,
    pub transition: Transition,
}

impl Segment {
    fn resting(pose: Pose) -> Self {
        Self {
            from: pose.clone(),
            to: pose,
            start: Duration::ZERO,
            transition: Transition::new(Duration::ZERO, Default::default()),
        }
    }

    pub fn end(&self) -> Duration {
        self.start + self.transition.duration
    }

    /// Linear progress at `now`, 0..=1.
    pub fn progress(&self, now: Duration) -> f32 {
        if now < self.start {
            return 0.0;
        }
        let duration = self.transition.duration;
        if duration.is_zero() {
            return 1.0;
        }
        ((now - self.start).as_secs_f32() / duration.as_secs_f32()).min(1.0)
    }

    pub fn sample(&self, now: Duration) -> Pose {
        let eased = self.transition.ease.apply(self.progress(now));
        self.from.lerp(&self.to, eased)
    }
}

// =============================================================================
// TIMELINE
// =============================================================================

/// Incremental interpreter for one pose tree.
#[derive(Debug, Clone)]
pub struct Timeline {
    tree: Rc<PoseTree>,
    segments: Vec<Segment>,
    signal: bool,
    last_flip: Option<Duration>,
}

impl Timeline {
    /// All nodes rest at their hidden pose.
    pub fn new(tree: Rc<PoseTree>) -> Self {
        let segments = tree
            .nodes
            .iter()
            .map(|n| Segment::resting(n.hidden.clone()))
            .collect();
        Self {
            tree,
            segments,
            signal: false,
            last_flip: None,
        }
    }

    pub fn tree(&self) -> &Rc<PoseTree> {
        &self.tree
    }

    /// Current drive signal.
    pub fn signal(&self) -> bool {
        self.signal
    }

    pub fn last_flip(&self) -> Option<Duration> {
        self.last_flip
    }

    /// Apply the drive signal at time `at`.
    ///
    /// Returns false if the signal did not change. A flip earlier than the
    /// previous one is clamped to it.
    pub fn drive(&mut self, visible: bool, at: Duration) -> bool {
        if visible == self.signal {
            return false;
        }
        let at = self.last_flip.map_or(at, |last| at.max(last));

        for id in self.tree.ids() {
            let current = self.segments[id.0].sample(at);
            let Some(target) = self.tree.target(id, visible) else {
                continue;
            };
            self.segments[id.0] = Segment {
                from: current,
                to: target.clone(),
                start: at + self.tree.offset(id, visible),
                transition: self.tree.transition(id, visible),
            };
        }

        debug!(visible, at_ms = at.as_millis() as u64, nodes = self.tree.len(), "timeline flip");
        self.signal = visible;
        self.last_flip = Some(at);
        true
    }

    pub fn segment(&self, id: NodeId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Absolute start time of a node's current segment.
    pub fn start_of(&self, id: NodeId) -> Option<Duration> {
        self.segments.get(id.0).map(|s| s.start)
    }

    /// Pose of one node at `now`.
    pub fn node_pose(&self, id: NodeId, now: Duration) -> Option<Pose> {
        self.segments.get(id.0).map(|s| s.sample(now))
    }

    /// Pose of every node at `now`, in pre-order.
    pub fn sample(&self, now: Duration) -> Vec<Pose> {
        self.segments.iter().map(|s| s.sample(now)).collect()
    }

    /// Whether a node has reached its current target.
    pub fn is_settled(&self, id: NodeId, now: Duration) -> bool {
        self.segments.get(id.0).is_none_or(|s| now >= s.end())
    }

    /// Whether every node has reached its target.
    pub fn is_complete(&self, now: Duration) -> bool {
        self.tree.ids().all(|id| self.is_settled(id, now))
    }
}

/// Pose of every node for a flip history, sampled at `now`.
///
/// `flips` are `(time, visible)` pairs in the order they occurred. The
/// signal starts false, so a leading `false` flip is a no-op.
pub fn drive_animation(
    tree: &Rc<PoseTree>,
    flips: &[(Duration, bool)],
    now: Duration,
) -> Vec<Pose> {
    let mut timeline = Timeline::new(tree.clone());
    for &(at, visible) in flips {
        if at > now {
            break;
        }
        timeline.drive(visible, at);
    }
    timeline.sample(now)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::easing::Ease;
    use crate::motion::pose::Property;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn item(duration_ms: u64) -> PoseNode {
        PoseNode::new(Pose::new().opacity(0.0).y(20.0), Pose::new().opacity(1.0).y(0.0))
            .with_transition(Transition::new(ms(duration_ms), Ease::Linear))
    }

    /// Container with stagger 200ms, delayChildren 300ms and 3 children.
    fn setup() -> Rc<PoseTree> {
        let root = PoseNode::new(Pose::new().opacity(0.0), Pose::new().opacity(1.0))
            .with_transition(Transition::new(ms(500), Ease::Linear))
            .stagger_children(ms(200))
            .delay_children(ms(300))
            .child(item(800))
            .child(item(800))
            .child(item(800));
        Rc::new(PoseTree::compile(&root))
    }

    #[test]
    fn test_compile_preorder() {
        let nested = PoseNode::group()
            .child(PoseNode::group().child(PoseNode::group()))
            .child(PoseNode::group());
        let tree = PoseTree::compile(&nested);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.parent(NodeId(0)), None);
        assert_eq!(tree.parent(NodeId(1)), Some(NodeId(0)));
        assert_eq!(tree.parent(NodeId(2)), Some(NodeId(1)));
        assert_eq!(tree.parent(NodeId(3)), Some(NodeId(0)));
        assert_eq!(tree.depth(NodeId(2)), 2);
    }

    #[test]
    fn test_stagger_start_times() {
        let tree = setup();
        let mut timeline = Timeline::new(tree);
        timeline.drive(true, ms(1000));

        assert_eq!(timeline.start_of(NodeId(0)), Some(ms(1000)));
        assert_eq!(timeline.start_of(NodeId(1)), Some(ms(1300)));
        assert_eq!(timeline.start_of(NodeId(2)), Some(ms(1500)));
        assert_eq!(timeline.start_of(NodeId(3)), Some(ms(1700)));
    }

    #[test]
    fn test_nested_offsets_accumulate() {
        let inner = PoseNode::group()
            .with_transition(Transition::default().with_delay(ms(50)))
            .stagger_children(ms(100))
            .child(PoseNode::group())
            .child(PoseNode::group());
        let root = PoseNode::group().delay_children(ms(300)).child(inner);
        let tree = PoseTree::compile(&root);

        assert_eq!(tree.offset(NodeId(1), true), ms(350));
        assert_eq!(tree.offset(NodeId(2), true), ms(350));
        assert_eq!(tree.offset(NodeId(3), true), ms(450));
    }

    #[test]
    fn test_pose_before_start_is_hidden() {
        let tree = setup();
        let poses = drive_animation(&tree, &[(ms(0), true)], ms(250));

        // Root is halfway, children have not started
        assert!((poses[0].get(Property::Opacity) - 0.5).abs() < 1e-4);
        assert_eq!(poses[1].get(Property::Opacity), 0.0);
        assert_eq!(poses[3].get(Property::Y), 20.0);
    }

    #[test]
    fn test_forward_completes() {
        let tree = setup();
        let mut timeline = Timeline::new(tree);
        timeline.drive(true, ms(0));

        assert!(!timeline.is_complete(ms(1400)));
        assert!(timeline.is_complete(ms(1500)));
        for pose in timeline.sample(ms(1500)) {
            assert_eq!(pose.get(Property::Opacity), 1.0);
        }
    }

    #[test]
    fn test_reverse_is_symmetric() {
        let tree = setup();
        let mut timeline = Timeline::new(tree);
        timeline.drive(true, ms(0));
        timeline.drive(false, ms(2000));

        // Same offsets and duration, heading back to hidden
        assert_eq!(timeline.start_of(NodeId(1)), Some(ms(2300)));
        let pose = timeline.node_pose(NodeId(1), ms(2700)).unwrap();
        assert!((pose.get(Property::Opacity) - 0.5).abs() < 1e-4);
        assert!((pose.get(Property::Y) - 10.0).abs() < 1e-3);

        assert!(timeline.is_complete(ms(3500)));
        assert_eq!(timeline.sample(ms(3500))[3].get(Property::Opacity), 0.0);
    }

    #[test]
    fn test_reverse_override() {
        let root = item(800).with_reverse(Transition::new(ms(100), Ease::Linear));
        let tree = Rc::new(PoseTree::compile(&root));
        let mut timeline = Timeline::new(tree);
        timeline.drive(true, ms(0));
        timeline.drive(false, ms(1000));

        assert!(timeline.is_settled(NodeId(0), ms(1100)));
    }

    #[test]
    fn test_mid_flight_flip_continues_from_current() {
        let tree = setup();
        let mut timeline = Timeline::new(tree);
        timeline.drive(true, ms(0));
        timeline.drive(false, ms(250));

        // Root was at 0.5 when the flip happened; it starts back from there
        let segment = timeline.segment(NodeId(0)).unwrap();
        assert!((segment.from.get(Property::Opacity) - 0.5).abs() < 1e-4);

        // End state tracks the latest signal
        let end = timeline.sample(ms(5000));
        assert!(end.iter().all(|p| p.get(Property::Opacity) == 0.0));
    }

    #[test]
    fn test_redundant_and_stale_flips() {
        let tree = setup();
        let mut timeline = Timeline::new(tree);
        assert!(!timeline.drive(false, ms(0)));
        assert!(timeline.drive(true, ms(500)));
        assert!(!timeline.drive(true, ms(600)));

        // Earlier timestamp clamps to the previous flip
        assert!(timeline.drive(false, ms(100)));
        assert_eq!(timeline.last_flip(), Some(ms(500)));
    }

    #[test]
    fn test_drive_animation_deterministic() {
        let tree = setup();
        let flips = [(ms(0), true), (ms(400), false), (ms(900), true)];
        let a = drive_animation(&tree, &flips, ms(1234));
        let b = drive_animation(&tree, &flips, ms(1234));
        assert_eq!(a, b);
    }

    #[test]
    fn test_drive_animation_ignores_future_flips() {
        let tree = setup();
        let poses = drive_animation(&tree, &[(ms(100), true)], ms(50));
        assert!(poses.iter().all(|p| p.get(Property::Opacity) == 0.0));
    }
}
