//! Poses and pose trees.
//!
//! A [`Pose`] is a sparse set of animatable property values. A [`PoseNode`]
//! declares a hidden and a visible pose plus how to move between them, and
//! how its children are sequenced. Trees are plain data: they never run
//! anything themselves. The [`timeline`](super::timeline) interprets them.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_motion::motion::{Ease, Pose, PoseNode, Transition};
//!
//! let item = PoseNode::new(Pose::new().opacity(0.0).y(50.0), Pose::new().opacity(1.0).y(0.0))
//!     .with_transition(Transition::new(Duration::from_millis(600), Ease::EaseOut));
//!
//! let container = PoseNode::new(Pose::new().opacity(0.0), Pose::new().opacity(1.0))
//!     .stagger_children(Duration::from_millis(200))
//!     .child(item.clone())
//!     .child(item);
//!
//! assert_eq!(container.children().len(), 2);
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use super::easing::Ease;
use crate::error::{Result, secs};

// =============================================================================
// PROPERTIES
// =============================================================================

/// Animatable style property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
    Rotate,
    /// Width as a percentage of the containing block
    Width,
}

impl Property {
    /// Value a property has when a pose leaves it unset.
    pub const fn identity(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            Property::X | Property::Y | Property::Rotate => 0.0,
            Property::Width => 100.0,
        }
    }
}

// =============================================================================
// POSE
// =============================================================================

/// A named set of target style values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    values: BTreeMap<Property, f32>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property (builder).
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.values.insert(property, value);
        self
    }

    pub fn opacity(self, value: f32) -> Self {
        self.with(Property::Opacity, value)
    }

    pub fn x(self, value: f32) -> Self {
        self.with(Property::X, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.with(Property::Y, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.with(Property::Scale, value)
    }

    pub fn rotate(self, value: f32) -> Self {
        self.with(Property::Rotate, value)
    }

    /// Width in percent of the container.
    pub fn width(self, percent: f32) -> Self {
        self.with(Property::Width, percent)
    }

    /// Read a property, falling back to its identity value.
    pub fn get(&self, property: Property) -> f32 {
        self.values
            .get(&property)
            .copied()
            .unwrap_or_else(|| property.identity())
    }

    /// Properties explicitly set on this pose.
    pub fn properties(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Interpolate toward `to` by `t` (already eased).
    ///
    /// The result carries every property set on either side.
    pub fn lerp(&self, to: &Pose, t: f32) -> Pose {
        let mut values = BTreeMap::new();
        for property in self.values.keys().chain(to.values.keys()) {
            let from = self.get(*property);
            let target = to.get(*property);
            // Weighted form keeps both endpoints exact
            values.insert(*property, from * (1.0 - t) + target * t);
        }
        Pose { values }
    }
}

// =============================================================================
// TRANSITION
// =============================================================================

/// Timing for one pose change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub ease: Ease,
    pub delay: Duration,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            ease: Ease::EaseOut,
            delay: Duration::ZERO,
        }
    }
}

impl Transition {
    pub fn new(duration: Duration, ease: Ease) -> Self {
        Self {
            duration,
            ease,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Transition from a duration in seconds.
    ///
    /// ```
    /// use spark_motion::motion::{Ease, Transition};
    ///
    /// let bar = Transition::from_secs(1.0, Ease::EaseOut)?.with_delay_secs(0.3)?;
    /// assert_eq!(bar.delay.as_millis(), 300);
    /// assert!(Transition::from_secs(-1.0, Ease::Linear).is_err());
    /// # Ok::<(), spark_motion::MotionError>(())
    /// ```
    pub fn from_secs(duration: f32, ease: Ease) -> Result<Self> {
        Ok(Self::new(secs(duration)?, ease))
    }

    pub fn with_delay_secs(self, delay: f32) -> Result<Self> {
        Ok(self.with_delay(secs(delay)?))
    }
}

// =============================================================================
// POSE NODE
// =============================================================================

/// Declarative animation node.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseNode {
    hidden: Pose,
    visible: Pose,
    transition: Transition,
    reverse: Option<Transition>,
    stagger_children: Duration,
    delay_children: Duration,
    children: Vec<PoseNode>,
}

impl PoseNode {
    pub fn new(hidden: Pose, visible: Pose) -> Self {
        Self {
            hidden,
            visible,
            transition: Transition::default(),
            reverse: None,
            stagger_children: Duration::ZERO,
            delay_children: Duration::ZERO,
            children: Vec::new(),
        }
    }

    /// A node with no poses of its own, used purely to sequence children.
    pub fn group() -> Self {
        Self::new(Pose::new(), Pose::new())
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Override the transition used when animating back to hidden.
    pub fn with_reverse(mut self, transition: Transition) -> Self {
        self.reverse = Some(transition);
        self
    }

    pub fn stagger_children(mut self, stagger: Duration) -> Self {
        self.stagger_children = stagger;
        self
    }

    pub fn delay_children(mut self, delay: Duration) -> Self {
        self.delay_children = delay;
        self
    }

    pub fn child(mut self, child: PoseNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children_from<I: IntoIterator<Item = PoseNode>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    pub fn hidden(&self) -> &Pose {
        &self.hidden
    }

    pub fn visible(&self) -> &Pose {
        &self.visible
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Transition toward hidden: the override if set, else the forward one.
    pub fn reverse_transition(&self) -> &Transition {
        self.reverse.as_ref().unwrap_or(&self.transition)
    }

    pub fn stagger(&self) -> Duration {
        self.stagger_children
    }

    pub fn children_delay(&self) -> Duration {
        self.delay_children
    }

    pub fn children(&self) -> &[PoseNode] {
        &self.children
    }

    /// Total node count including self.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(PoseNode::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MotionError;

    #[test]
    fn test_pose_identity_fallback() {
        let pose = Pose::new().y(20.0);
        assert_eq!(pose.get(Property::Y), 20.0);
        assert_eq!(pose.get(Property::Opacity), 1.0);
        assert_eq!(pose.get(Property::Scale), 1.0);
        assert_eq!(pose.get(Property::X), 0.0);
    }

    #[test]
    fn test_lerp_union_of_properties() {
        let from = Pose::new().opacity(0.0).y(50.0);
        let to = Pose::new().opacity(1.0).scale(2.0);

        let mid = from.lerp(&to, 0.5);
        assert_eq!(mid.get(Property::Opacity), 0.5);
        assert_eq!(mid.get(Property::Y), 25.0); // toward identity 0
        assert_eq!(mid.get(Property::Scale), 1.5); // from identity 1
        assert_eq!(mid.properties().count(), 3);
    }

    #[test]
    fn test_width_animates_in_percent() {
        let empty = Pose::new().width(0.0);
        let filled = Pose::new().width(85.0);
        assert_eq!(Pose::new().get(Property::Width), 100.0);
        assert_eq!(empty.lerp(&filled, 0.5).get(Property::Width), 42.5);
        assert_eq!(empty.lerp(&filled, 1.0).get(Property::Width), 85.0);
    }

    #[test]
    fn test_transition_from_secs() {
        let t = Transition::from_secs(0.8, Ease::EaseOut)
            .unwrap()
            .with_delay_secs(0.25)
            .unwrap();
        assert_eq!(t.duration, Duration::from_millis(800));
        assert_eq!(t.delay, Duration::from_millis(250));

        assert_eq!(
            Transition::from_secs(1.0e30, Ease::Linear),
            Err(MotionError::InvalidDuration(1.0e30))
        );
        assert!(Transition::new(Duration::ZERO, Ease::Linear).with_delay_secs(f32::NAN).is_err());
    }

    #[test]
    fn test_lerp_endpoints() {
        let from = Pose::new().opacity(0.0);
        let to = Pose::new().opacity(1.0);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert_eq!(from.lerp(&to, 1.0), to);
    }

    #[test]
    fn test_reverse_defaults_to_forward() {
        let forward = Transition::new(Duration::from_millis(800), Ease::EaseOut);
        let node = PoseNode::group().with_transition(forward);
        assert_eq!(node.reverse_transition(), &forward);

        let back = Transition::new(Duration::from_millis(200), Ease::Linear);
        let node = node.with_reverse(back);
        assert_eq!(node.reverse_transition(), &back);
    }

    #[test]
    fn test_len_counts_tree() {
        let leaf = PoseNode::group();
        let tree = PoseNode::group()
            .child(leaf.clone())
            .child(PoseNode::group().child(leaf.clone()).child(leaf));
        assert_eq!(tree.len(), 5);
    }
}
