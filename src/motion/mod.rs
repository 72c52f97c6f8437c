//! Motion Module - Pose trees, timelines, and scheduling.
//!
//! - [`easing`] - CSS-compatible easing curves
//! - [`pose`] - Poses, transitions, and declarative pose nodes
//! - [`timeline`] - Deterministic interpretation of a pose tree
//! - [`scheduler`] - Frame-driven timers with owner scopes
//! - [`presets`] - Ready-made reveal patterns

pub mod easing;
pub mod pose;
pub mod presets;
pub mod scheduler;
pub mod timeline;

pub use easing::Ease;
pub use pose::{Pose, PoseNode, Property, Transition};
pub use scheduler::{Scheduler, ScopeId, TimerId};
pub use timeline::{NodeId, PoseTree, Segment, Timeline, drive_animation};
