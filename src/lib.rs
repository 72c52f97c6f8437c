//! # spark-motion
//!
//! Scroll-reveal animation and custom cursor engine.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained
//! reactivity.
//!
//! ## Architecture
//!
//! Everything runs on one thread and is driven by the host's frame
//! callback. The host is abstracted behind the [`host::Host`] trait; an
//! in-memory [`host::Document`] and a crossterm event adapter are included.
//!
//! ```text
//! scroll/resize → VisibilityObserver → Timeline flip → Scheduler → PoseSink
//! pointer/hover → PointerTracker + HoverRegistry → CustomCursor → CursorFrame
//! ```
//!
//! Pose trees are plain data ([`motion::PoseNode`]) compiled once and
//! interpreted by [`motion::drive_animation`] / [`motion::Timeline`]. Pointer
//! and hover state live in an explicit [`state::InteractionContext`] owned by
//! the [`pipeline::Stage`], not in globals.
//!
//! ## Modules
//!
//! - [`types`] - Geometry, color and element handles
//! - [`error`] - Configuration errors
//! - [`host`] - Host trait and adapters
//! - [`observe`] - Viewport visibility observation
//! - [`motion`] - Pose trees, easing, timelines and the scheduler
//! - [`state`] - Pointer tracking and hover registry
//! - [`cursor`] - Spring-smoothed custom cursor
//! - [`pipeline`] - Sections and the per-frame stage

pub mod cursor;
pub mod error;
pub mod host;
pub mod motion;
pub mod observe;
pub mod pipeline;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{MotionError, Result};

pub use host::{Document, ElementKind, Host, HostEvent, Interactive};

pub use observe::{Crossing, Margin, ObserveOptions, VisibilityObserver, observe_visibility};

pub use motion::{
    Ease, NodeId, Pose, PoseNode, PoseTree, Property, Scheduler, Timeline, Transition,
    drive_animation,
};

pub use state::{CursorMode, HoverRegistry, InteractionContext, PointerTracker};

pub use cursor::{CursorConfig, CursorFrame, CursorTheme, CustomCursor, SpringConfig};

pub use pipeline::{
    PoseSink, Section, SectionId, SectionSpec, Stage, StageConfig, StageFrame, Trigger,
};
