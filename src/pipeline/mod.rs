//! Frame Pipeline
//!
//! Connects visibility, timelines and the cursor into one per-frame pass.
//!
//! ```text
//! host scroll/pointer → observers → timeline flips → scheduler → pose sinks
//!                     → pointer + hover → cursor spring → CursorFrame
//! ```
//!
//! - **section** - one observer and one timeline writing to a [`PoseSink`]
//! - **mount** - the [`Stage`] owning the context, cursor, scheduler and sections

pub mod mount;
pub mod section;

pub use mount::{SectionId, Stage, StageConfig, StageFrame};
pub use section::{PoseSink, Section, SectionSpec, Trigger};
