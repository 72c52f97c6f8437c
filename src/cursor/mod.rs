//! Cursor Module - spring-smoothed custom cursor.
//!
//! - [`spring`] - damped spring integrator
//! - [`renderer`] - per-frame cursor visual driven by an interaction context

pub mod renderer;
pub mod spring;

pub use renderer::{CursorAppearance, CursorConfig, CursorFrame, CursorTheme, CustomCursor};
pub use spring::{MAX_FRAME_GAP, Spring2D, SpringConfig};
