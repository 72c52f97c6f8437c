//! Observe Module - Scroll-into-view detection.
//!
//! - [`margin`] - CSS-style intersection margins
//! - [`observer`] - The per-section visibility observer

pub mod margin;
mod observer;

pub use margin::{Length, Margin};
pub use observer::*;
