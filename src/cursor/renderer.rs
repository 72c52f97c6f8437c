//! Custom Cursor - a sprung visual that follows the pointer.
//!
//! Reads pointer position and cursor mode from an [`InteractionContext`]
//! each frame and produces a [`CursorFrame`] for the host to draw. The
//! context is only read, never written.
//!
//! On hosts without a fine pointer (touch screens) the cursor is suppressed
//! and every frame is `None`.

use std::time::Duration;

use tracing::debug;

use super::spring::{Spring2D, SpringConfig};
use crate::host::Host;
use crate::state::{CursorMode, InteractionContext};
use crate::types::{BlendMode, Point, Rgba};

// =============================================================================
// CONFIG
// =============================================================================

/// Visual for one cursor mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorAppearance {
    /// Diameter in pixels
    pub size: f32,
    pub color: Rgba,
    pub blend: BlendMode,
}

/// Appearance per [`CursorMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorTheme {
    pub default: CursorAppearance,
    pub hover: CursorAppearance,
}

impl Default for CursorTheme {
    fn default() -> Self {
        Self {
            default: CursorAppearance {
                size: 8.0,
                color: Rgba::from_rgb_int(0xa3b18a),
                blend: BlendMode::Normal,
            },
            hover: CursorAppearance {
                size: 40.0,
                color: Rgba::from_rgb_int(0x3a5a40),
                blend: BlendMode::Difference,
            },
        }
    }
}

impl CursorTheme {
    pub fn appearance(&self, mode: CursorMode) -> &CursorAppearance {
        match mode {
            CursorMode::Default => &self.default,
            CursorMode::Hover => &self.hover,
        }
    }
}

/// Configuration for [`CustomCursor::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorConfig {
    pub spring: SpringConfig,
    pub theme: CursorTheme,
}

/// What the host draws for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFrame {
    /// Top-left of the visual (center minus half the size)
    pub position: Point,
    /// Sprung center
    pub center: Point,
    pub size: f32,
    pub color: Rgba,
    pub blend: BlendMode,
    pub mode: CursorMode,
}

// =============================================================================
// CURSOR
// =============================================================================

/// Spring-smoothed cursor visual.
pub struct CustomCursor {
    config: CursorConfig,
    spring: Option<Spring2D>,
    last_frame: Option<Duration>,
    suppressed: bool,
    mounted: bool,
}

impl CustomCursor {
    pub fn mount(host: &dyn Host, config: CursorConfig) -> Self {
        let suppressed = !host.has_fine_pointer();
        debug!(suppressed, "custom cursor mounted");
        Self {
            config,
            spring: None,
            last_frame: None,
            suppressed,
            mounted: true,
        }
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// True on coarse-pointer hosts.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Step toward the pointer and produce this frame's visual.
    ///
    /// The first frame snaps to the pointer. Time running backwards steps
    /// by zero.
    pub fn frame(&mut self, ctx: &InteractionContext, now: Duration) -> Option<CursorFrame> {
        if self.suppressed || !self.mounted {
            return None;
        }

        let target = ctx.pointer_position();
        let dt = self
            .last_frame
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        self.last_frame = Some(self.last_frame.map_or(now, |last| last.max(now)));

        let center = match self.spring.as_mut() {
            Some(spring) => spring.step(dt, target),
            None => {
                self.spring = Some(Spring2D::new(self.config.spring, target));
                target
            }
        };

        let mode = ctx.mode();
        let look = self.config.theme.appearance(mode);
        let half = look.size / 2.0;

        Some(CursorFrame {
            position: Point::new(center.x - half, center.y - half),
            center,
            size: look.size,
            color: look.color,
            blend: look.blend,
            mode,
        })
    }

    /// Stop producing frames.
    pub fn unmount(&mut self) {
        if self.mounted {
            self.mounted = false;
            self.spring = None;
            self.last_frame = None;
            debug!("custom cursor unmounted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Document, ElementKind, Interactive};
    use crate::types::Rect;

    fn setup() -> (Document, InteractionContext, CustomCursor) {
        let doc = Document::new(1000.0, 800.0);
        doc.insert(ElementKind::Button, Rect::new(500.0, 500.0, 100.0, 50.0));
        let ctx = InteractionContext::mount(&doc, Interactive::default());
        let cursor = CustomCursor::mount(&doc, CursorConfig::default());
        (doc, ctx, cursor)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_frame_snaps() {
        let (doc, ctx, mut cursor) = setup();
        doc.move_pointer(100.0, 200.0);

        let frame = cursor.frame(&ctx, ms(0)).unwrap();
        assert_eq!(frame.center, Point::new(100.0, 200.0));
        assert_eq!(frame.position, Point::new(96.0, 196.0));
        assert_eq!(frame.size, 8.0);
        assert_eq!(frame.mode, CursorMode::Default);
    }

    #[test]
    fn test_follows_pointer_with_lag() {
        let (doc, ctx, mut cursor) = setup();
        doc.move_pointer(0.0, 0.0);
        cursor.frame(&ctx, ms(0));

        doc.move_pointer(200.0, 0.0);
        let early = cursor.frame(&ctx, ms(16)).unwrap();
        assert!(early.center.x > 0.0 && early.center.x < 200.0);

        let mut last = early;
        for i in 2..120 {
            last = cursor.frame(&ctx, ms(16 * i)).unwrap();
        }
        assert!((last.center.x - 200.0).abs() < 0.5);
    }

    #[test]
    fn test_hover_switches_appearance() {
        let (doc, ctx, mut cursor) = setup();
        doc.move_pointer(550.0, 520.0);

        let frame = cursor.frame(&ctx, ms(0)).unwrap();
        assert_eq!(frame.mode, CursorMode::Hover);
        assert_eq!(frame.size, 40.0);
        assert_eq!(frame.blend, BlendMode::Difference);
        assert_eq!(frame.color, Rgba::from_rgb_int(0x3a5a40));
        assert_eq!(frame.position, Point::new(530.0, 500.0));

        doc.move_pointer(10.0, 10.0);
        let frame = cursor.frame(&ctx, ms(16)).unwrap();
        assert_eq!(frame.mode, CursorMode::Default);
        assert_eq!(frame.size, 8.0);
    }

    #[test]
    fn test_suppressed_without_fine_pointer() {
        let doc = Document::new(1000.0, 800.0);
        doc.set_fine_pointer(false);
        let ctx = InteractionContext::mount(&doc, Interactive::default());
        let mut cursor = CustomCursor::mount(&doc, CursorConfig::default());

        assert!(cursor.is_suppressed());
        assert_eq!(cursor.frame(&ctx, ms(0)), None);
    }

    #[test]
    fn test_unmount_stops_frames() {
        let (_doc, ctx, mut cursor) = setup();
        assert!(cursor.frame(&ctx, ms(0)).is_some());
        cursor.unmount();
        cursor.unmount();
        assert_eq!(cursor.frame(&ctx, ms(16)), None);
    }

    #[test]
    fn test_frame_after_sleep_returns_promptly() {
        let (doc, ctx, mut cursor) = setup();
        doc.move_pointer(0.0, 0.0);
        cursor.frame(&ctx, ms(0));
        doc.move_pointer(100.0, 0.0);

        let woke = cursor.frame(&ctx, Duration::from_secs(40 * 3600)).unwrap();
        assert!(woke.center.x > 0.0 && woke.center.x < 100.0);

        let mut last = woke;
        for i in 1..120 {
            last = cursor.frame(&ctx, Duration::from_secs(40 * 3600) + ms(16 * i)).unwrap();
        }
        assert!((last.center.x - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_backwards_time_does_not_move() {
        let (doc, ctx, mut cursor) = setup();
        doc.move_pointer(0.0, 0.0);
        cursor.frame(&ctx, ms(100));
        doc.move_pointer(300.0, 0.0);

        let frame = cursor.frame(&ctx, ms(50)).unwrap();
        assert_eq!(frame.center, Point::ORIGIN);
    }
}
