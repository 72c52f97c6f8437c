//! Terminal Input Bridge - crossterm events as host notifications.
//!
//! Terminal hosts report the pointer in cells. [`translate_event`] converts
//! crossterm mouse and resize events into page-pixel [`HostEvent`]s using a
//! [`TerminalScale`], ready for [`super::Document::apply`].

use crossterm::event::{Event, MouseEvent, MouseEventKind};

use crate::types::Point;

/// Host notification in page pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMove(Point),
    Scroll { dy: f32 },
    Resize { width: f32, height: f32 },
}

/// Cell-to-pixel conversion for a terminal host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalScale {
    /// Pixels per column.
    pub cell_width: f32,
    /// Pixels per row.
    pub cell_height: f32,
    /// Rows scrolled per wheel notch.
    pub wheel_rows: f32,
}

impl Default for TerminalScale {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
            wheel_rows: 3.0,
        }
    }
}

impl TerminalScale {
    /// Center of a cell in pixels.
    pub fn cell_center(&self, column: u16, row: u16) -> Point {
        Point::new(
            (column as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_height,
        )
    }
}

/// Convert a crossterm event. Returns None for events the engine ignores
/// (keys, focus, paste, button presses, horizontal scroll).
pub fn translate_event(event: &Event, scale: TerminalScale) -> Option<HostEvent> {
    match event {
        Event::Mouse(mouse) => translate_mouse(mouse, scale),
        Event::Resize(columns, rows) => Some(HostEvent::Resize {
            width: *columns as f32 * scale.cell_width,
            height: *rows as f32 * scale.cell_height,
        }),
        _ => None,
    }
}

fn translate_mouse(event: &MouseEvent, scale: TerminalScale) -> Option<HostEvent> {
    let wheel = scale.wheel_rows * scale.cell_height;
    match event.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(HostEvent::PointerMove(
            scale.cell_center(event.column, event.row),
        )),
        MouseEventKind::ScrollDown => Some(HostEvent::Scroll { dy: wheel }),
        MouseEventKind::ScrollUp => Some(HostEvent::Scroll { dy: -wheel }),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
