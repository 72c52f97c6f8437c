//! Intersection margins.
//!
//! Follows CSS `margin` shorthand: one to four lengths expanding to
//! top/right/bottom/left. Lengths are `px` or `%` (unitless zero allowed).
//! Percentages resolve against the viewport: top/bottom against its height,
//! left/right against its width.

use std::str::FromStr;

use crate::error::{MotionError, Result};
use crate::types::Rect;

/// A single margin length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Length {
    /// Resolve to pixels against a reference extent.
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => extent * pct / 100.0,
        }
    }

    fn parse(token: &str, input: &str) -> Result<Self> {
        let invalid = |reason| MotionError::InvalidMargin {
            input: input.to_string(),
            reason,
        };

        let (number, unit) = if let Some(n) = token.strip_suffix("px") {
            (n, "px")
        } else if let Some(n) = token.strip_suffix('%') {
            (n, "%")
        } else {
            (token, "")
        };

        let value: f32 = number.parse().map_err(|_| invalid("expected a number"))?;
        if !value.is_finite() {
            return Err(invalid("length must be finite"));
        }

        match unit {
            "px" => Ok(Length::Px(value)),
            "%" => Ok(Length::Percent(value)),
            _ if value == 0.0 => Ok(Length::Px(0.0)),
            _ => Err(invalid("lengths must use px or %")),
        }
    }
}

/// Margin applied to the viewport before testing intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(Length::Px(0.0))
    }
}

impl Margin {
    pub const fn uniform(length: Length) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Same pixel margin on all sides.
    pub const fn px(value: f32) -> Self {
        Self::uniform(Length::Px(value))
    }

    /// Parse CSS shorthand, e.g. `"-100px"` or `"0px 10% -50px"`.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let lengths = tokens
            .iter()
            .map(|t| Length::parse(t, input))
            .collect::<Result<Vec<_>>>()?;

        let [top, right, bottom, left] = match lengths.as_slice() {
            [all] => [*all; 4],
            [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
            [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
            [top, right, bottom, left] => [*top, *right, *bottom, *left],
            [] => {
                return Err(MotionError::InvalidMargin {
                    input: input.to_string(),
                    reason: "empty margin",
                });
            }
            _ => {
                return Err(MotionError::InvalidMargin {
                    input: input.to_string(),
                    reason: "at most four lengths",
                });
            }
        };

        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Apply to a viewport rect. Positive grows, negative shrinks.
    pub fn apply(&self, viewport: Rect) -> Rect {
        viewport.expand(
            self.top.resolve(viewport.height),
            self.right.resolve(viewport.width),
            self.bottom.resolve(viewport.height),
            self.left.resolve(viewport.width),
        )
    }
}

impl FromStr for Margin {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        Margin::parse(s)
    }
}
