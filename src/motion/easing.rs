//! Easing curves for pose transitions.
//!
//! Named curves use the CSS cubic-bezier control points, so `EaseOut` here
//! matches `ease-out` in a stylesheet.

/// Easing curve mapping linear progress (0..=1) to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ease {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    /// Custom curve through (x1, y1) and (x2, y2). `x` values are clamped to 0..=1.
    CubicBezier(f32, f32, f32, f32),
}

impl Ease {
    /// Control points for the curve, or None for linear.
    fn control_points(self) -> Option<(f32, f32, f32, f32)> {
        match self {
            Ease::Linear => None,
            Ease::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Ease::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Ease::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Ease::CubicBezier(x1, y1, x2, y2) => {
                Some((x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2))
            }
        }
    }

    /// Apply the curve. Input is clamped to 0..=1; endpoints are exact.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => {
                let s = solve_bezier_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

/// One axis of a cubic bezier anchored at 0 and 1.
#[inline]
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
///
/// Newton iterations first, bisection if the slope flattens out.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}
