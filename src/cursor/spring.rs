//! Damped spring integrator.
//!
//! Spring-mass-damper stepped with semi-implicit Euler at a fixed internal
//! tick, so the result does not depend on how the host slices frame time.

use std::time::Duration;

use crate::error::{MotionError, Result};
use crate::types::Point;

/// Internal integration tick (seconds).
const SIMULATION_TICK: f32 = 1.0 / 240.0;

/// Longest frame gap integrated in one step. Longer gaps (a sleeping tab)
/// are treated as this long.
pub const MAX_FRAME_GAP: Duration = Duration::from_millis(100);

/// Spring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    stiffness: f32,
    damping: f32,
    mass: f32,
}

impl Default for SpringConfig {
    /// Critically damped at stiffness 500.
    fn default() -> Self {
        Self::critical(500.0)
    }
}

impl SpringConfig {
    /// Validated spring with unit mass.
    pub fn new(stiffness: f32, damping: f32) -> Result<Self> {
        Self::with_mass(stiffness, damping, 1.0)
    }

    pub fn with_mass(stiffness: f32, damping: f32, mass: f32) -> Result<Self> {
        let valid = stiffness.is_finite()
            && damping.is_finite()
            && mass.is_finite()
            && stiffness > 0.0
            && damping >= 0.0
            && mass > 0.0;
        if !valid {
            return Err(MotionError::InvalidSpring {
                stiffness,
                damping,
                mass,
            });
        }
        Ok(Self {
            stiffness,
            damping,
            mass,
        })
    }

    /// Critically damped spring (unit mass): fastest approach with no overshoot.
    ///
    /// Non-positive or non-finite stiffness falls back to 1.
    pub fn critical(stiffness: f32) -> Self {
        let stiffness = if stiffness.is_finite() && stiffness > 0.0 {
            stiffness
        } else {
            1.0
        };
        Self {
            stiffness,
            damping: 2.0 * stiffness.sqrt(),
            mass: 1.0,
        }
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Damping ratio: 1 is critical, below 1 overshoots.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

/// Two-axis spring state.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring2D {
    config: SpringConfig,
    position: Point,
    velocity: Point,
}

impl Spring2D {
    pub fn new(config: SpringConfig, position: Point) -> Self {
        Self {
            config,
            position,
            velocity: Point::ORIGIN,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Jump to a position at rest.
    pub fn snap(&mut self, position: Point) {
        self.position = position;
        self.velocity = Point::ORIGIN;
    }

    /// Advance by `dt` toward `target`.
    ///
    /// `dt` is capped at [`MAX_FRAME_GAP`] and split into equal substeps
    /// no longer than the simulation tick.
    pub fn step(&mut self, dt: Duration, target: Point) -> Point {
        let dt = dt.min(MAX_FRAME_GAP).as_secs_f32();
        let steps = (dt / SIMULATION_TICK).ceil() as u32;
        if steps == 0 {
            return self.position;
        }
        let tick = dt / steps as f32;
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;

        for _ in 0..steps {
            let ax = (stiffness * (target.x - self.position.x) - damping * self.velocity.x) / mass;
            let ay = (stiffness * (target.y - self.position.y) - damping * self.velocity.y) / mass;

            self.velocity.x += ax * tick;
            self.velocity.y += ay * tick;
            self.position.x += self.velocity.x * tick;
            self.position.y += self.velocity.y * tick;
        }
        self.position
    }

    /// Whether the spring is effectively at rest on `target`.
    pub fn is_resting(&self, target: Point, tolerance: f32) -> bool {
        self.position.distance(target) <= tolerance
            && self.velocity.distance(Point::ORIGIN) <= tolerance
    }
}
