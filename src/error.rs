//! Error types for spark-motion.
//!
//! Only configuration can fail. Runtime paths (observing, driving, cursor
//! frames) degrade to a simpler visual state instead of erroring.

use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("Invalid margin {input:?}: {reason}")]
    InvalidMargin { input: String, reason: &'static str },

    #[error("Invalid threshold {0}: must be within 0..=1")]
    InvalidThreshold(f32),

    #[error("Invalid spring: stiffness {stiffness}, damping {damping}, mass {mass}")]
    InvalidSpring {
        stiffness: f32,
        damping: f32,
        mass: f32,
    },

    #[error("Invalid duration {0}s: must be finite and non-negative")]
    InvalidDuration(f32),
}

pub type Result<T> = std::result::Result<T, MotionError>;

/// Convert seconds to a `Duration`, rejecting negative, non-finite or
/// out-of-range input.
pub fn secs(value: f32) -> Result<std::time::Duration> {
    std::time::Duration::try_from_secs_f32(value).map_err(|_| MotionError::InvalidDuration(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_secs() {
        assert_eq!(secs(0.25).unwrap(), Duration::from_millis(250));
        assert_eq!(secs(-1.0), Err(MotionError::InvalidDuration(-1.0)));
        assert!(secs(f32::NAN).is_err());
        assert!(secs(f32::INFINITY).is_err());
    }

    #[test]
    fn test_secs_overflow_is_an_error() {
        assert_eq!(secs(1.0e30), Err(MotionError::InvalidDuration(1.0e30)));
        assert_eq!(secs(f32::MAX), Err(MotionError::InvalidDuration(f32::MAX)));
    }

    #[test]
    fn test_error_display() {
        let err = MotionError::InvalidMargin {
            input: "10em".into(),
            reason: "unsupported unit",
        };
        assert_eq!(err.to_string(), "Invalid margin \"10em\": unsupported unit");
    }
}
