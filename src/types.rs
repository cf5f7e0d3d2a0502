//! Core constants and shared types for the comet tour simulation.
//!
//! Distances are in units of 100 km, times in seconds. Angular values are radians.

use bevy::prelude::*;

use crate::tail::TailKind;

// Orbital constants for comet 67P/Churyumov-Gerasimenko

/// Distance from the sun at its furthest (100s of km)
pub const APHELION_DIST: f64 = 8_501_497.39;

/// Distance from the sun at its closest (100s of km)
pub const PERIHELION_DIST: f64 = 1_859_800.73;

/// Length of the full major axis (100s of km)
pub const MAJOR_AXIS_DIST: f64 = PERIHELION_DIST + APHELION_DIST;

/// Length of the semi-minor axis (100s of km)
pub const SEMI_MINOR_DIST: f64 = 7_952_473.21;

/// Orbital period around the sun in seconds
pub const REVOLUTION_PERIOD: f64 = 20_309_000.0;

/// Time for one full spin of the nucleus in seconds
pub const ROTATION_PERIOD: f64 = 44_655.48;

/// Angle between orbital axis and rotation axis
pub const AXIAL_TILT: f64 = 52.0 * DEG_TO_RAD;

/// Diameter of the sun (100s of km)
pub const SUN_DIAMETER: f64 = 13_927.0;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Slowest selectable time acceleration.
pub const MIN_TIME_ACCELERATION: f64 = 10.0;

/// Fastest selectable time acceleration.
pub const MAX_TIME_ACCELERATION: f64 = 20_000.0;

/// Acceleration at which one simulated frame maps to one frame of tail lifetime.
pub const REFERENCE_TIME_ACCELERATION: f64 = 100.0;

/// Upper end of the normalized slider range (lower end is 0).
pub const SLIDER_MAX: f64 = 100.0;

/// Errors raised when out-of-contract values reach the simulation boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("time acceleration must be finite (got {0})")]
    NonFiniteAcceleration(f64),

    #[error("time acceleration must not be negative (got {0})")]
    NegativeAcceleration(f64),

    #[error("particle pools cannot be seeded while time is frozen")]
    FrozenAcceleration,

    #[error("{kind} tail capacity must be non-zero")]
    ZeroCapacity { kind: TailKind },

    #[error("invalid {kind} tail parameter `{name}`: {value}")]
    InvalidTailParameter {
        kind: TailKind,
        name: &'static str,
        value: f64,
    },

    #[error("invalid shared tail parameter `{name}`: {value}")]
    InvalidSharedParameter { name: &'static str, value: f64 },
}

/// User-controlled multiplier scaling simulated angular and particle velocities.
///
/// Always finite and non-negative. Zero freezes the scene.
#[derive(Resource, Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct TimeAcceleration(f64);

impl Default for TimeAcceleration {
    fn default() -> Self {
        Self(MIN_TIME_ACCELERATION)
    }
}

impl TimeAcceleration {
    /// Frozen scene: nothing advances.
    pub const FROZEN: Self = Self(0.0);

    /// Validate a raw acceleration value.
    pub fn new(value: f64) -> Result<Self, SimulationError> {
        if !value.is_finite() {
            return Err(SimulationError::NonFiniteAcceleration(value));
        }
        if value < 0.0 {
            return Err(SimulationError::NegativeAcceleration(value));
        }
        Ok(Self(value))
    }

    /// Coerce any value into contract: NaN falls back to the minimum,
    /// everything else is clamped to `[0, MAX_TIME_ACCELERATION]`.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self(MIN_TIME_ACCELERATION);
        }
        Self(value.clamp(0.0, MAX_TIME_ACCELERATION))
    }

    /// Map a slider position in `[0, 100]` linearly onto `[MIN, MAX]`.
    pub fn from_slider(position: f64) -> Self {
        let t = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, SLIDER_MAX) / SLIDER_MAX
        };
        Self(t * (MAX_TIME_ACCELERATION - MIN_TIME_ACCELERATION) + MIN_TIME_ACCELERATION)
    }

    /// Inverse of [`TimeAcceleration::from_slider`].
    pub fn slider_position(self) -> f64 {
        (self.0 - MIN_TIME_ACCELERATION) / (MAX_TIME_ACCELERATION - MIN_TIME_ACCELERATION)
            * SLIDER_MAX
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_frozen(self) -> bool {
        self.0 == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_negative_acceleration() {
        assert_eq!(
            TimeAcceleration::new(-1.0),
            Err(SimulationError::NegativeAcceleration(-1.0))
        );
    }

    #[test]
    fn test_rejects_non_finite_acceleration() {
        assert!(matches!(
            TimeAcceleration::new(f64::NAN),
            Err(SimulationError::NonFiniteAcceleration(_))
        ));
        assert!(matches!(
            TimeAcceleration::new(f64::INFINITY),
            Err(SimulationError::NonFiniteAcceleration(_))
        ));
    }

    #[test]
    fn test_zero_acceleration_is_frozen() {
        let a = TimeAcceleration::new(0.0).unwrap();
        assert!(a.is_frozen());
        assert_eq!(a, TimeAcceleration::FROZEN);
    }

    #[test]
    fn test_clamped_acceleration() {
        assert_eq!(TimeAcceleration::clamped(-5.0).value(), 0.0);
        assert_eq!(TimeAcceleration::clamped(1e9).value(), MAX_TIME_ACCELERATION);
        assert_eq!(TimeAcceleration::clamped(f64::NAN).value(), MIN_TIME_ACCELERATION);
        assert_eq!(TimeAcceleration::clamped(250.0).value(), 250.0);
    }

    #[test]
    fn test_slider_endpoints() {
        assert_eq!(TimeAcceleration::from_slider(0.0).value(), MIN_TIME_ACCELERATION);
        assert_eq!(TimeAcceleration::from_slider(100.0).value(), MAX_TIME_ACCELERATION);
        // Out-of-range positions are clamped
        assert_eq!(TimeAcceleration::from_slider(-3.0).value(), MIN_TIME_ACCELERATION);
        assert_eq!(TimeAcceleration::from_slider(140.0).value(), MAX_TIME_ACCELERATION);
    }

    #[test]
    fn test_slider_is_linear() {
        let mid = TimeAcceleration::from_slider(50.0);
        assert_relative_eq!(
            mid.value(),
            (MIN_TIME_ACCELERATION + MAX_TIME_ACCELERATION) / 2.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(mid.slider_position(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_is_minimum() {
        assert_eq!(TimeAcceleration::default().value(), MIN_TIME_ACCELERATION);
    }

    #[test]
    fn test_major_axis_is_sum_of_apsides() {
        assert_relative_eq!(MAJOR_AXIS_DIST, 10_361_298.12, epsilon = 1e-6);
    }
}
