//! Orbital kinematics for the comet-fixed frame.
//!
//! The comet sits at the origin. Each frame the true anomaly and the spin
//! angle advance by fixed angular velocities scaled by the time acceleration,
//! and the light source is placed on an ellipse with the comet at one focus.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::types::{
    APHELION_DIST, PERIHELION_DIST, REVOLUTION_PERIOD, ROTATION_PERIOD, SEMI_MINOR_DIST,
    TimeAcceleration,
};

/// Lead angle of the dust tail relative to the true anomaly, so the tail
/// trails behind the orbital motion.
pub const DUST_LEAD_ANGLE: f64 = FRAC_PI_2 + PI / 6.0;

/// Extra rotation of the ion tail away from the dust tail.
pub const ION_OFFSET_ANGLE: f64 = PI / 5.0;

/// Reset an accumulated angle to zero once it reaches a full turn.
///
/// This is a reset, not a modulo: any overshoot past 2π is discarded.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle >= TAU { 0.0 } else { angle }
}

/// Physical parameters of the orbit and the nucleus spin.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct OrbitParams {
    /// Orbital period in seconds
    pub revolution_period: f64,
    /// Spin period in seconds
    pub rotation_period: f64,
    /// Closest distance to the source (100s of km)
    pub perihelion: f64,
    /// Furthest distance from the source (100s of km)
    pub aphelion: f64,
    /// Semi-minor axis length (100s of km)
    pub semi_minor: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            revolution_period: REVOLUTION_PERIOD,
            rotation_period: ROTATION_PERIOD,
            perihelion: PERIHELION_DIST,
            aphelion: APHELION_DIST,
            semi_minor: SEMI_MINOR_DIST,
        }
    }
}

impl OrbitParams {
    /// Radians travelled along the orbit per simulated second.
    pub fn orbital_angular_velocity(&self) -> f64 {
        TAU / self.revolution_period
    }

    /// Radians of nucleus spin per simulated second.
    pub fn spin_angular_velocity(&self) -> f64 {
        TAU / self.rotation_period
    }

    /// Full major axis length.
    pub fn major_axis(&self) -> f64 {
        self.perihelion + self.aphelion
    }

    /// Position of the light source relative to the comet.
    ///
    /// The ellipse is shifted along x so the comet sits at a focus:
    /// `x` sweeps `[-perihelion, aphelion]`, `z` sweeps `±semi_minor`.
    pub fn source_position(&self, true_anomaly: f64) -> DVec3 {
        let (sin, cos) = true_anomaly.sin_cos();
        DVec3::new(
            (sin + 1.0) * self.major_axis() / 2.0 - self.perihelion,
            0.0,
            cos * self.semi_minor,
        )
    }
}

/// Angular state of the comet, advanced once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitalState {
    /// Position along the orbit, in `[0, 2π)`
    pub true_anomaly: f64,
    /// Spin angle of the nucleus, in `[0, 2π)`
    pub body_rotation: f64,
}

impl OrbitalState {
    /// Advance both angles by one frame.
    pub fn advance(&mut self, params: &OrbitParams, acceleration: TimeAcceleration) {
        *self = self.advanced(params, acceleration);
    }

    /// Pure form of [`OrbitalState::advance`].
    pub fn advanced(self, params: &OrbitParams, acceleration: TimeAcceleration) -> Self {
        let a = acceleration.value();
        Self {
            true_anomaly: wrap_angle(self.true_anomaly + params.orbital_angular_velocity() * a),
            body_rotation: wrap_angle(self.body_rotation + params.spin_angular_velocity() * a),
        }
    }

    /// Direction the dust tail streams in (unit vector in the orbital plane).
    pub fn dust_trail_angle(&self) -> f64 {
        (self.true_anomaly + DUST_LEAD_ANGLE) % TAU
    }

    /// Direction the ion tail streams in, offset further from the dust tail.
    pub fn ion_trail_angle(&self) -> f64 {
        (self.dust_trail_angle() + ION_OFFSET_ANGLE) % TAU
    }

    pub fn dust_drift_direction(&self) -> DVec3 {
        planar_direction(self.dust_trail_angle())
    }

    pub fn ion_drift_direction(&self) -> DVec3 {
        planar_direction(self.ion_trail_angle())
    }
}

/// Unit vector in the xz-plane, measured from +z towards +x.
fn planar_direction(angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    DVec3::new(sin, 0.0, cos)
}
