//! Dust and ion tail particle simulation.
//!
//! Each tail is a fixed-capacity pool of particles that stream away from the
//! comet along a drift direction. Positions are recomputed from the spawn
//! point every frame (`origin + speed * age * drift`), and particles respawn
//! when they outlive the lifetime budget or decay at random.

mod advect;
mod instances;
mod pool;

#[cfg(test)]
mod proptest_tail;

use std::f64::consts::PI;
use std::fmt;

use bevy::prelude::*;

use crate::types::{REFERENCE_TIME_ACCELERATION, SimulationError, TimeAcceleration};

pub use advect::{AdvectionStep, advance};
pub use instances::InstanceBuffer;
pub use pool::{Particle, ParticlePool, SpawnSampler, abs_range, random_range};

/// Number of particles in the dust cloud
pub const DUST_PARTICLE_NUM: usize = 100_000;

/// Number of particles in the ion cloud
pub const ION_PARTICLE_NUM: usize = 65_000;

/// Radius around the nucleus that dust particles originate from
pub const DUST_CLOUD_RADIUS: f64 = 60_000.0;

/// Radius around the nucleus that ion particles originate from
pub const ION_CLOUD_RADIUS: f64 = 35_000.0;

/// Frames a particle travels at the reference acceleration before respawning
pub const MAX_TAIL_TIME: f64 = 25_000.0;

/// Per-frame chance that a particle decays early, tapering the tail
pub const DECAY_PROBABILITY: f64 = 0.00001;

/// Per-axis jitter applied to spawn positions so the cloud is not a perfect sphere
pub const CLOUD_NOISE: f64 = 100.0;

/// Hard cap on radial speed
pub const MAX_PARTICLE_SPEED: f64 = 100_000.0;

/// Frames a particle may live at the given acceleration.
///
/// Doubling the acceleration halves the budget so the tail keeps roughly
/// the same simulated length.
pub fn lifetime_budget(max_tail_time: f64, acceleration: TimeAcceleration) -> f64 {
    max_tail_time / (acceleration.value() / REFERENCE_TIME_ACCELERATION)
}

/// The two particle populations trailing the comet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TailKind {
    /// Dense, slow, widely spread dust tail
    Dust,
    /// Sparse, fast, narrow ion tail
    Ion,
}

impl TailKind {
    pub const ALL: [TailKind; 2] = [TailKind::Dust, TailKind::Ion];
}

impl fmt::Display for TailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailKind::Dust => write!(f, "dust"),
            TailKind::Ion => write!(f, "ion"),
        }
    }
}

/// How pools follow a change in time acceleration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconfigureStrategy {
    /// Throw every particle away and sample the pool again.
    #[default]
    Reinitialize,
    /// Keep particles; rescale age by the budget ratio and speed by the
    /// acceleration ratio.
    Rescale,
}

/// Tuning for one tail population.
#[derive(Clone, Debug, PartialEq)]
pub struct TailParams {
    /// Fixed number of particle slots
    pub capacity: usize,
    /// Radius of the spawn cloud around the nucleus
    pub cloud_radius: f64,
    /// Radial speed range, as multiples of the time acceleration
    pub speed_factors: (f64, f64),
    /// Half-width of the per-axis exit vector perturbation
    pub angular_spread: f64,
    /// Instance size range, as multiples of the camera-derived base size
    pub size_range: (f64, f64),
}

impl TailParams {
    pub fn dust() -> Self {
        Self {
            capacity: DUST_PARTICLE_NUM,
            cloud_radius: DUST_CLOUD_RADIUS,
            speed_factors: (4.0, 6.0),
            angular_spread: PI / 16.0,
            size_range: (0.5, 1.0),
        }
    }

    pub fn ion() -> Self {
        Self {
            capacity: ION_PARTICLE_NUM,
            cloud_radius: ION_CLOUD_RADIUS,
            speed_factors: (9.0, 14.0),
            angular_spread: PI / 24.0,
            size_range: (0.25, 0.75),
        }
    }

    fn validate(&self, kind: TailKind) -> Result<(), SimulationError> {
        if self.capacity == 0 {
            return Err(SimulationError::ZeroCapacity { kind });
        }
        let invalid = |name, value| SimulationError::InvalidTailParameter { kind, name, value };
        check_non_negative(self.cloud_radius).map_err(|v| invalid("cloud_radius", v))?;
        check_non_negative(self.angular_spread).map_err(|v| invalid("angular_spread", v))?;
        check_range(self.speed_factors).map_err(|v| invalid("speed_factors", v))?;
        check_range(self.size_range).map_err(|v| invalid("size_range", v))?;
        Ok(())
    }
}

fn check_non_negative(value: f64) -> Result<(), f64> {
    if value.is_finite() && value >= 0.0 { Ok(()) } else { Err(value) }
}

fn check_range((low, high): (f64, f64)) -> Result<(), f64> {
    check_non_negative(low)?;
    check_non_negative(high)?;
    if low <= high { Ok(()) } else { Err(low) }
}

/// Configuration for both tails and the shared respawn policy.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct TailConfig {
    pub dust: TailParams,
    pub ion: TailParams,
    /// Per-axis spawn jitter
    pub cloud_noise: f64,
    /// Cap on radial speed regardless of acceleration
    pub max_particle_speed: f64,
    /// Lifetime in frames at the reference acceleration
    pub max_tail_time: f64,
    /// Per-frame early respawn chance
    pub decay_probability: f64,
    pub reconfigure: ReconfigureStrategy,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            dust: TailParams::dust(),
            ion: TailParams::ion(),
            cloud_noise: CLOUD_NOISE,
            max_particle_speed: MAX_PARTICLE_SPEED,
            max_tail_time: MAX_TAIL_TIME,
            decay_probability: DECAY_PROBABILITY,
            reconfigure: ReconfigureStrategy::default(),
        }
    }
}

impl TailConfig {
    pub fn params(&self, kind: TailKind) -> &TailParams {
        match kind {
            TailKind::Dust => &self.dust,
            TailKind::Ion => &self.ion,
        }
    }

    pub fn lifetime_budget(&self, acceleration: TimeAcceleration) -> f64 {
        lifetime_budget(self.max_tail_time, acceleration)
    }

    /// Reject configurations that would produce NaN or degenerate geometry.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.dust.validate(TailKind::Dust)?;
        self.ion.validate(TailKind::Ion)?;

        let invalid = |name, value| SimulationError::InvalidSharedParameter { name, value };
        check_non_negative(self.cloud_noise).map_err(|v| invalid("cloud_noise", v))?;
        check_non_negative(self.max_particle_speed)
            .map_err(|v| invalid("max_particle_speed", v))?;
        if !(self.max_tail_time.is_finite() && self.max_tail_time > 0.0) {
            return Err(invalid("max_tail_time", self.max_tail_time));
        }
        if !(0.0..=1.0).contains(&self.decay_probability) {
            return Err(invalid("decay_probability", self.decay_probability));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn accel(a: f64) -> TimeAcceleration {
        TimeAcceleration::new(a).unwrap()
    }

    #[test]
    fn test_lifetime_budget_reference_values() {
        assert_eq!(lifetime_budget(MAX_TAIL_TIME, accel(100.0)), MAX_TAIL_TIME);
        assert_eq!(lifetime_budget(MAX_TAIL_TIME, accel(200.0)), MAX_TAIL_TIME / 2.0);
        assert_eq!(lifetime_budget(MAX_TAIL_TIME, accel(10.0)), MAX_TAIL_TIME * 10.0);
    }

    #[test]
    fn test_doubling_acceleration_halves_budget() {
        for a in [10.0, 37.5, 640.0, 9_999.0] {
            let single = lifetime_budget(MAX_TAIL_TIME, accel(a));
            let double = lifetime_budget(MAX_TAIL_TIME, accel(2.0 * a));
            assert_relative_eq!(double, single / 2.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(TailConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = TailConfig::default();
        config.ion.capacity = 0;
        assert_eq!(
            config.validate(),
            Err(SimulationError::ZeroCapacity { kind: TailKind::Ion })
        );
    }

    #[test]
    fn test_negative_radius_rejected() {
        let mut config = TailConfig::default();
        config.dust.cloud_radius = -1.0;
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidTailParameter {
                kind: TailKind::Dust,
                name: "cloud_radius",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_speed_range_rejected() {
        let mut config = TailConfig::default();
        config.dust.speed_factors = (6.0, 4.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_decay_probability_bounds() {
        let mut config = TailConfig::default();
        config.decay_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidSharedParameter {
                name: "decay_probability",
                ..
            })
        ));
    }

    #[test]
    fn test_ion_tail_is_narrower_and_faster() {
        let dust = TailParams::dust();
        let ion = TailParams::ion();
        assert!(ion.angular_spread < dust.angular_spread);
        assert!(ion.speed_factors.0 > dust.speed_factors.1);
        assert!(ion.cloud_radius < dust.cloud_radius);
        assert!(ion.capacity < dust.capacity);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TailKind::Dust.to_string(), "dust");
        assert_eq!(TailKind::Ion.to_string(), "ion");
    }
}
