//! Fixed-capacity particle pools and the spawn sampler.

use bevy::math::DVec3;
use rand::Rng;

use super::{InstanceBuffer, TailConfig, TailKind};
use crate::types::{SimulationError, TimeAcceleration};

/// Uniform sample in `[min, max)`. A degenerate range returns `min`.
pub fn random_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.random::<f64>() * (max - min) + min
}

/// Uniform sample in `[-magnitude, magnitude)`.
pub fn abs_range<R: Rng>(rng: &mut R, magnitude: f64) -> f64 {
    random_range(rng, -magnitude, magnitude)
}

/// One tail particle. Overwritten in place on respawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Spawn point relative to the nucleus
    pub origin_offset: DVec3,
    /// Per-lifetime perturbation added to the drift direction
    pub exit_vector: DVec3,
    /// Drift magnitude per frame of age
    pub radial_speed: f64,
    /// Unit draw placing the speed within the tail's speed range
    pub speed_draw: f64,
    /// Frames since the last respawn
    pub age: u32,
}

impl Particle {
    /// Position along the straight ray from the spawn point.
    ///
    /// Recomputed from scratch each frame, so a speed change rescales the
    /// whole trajectory rather than only future motion.
    pub fn position(&self, drift_direction: DVec3) -> DVec3 {
        let travel = self.radial_speed * self.age as f64;
        self.origin_offset + (drift_direction + self.exit_vector) * travel
    }
}

/// Samples spawn points and exit vectors for one tail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnSampler {
    pub radius: f64,
    pub noise: f64,
    pub angular_spread: f64,
}

impl SpawnSampler {
    /// Largest distance from the nucleus a fresh spawn point may have.
    pub fn envelope(&self) -> f64 {
        self.radius + self.noise
    }

    /// Sample a roughly spherical, noise-roughened spawn point.
    ///
    /// Axes are drawn in order x, y, z, each constrained by the radius budget
    /// left over from the previous ones, so later axes are compressed. The
    /// budget is clamped at zero once noise pushes earlier axes past the radius.
    pub fn sample_origin<R: Rng>(&self, rng: &mut R) -> DVec3 {
        let r2 = self.radius * self.radius;
        let x = abs_range(rng, self.radius) + abs_range(rng, self.noise);
        let y = abs_range(rng, (r2 - x * x).max(0.0).sqrt()) + abs_range(rng, self.noise);
        let z = abs_range(rng, (r2 - x * x - y * y).max(0.0).sqrt()) + abs_range(rng, self.noise);

        let origin = DVec3::new(x, y, z);
        let envelope = self.envelope();
        let length = origin.length();
        if length > envelope {
            origin * (envelope / length)
        } else {
            origin
        }
    }

    pub fn sample_exit_vector<R: Rng>(&self, rng: &mut R) -> DVec3 {
        let spread = self.angular_spread;
        DVec3::new(
            abs_range(rng, spread),
            abs_range(rng, spread),
            abs_range(rng, spread),
        )
    }

    /// Reset a particle to a fresh spawn point. Speed is kept.
    pub fn respawn<R: Rng>(&self, particle: &mut Particle, rng: &mut R) {
        particle.age = 0;
        particle.origin_offset = self.sample_origin(rng);
        particle.exit_vector = self.sample_exit_vector(rng);
    }
}

/// A fixed-length array of particles for one tail plus its render instances.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    pub(super) kind: TailKind,
    pub(super) sampler: SpawnSampler,
    pub(super) size_range: (f64, f64),
    pub(super) particles: Vec<Particle>,
    pub(super) instances: InstanceBuffer,
}

impl ParticlePool {
    /// Build and seed a pool for `kind`.
    ///
    /// Ages start spread across the lifetime budget so the pool does not
    /// pulse in sync.
    pub fn new<R: Rng>(
        kind: TailKind,
        config: &TailConfig,
        acceleration: TimeAcceleration,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let params = config.params(kind);
        let mut pool = Self {
            kind,
            sampler: SpawnSampler {
                radius: params.cloud_radius,
                noise: config.cloud_noise,
                angular_spread: params.angular_spread,
            },
            size_range: params.size_range,
            particles: Vec::with_capacity(params.capacity),
            instances: InstanceBuffer::new(params.capacity),
        };
        pool.reinitialize(config, acceleration, rng)?;
        Ok(pool)
    }

    /// Sample every slot again for a new acceleration.
    pub fn reinitialize<R: Rng>(
        &mut self,
        config: &TailConfig,
        acceleration: TimeAcceleration,
        rng: &mut R,
    ) -> Result<(), SimulationError> {
        if acceleration.is_frozen() {
            return Err(SimulationError::FrozenAcceleration);
        }
        let capacity = config.params(self.kind).capacity;
        self.particles.clear();
        for _ in 0..capacity {
            let particle = self.sample_particle(config, acceleration, rng);
            self.particles.push(particle);
        }
        self.instances.mark_dirty();
        Ok(())
    }

    /// Keep every particle but carry it over to a new acceleration.
    ///
    /// Age scales with the lifetime budget. Speed is recomputed from each
    /// particle's unit draw, so it lands in the new speed range even when
    /// the old one was capped.
    pub fn rescale(
        &mut self,
        config: &TailConfig,
        from: TimeAcceleration,
        to: TimeAcceleration,
    ) -> Result<(), SimulationError> {
        if from.is_frozen() || to.is_frozen() {
            return Err(SimulationError::FrozenAcceleration);
        }
        let age_ratio = config.lifetime_budget(to) / config.lifetime_budget(from);
        for i in 0..self.particles.len() {
            let radial_speed = self.radial_speed(config, self.particles[i].speed_draw, to);
            let particle = &mut self.particles[i];
            particle.age = (particle.age as f64 * age_ratio) as u32;
            particle.radial_speed = radial_speed;
        }
        self.instances.mark_dirty();
        Ok(())
    }

    fn sample_particle<R: Rng>(
        &self,
        config: &TailConfig,
        acceleration: TimeAcceleration,
        rng: &mut R,
    ) -> Particle {
        let age = random_range(rng, 0.0, config.lifetime_budget(acceleration)) as u32;
        let speed_draw = rng.random::<f64>();
        Particle {
            origin_offset: self.sampler.sample_origin(rng),
            exit_vector: self.sampler.sample_exit_vector(rng),
            radial_speed: self.radial_speed(config, speed_draw, acceleration),
            speed_draw,
            age,
        }
    }

    /// Speed in `[low·a, high·a)` picked by `speed_draw`, capped at the maximum.
    fn radial_speed(
        &self,
        config: &TailConfig,
        speed_draw: f64,
        acceleration: TimeAcceleration,
    ) -> f64 {
        let a = acceleration.value();
        let (low, high) = config.params(self.kind).speed_factors;
        (speed_draw * (high * a - low * a) + low * a).min(config.max_particle_speed)
    }

    pub fn kind(&self) -> TailKind {
        self.kind
    }

    pub fn sampler(&self) -> &SpawnSampler {
        &self.sampler
    }

    pub fn size_range(&self) -> (f64, f64) {
        self.size_range
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.instances
    }
}
