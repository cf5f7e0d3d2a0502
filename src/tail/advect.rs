//! Per-frame tail advection and respawn policy.

use bevy::math::DVec3;
use bevy::prelude::*;
use rand::Rng;

use super::pool::random_range;
use super::{InstanceBuffer, Particle, ParticlePool, SpawnSampler, TailConfig};
use crate::types::TimeAcceleration;

/// Slots per partition when the sweep runs in parallel.
#[cfg(feature = "parallel")]
const PARTITION_SIZE: usize = 8192;

/// Inputs shared by every particle of one pool for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdvectionStep {
    /// Unit drift direction of the tail this frame
    pub drift_direction: DVec3,
    /// Age (in frames) at which a particle is forced to respawn
    pub lifetime_budget: f64,
    /// Per-frame early respawn chance
    pub decay_probability: f64,
    /// Camera-derived base instance size
    pub base_size: f64,
}

impl AdvectionStep {
    pub fn new(
        drift_direction: DVec3,
        config: &TailConfig,
        acceleration: TimeAcceleration,
        base_size: f64,
    ) -> Self {
        Self {
            drift_direction,
            lifetime_budget: config.lifetime_budget(acceleration),
            decay_probability: config.decay_probability,
            base_size,
        }
    }
}

/// Advance every particle of `pool` by one frame and rewrite its instances.
pub fn advance<R: Rng>(pool: &mut ParticlePool, step: &AdvectionStep, rng: &mut R) {
    let ParticlePool {
        sampler,
        size_range,
        particles,
        instances,
        ..
    } = pool;
    sweep(particles, instances.matrices_mut(), sampler, *size_range, step, rng);
    instances.mark_dirty();
}

#[cfg(not(feature = "parallel"))]
fn sweep<R: Rng>(
    particles: &mut [Particle],
    matrices: &mut [Mat4],
    sampler: &SpawnSampler,
    size_range: (f64, f64),
    step: &AdvectionStep,
    rng: &mut R,
) {
    for (particle, matrix) in particles.iter_mut().zip(matrices.iter_mut()) {
        *matrix = advance_particle(particle, sampler, size_range, step, rng);
    }
}

/// Disjoint slot ranges, each with its own stream seeded in partition order,
/// so a given seed gives the same frame regardless of scheduling.
#[cfg(feature = "parallel")]
fn sweep<R: Rng>(
    particles: &mut [Particle],
    matrices: &mut [Mat4],
    sampler: &SpawnSampler,
    size_range: (f64, f64),
    step: &AdvectionStep,
    rng: &mut R,
) {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rayon::prelude::*;

    let seeds: Vec<u64> = (0..particles.len().div_ceil(PARTITION_SIZE))
        .map(|_| rng.random())
        .collect();

    particles
        .par_chunks_mut(PARTITION_SIZE)
        .zip(matrices.par_chunks_mut(PARTITION_SIZE))
        .zip(seeds.par_iter())
        .for_each(|((particles, matrices), &seed)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for (particle, matrix) in particles.iter_mut().zip(matrices.iter_mut()) {
                *matrix = advance_particle(particle, sampler, size_range, step, &mut rng);
            }
        });
}

/// Position the particle for this frame, then age or respawn it.
///
/// The returned transform uses the pre-respawn position.
fn advance_particle<R: Rng>(
    particle: &mut Particle,
    sampler: &SpawnSampler,
    size_range: (f64, f64),
    step: &AdvectionStep,
    rng: &mut R,
) -> Mat4 {
    let position = particle.position(step.drift_direction);

    let expired = particle.age as f64 >= step.lifetime_budget;
    if expired || rng.random::<f64>() < step.decay_probability {
        sampler.respawn(particle, rng);
    } else {
        particle.age = particle.age.saturating_add(1);
    }

    let size = random_range(
        rng,
        size_range.0 * step.base_size,
        size_range.1 * step.base_size,
    );
    InstanceBuffer::instance_matrix(position, size)
}
