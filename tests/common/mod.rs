//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::prelude::*;
use comet_tour::simulation::SimulationSeed;
use comet_tour::tail::TailConfig;
use comet_tour::types::TimeAcceleration;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic random source.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Default tail tuning with shrunken pools.
pub fn small_config(dust_capacity: usize, ion_capacity: usize) -> TailConfig {
    let mut config = TailConfig::default();
    config.dust.capacity = dust_capacity;
    config.ion.capacity = ion_capacity;
    config
}

/// Validated acceleration, panicking on out-of-contract test input.
pub fn accel(value: f64) -> TimeAcceleration {
    TimeAcceleration::new(value).expect("test acceleration in contract")
}

/// Create a minimal Bevy app with small pools and a fixed seed.
///
/// Resources are inserted before any plugin so they override the defaults.
pub fn create_minimal_app(seed: u64) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(small_config(64, 32))
        .insert_resource(SimulationSeed(Some(seed)));
    app
}
