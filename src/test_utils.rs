//! Test utilities for the comet tail simulation tests.
//!
//! Provides seeded random sources and small tail configurations, plus
//! assertions for the geometric envelopes the tails must respect.

use bevy::math::DVec3;

/// Fixtures for building small, reproducible simulations.
pub mod fixtures {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::tail::TailConfig;

    /// Deterministic random source for a test.
    pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// Default tail tuning with shrunken pools so tests stay fast.
    pub fn small_config(dust_capacity: usize, ion_capacity: usize) -> TailConfig {
        let mut config = TailConfig::default();
        config.dust.capacity = dust_capacity;
        config.ion.capacity = ion_capacity;
        config
    }
}

/// Assertions for the envelopes particles and angles must stay within.
pub mod assertions {
    use std::f64::consts::TAU;

    use super::*;

    /// True if `angle` lies in `[0, 2π)`.
    pub fn angle_wrapped(angle: f64) -> bool {
        (0.0..TAU).contains(&angle)
    }

    /// Assert that `point` lies inside the sphere of `radius` around the origin.
    ///
    /// # Panics
    /// Panics if the point is outside the sphere or not finite.
    pub fn assert_within_sphere(point: DVec3, radius: f64) {
        assert!(point.is_finite(), "Point is not finite: {point:?}");
        let distance = point.length();
        assert!(
            distance <= radius * (1.0 + 1e-12) + 1e-9,
            "Point outside sphere: distance={distance:.6e}, radius={radius:.6e}"
        );
    }

    /// Furthest a particle can reach: spawn envelope plus the longest
    /// possible straight-line drift.
    pub fn travel_envelope(
        radius: f64,
        noise: f64,
        max_speed: f64,
        lifetime_budget: f64,
        angular_spread: f64,
    ) -> f64 {
        let direction_length = 1.0 + 3f64.sqrt() * angular_spread;
        radius + noise + max_speed * lifetime_budget * direction_length
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    ///
    /// This app uses MinimalPlugins for a lightweight test environment.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = fixtures::seeded_rng(7);
        let mut b = fixtures::seeded_rng(7);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn test_small_config_only_changes_capacity() {
        let config = fixtures::small_config(3, 5);
        assert_eq!(config.dust.capacity, 3);
        assert_eq!(config.ion.capacity, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_angle_wrapped_bounds() {
        assert!(assertions::angle_wrapped(0.0));
        assert!(!assertions::angle_wrapped(std::f64::consts::TAU));
        assert!(!assertions::angle_wrapped(-0.1));
    }

    #[test]
    fn test_travel_envelope_without_spread() {
        assert_eq!(assertions::travel_envelope(10.0, 1.0, 2.0, 5.0, 0.0), 21.0);
    }
}
