//! Property-based tests for the tail simulation using proptest.
//!
//! These tests check the sampling envelopes and lifetime rules across a wide
//! range of radii, noise levels and accelerations.

use std::f64::consts::TAU;

use bevy::math::DVec3;
use proptest::prelude::*;

use super::{AdvectionStep, ParticlePool, SpawnSampler, TailKind, advance, lifetime_budget};
use crate::camera::SizeFeedback;
use crate::orbit::{OrbitParams, OrbitalState};
use crate::test_utils::{assertions, fixtures};
use crate::types::{MAX_TIME_ACCELERATION, MIN_TIME_ACCELERATION, TimeAcceleration};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Fresh spawn points never leave `radius + noise`.
    #[test]
    fn prop_spawn_containment(
        radius in 0.0f64..100_000.0,
        noise in 0.0f64..5_000.0,
        seed in any::<u64>(),
    ) {
        let sampler = SpawnSampler { radius, noise, angular_spread: 0.2 };
        let mut rng = fixtures::seeded_rng(seed);
        for _ in 0..200 {
            let origin = sampler.sample_origin(&mut rng);
            prop_assert!(origin.is_finite());
            prop_assert!(
                origin.length() <= sampler.envelope() * (1.0 + 1e-12) + 1e-9,
                "spawn at {} outside envelope {}", origin.length(), sampler.envelope()
            );
        }
    }

    /// Both angles stay in `[0, 2π)` for any run of in-contract accelerations.
    #[test]
    fn prop_angles_stay_wrapped(
        accelerations in proptest::collection::vec(0.0f64..=MAX_TIME_ACCELERATION, 1..400),
    ) {
        let params = OrbitParams::default();
        let mut state = OrbitalState::default();
        for a in accelerations {
            state.advance(&params, TimeAcceleration::new(a).unwrap());
            prop_assert!(assertions::angle_wrapped(state.true_anomaly));
            prop_assert!(assertions::angle_wrapped(state.body_rotation));
        }
    }

    /// Budget halves when the acceleration doubles.
    #[test]
    fn prop_budget_scales_inversely(a in MIN_TIME_ACCELERATION..MAX_TIME_ACCELERATION) {
        let max_tail_time = 25_000.0;
        let single = lifetime_budget(max_tail_time, TimeAcceleration::new(a).unwrap());
        let double = lifetime_budget(max_tail_time, TimeAcceleration::new(2.0 * a).unwrap());
        prop_assert!((single / double - 2.0).abs() < 1e-9);
        prop_assert!((single - max_tail_time * 100.0 / a).abs() <= single * 1e-12);
    }

    /// No particle is ever older than the budget without respawning that step.
    #[test]
    fn prop_lifetime_bound(
        a in 2_000.0f64..MAX_TIME_ACCELERATION,
        seed in any::<u64>(),
    ) {
        let config = fixtures::small_config(16, 16);
        let acceleration = TimeAcceleration::new(a).unwrap();
        let mut rng = fixtures::seeded_rng(seed);
        let mut pool = ParticlePool::new(TailKind::Ion, &config, acceleration, &mut rng).unwrap();
        let step = AdvectionStep::new(DVec3::X, &config, acceleration, 100.0);
        let frames = (step.lifetime_budget * 3.0) as usize + 1;
        for _ in 0..frames {
            let ages: Vec<u32> = pool.particles().iter().map(|p| p.age).collect();
            advance(&mut pool, &step, &mut rng);
            for (old, new) in ages.iter().zip(pool.particles()) {
                if *old as f64 >= step.lifetime_budget {
                    prop_assert_eq!(new.age, 0);
                }
                prop_assert!(new.age as f64 <= step.lifetime_budget.ceil());
            }
        }
    }

    /// Base size is the floor anywhere up to `reference + floor * divisor`.
    #[test]
    fn prop_size_floor_boundary(fraction in 0.0f64..=1.0) {
        let feedback = SizeFeedback::default();
        let threshold = feedback.reference_distance + feedback.size_floor * feedback.scale_divisor;
        let distance = threshold * fraction;
        prop_assert_eq!(feedback.base_size(distance), feedback.size_floor);
    }

    /// Drift directions are unit length for any anomaly.
    #[test]
    fn prop_drift_directions_unit(anomaly in 0.0f64..TAU) {
        let state = OrbitalState { true_anomaly: anomaly, body_rotation: 0.0 };
        prop_assert!((state.dust_drift_direction().length() - 1.0).abs() < 1e-12);
        prop_assert!((state.ion_drift_direction().length() - 1.0).abs() < 1e-12);
    }
}
