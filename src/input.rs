//! Keyboard shortcuts for the comet tour.
//!
//! `[` and `]` halve and double the time acceleration, Space freezes and
//! resumes the scene, and R restarts the orbit.

use bevy::prelude::*;

use crate::simulation::{ResetSimulation, SimulationSet};
use crate::types::{MAX_TIME_ACCELERATION, MIN_TIME_ACCELERATION, TimeAcceleration};

/// Acceleration to restore when the scene is unfrozen.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct FrozenFrom(pub Option<TimeAcceleration>);

/// Plugin providing keyboard input handling.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrozenFrom>()
            .add_systems(Update, keyboard_shortcuts.in_set(SimulationSet::Input));
    }
}

/// Halve the acceleration, never below the minimum. Frozen stays frozen.
pub fn slower(acceleration: TimeAcceleration) -> TimeAcceleration {
    if acceleration.is_frozen() {
        return acceleration;
    }
    TimeAcceleration::clamped((acceleration.value() * 0.5).max(MIN_TIME_ACCELERATION))
}

/// Double the acceleration, never above the maximum. Frozen stays frozen.
pub fn faster(acceleration: TimeAcceleration) -> TimeAcceleration {
    if acceleration.is_frozen() {
        return acceleration;
    }
    TimeAcceleration::clamped((acceleration.value() * 2.0).min(MAX_TIME_ACCELERATION))
}

/// Handle keyboard shortcuts for simulation control.
fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut acceleration: ResMut<TimeAcceleration>,
    mut frozen_from: ResMut<FrozenFrom>,
    mut resets: MessageWriter<ResetSimulation>,
) {
    // Space: freeze or resume
    if keys.just_pressed(KeyCode::Space) {
        if acceleration.is_frozen() {
            *acceleration = frozen_from.0.take().unwrap_or_default();
            info!("Simulation resumed at {:.0}x", acceleration.value());
        } else {
            frozen_from.0 = Some(*acceleration);
            *acceleration = TimeAcceleration::FROZEN;
        }
    }

    if keys.just_pressed(KeyCode::BracketLeft) {
        *acceleration = slower(*acceleration);
        info!("Time acceleration: {:.0}x", acceleration.value());
    }

    if keys.just_pressed(KeyCode::BracketRight) {
        *acceleration = faster(*acceleration);
        info!("Time acceleration: {:.0}x", acceleration.value());
    }

    // R: restart the orbit and resample the tails
    if keys.just_pressed(KeyCode::KeyR) {
        resets.write(ResetSimulation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel(a: f64) -> TimeAcceleration {
        TimeAcceleration::new(a).unwrap()
    }

    #[test]
    fn test_slower_halves_down_to_minimum() {
        assert_eq!(slower(accel(400.0)), accel(200.0));
        assert_eq!(slower(accel(15.0)), accel(MIN_TIME_ACCELERATION));
        assert_eq!(slower(TimeAcceleration::FROZEN), TimeAcceleration::FROZEN);
    }

    #[test]
    fn test_faster_doubles_up_to_maximum() {
        assert_eq!(faster(accel(400.0)), accel(800.0));
        assert_eq!(faster(accel(15_000.0)), accel(MAX_TIME_ACCELERATION));
        assert_eq!(faster(TimeAcceleration::FROZEN), TimeAcceleration::FROZEN);
    }
}
