//! Time acceleration handling for the comet tour.
//!
//! Propagates changes of the user-controlled time acceleration into the
//! simulation, which resamples or rescales its tails accordingly.

use bevy::prelude::*;

use crate::simulation::{CometSimulation, SimulationSet};
use crate::types::TimeAcceleration;

/// Plugin applying time acceleration changes to the simulation.
pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TimeAcceleration>().add_systems(
            Update,
            apply_time_acceleration.in_set(SimulationSet::Configure),
        );
    }
}

/// Reconfigure the tails whenever the acceleration resource changes.
///
/// Runs before the step so the new budget applies to this frame.
fn apply_time_acceleration(
    acceleration: Res<TimeAcceleration>,
    simulation: Option<ResMut<CometSimulation>>,
) {
    if !acceleration.is_changed() {
        return;
    }
    let Some(mut simulation) = simulation else {
        return;
    };

    match simulation.reconfigure(*acceleration) {
        Ok(_) if acceleration.is_frozen() => info!("Simulation frozen"),
        Ok(_) => {}
        Err(err) => warn!("Cannot apply time acceleration: {err}"),
    }
}
