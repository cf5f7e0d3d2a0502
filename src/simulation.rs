//! Simulation context for the comet tour.
//!
//! Owns the orbital state and both tail pools, and advances them once per
//! frame. Nothing here runs until the comet asset reports ready, and a zero
//! time acceleration freezes the whole scene.

use bevy::math::DVec3;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::camera::{CameraDistance, SizeFeedback};
use crate::orbit::{OrbitParams, OrbitalState};
use crate::tail::{AdvectionStep, ParticlePool, ReconfigureStrategy, TailConfig, TailKind, advance};
use crate::types::{SimulationError, TimeAcceleration};

/// Per-frame ordering of simulation work.
///
/// Camera distance and control input are read first, then pools are
/// reconfigured, then stepped, and only then published to the renderer.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Configure,
    Step,
    Publish,
}

/// Whether the comet asset has finished loading. The simulation is gated on it.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CometReadiness {
    pub loaded: bool,
}

/// Fixed seed for reproducible runs. `None` draws one from the thread RNG.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationSeed(pub Option<u64>);

/// Message to restart the orbit and resample both tails.
#[derive(Message, Clone, Copy, Debug)]
pub struct ResetSimulation;

/// Collaborator inputs for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    pub camera_distance: f64,
    pub ready: bool,
}

/// What a call to [`CometSimulation::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Comet asset not loaded yet; nothing changed
    NotReady,
    /// Time acceleration is zero; nothing changed
    Frozen,
    /// Orbit and both tails advanced one frame
    Advanced,
}

/// Orbital state, both particle pools and the random source feeding them.
#[derive(Resource, Debug)]
pub struct CometSimulation {
    orbit: OrbitalState,
    orbit_params: OrbitParams,
    tails: TailConfig,
    size_feedback: SizeFeedback,
    acceleration: TimeAcceleration,
    /// Acceleration the pools were last sampled or rescaled for. Never zero.
    pool_acceleration: TimeAcceleration,
    dust: ParticlePool,
    ion: ParticlePool,
    rng: ChaCha8Rng,
    seed: u64,
    frame: u64,
}

impl CometSimulation {
    /// Build the simulation and seed both pools.
    ///
    /// A frozen acceleration is accepted; pools are then sampled at the
    /// default acceleration and the scene starts frozen.
    pub fn new(
        orbit_params: OrbitParams,
        tails: TailConfig,
        size_feedback: SizeFeedback,
        acceleration: TimeAcceleration,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        let pool_acceleration = if acceleration.is_frozen() {
            TimeAcceleration::default()
        } else {
            acceleration
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let dust = ParticlePool::new(TailKind::Dust, &tails, pool_acceleration, &mut rng)?;
        let ion = ParticlePool::new(TailKind::Ion, &tails, pool_acceleration, &mut rng)?;

        Ok(Self {
            orbit: OrbitalState::default(),
            orbit_params,
            tails,
            size_feedback,
            acceleration,
            pool_acceleration,
            dust,
            ion,
            rng,
            seed,
            frame: 0,
        })
    }

    /// Advance the orbit and both tails by one frame.
    pub fn step(&mut self, input: FrameInput) -> FrameOutcome {
        if !input.ready {
            return FrameOutcome::NotReady;
        }
        if self.acceleration.is_frozen() {
            return FrameOutcome::Frozen;
        }

        self.orbit.advance(&self.orbit_params, self.acceleration);

        let base_size = self.size_feedback.base_size(input.camera_distance);
        let dust_step = AdvectionStep::new(
            self.orbit.dust_drift_direction(),
            &self.tails,
            self.acceleration,
            base_size,
        );
        let ion_step = AdvectionStep::new(
            self.orbit.ion_drift_direction(),
            &self.tails,
            self.acceleration,
            base_size,
        );
        advance(&mut self.dust, &dust_step, &mut self.rng);
        advance(&mut self.ion, &ion_step, &mut self.rng);

        self.frame += 1;
        FrameOutcome::Advanced
    }

    /// Switch to a new time acceleration.
    ///
    /// Returns `true` when the pools were resampled or rescaled. Freezing
    /// leaves the pools untouched.
    pub fn reconfigure(&mut self, acceleration: TimeAcceleration) -> Result<bool, SimulationError> {
        if acceleration == self.acceleration {
            return Ok(false);
        }
        self.acceleration = acceleration;
        if acceleration.is_frozen() || acceleration == self.pool_acceleration {
            return Ok(false);
        }

        let from = self.pool_acceleration;
        match self.tails.reconfigure {
            ReconfigureStrategy::Reinitialize => {
                self.dust.reinitialize(&self.tails, acceleration, &mut self.rng)?;
                self.ion.reinitialize(&self.tails, acceleration, &mut self.rng)?;
            }
            ReconfigureStrategy::Rescale => {
                self.dust.rescale(&self.tails, from, acceleration)?;
                self.ion.rescale(&self.tails, from, acceleration)?;
            }
        }
        debug!(
            "Tails reconfigured ({:?}): lifetime budget {:.0} -> {:.0} frames",
            self.tails.reconfigure,
            self.tails.lifetime_budget(from),
            self.tails.lifetime_budget(acceleration),
        );
        self.pool_acceleration = acceleration;
        Ok(true)
    }

    /// Return the orbit to its start and resample both tails.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.orbit = OrbitalState::default();
        self.frame = 0;
        self.dust.reinitialize(&self.tails, self.pool_acceleration, &mut self.rng)?;
        self.ion.reinitialize(&self.tails, self.pool_acceleration, &mut self.rng)?;
        Ok(())
    }

    pub fn orbit(&self) -> &OrbitalState {
        &self.orbit
    }

    pub fn orbit_params(&self) -> &OrbitParams {
        &self.orbit_params
    }

    pub fn tail_config(&self) -> &TailConfig {
        &self.tails
    }

    pub fn acceleration(&self) -> TimeAcceleration {
        self.acceleration
    }

    /// Position of the light source relative to the comet.
    pub fn source_position(&self) -> DVec3 {
        self.orbit_params.source_position(self.orbit.true_anomaly)
    }

    /// Instance transforms that changed since the last call, dust then ion.
    pub fn publish_instances(&mut self) -> (Option<&[Mat4]>, Option<&[Mat4]>) {
        (
            self.dust.instances_mut().publish(),
            self.ion.instances_mut().publish(),
        )
    }

    pub fn pool(&self, kind: TailKind) -> &ParticlePool {
        match kind {
            TailKind::Dust => &self.dust,
            TailKind::Ion => &self.ion,
        }
    }

    /// Frames advanced since construction or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Plugin owning the simulation context and its per-frame step.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitParams>()
            .init_resource::<TailConfig>()
            .init_resource::<SizeFeedback>()
            .init_resource::<SimulationSeed>()
            .init_resource::<CometReadiness>()
            .init_resource::<CameraDistance>()
            .init_resource::<TimeAcceleration>()
            .add_message::<ResetSimulation>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Input,
                    SimulationSet::Configure,
                    SimulationSet::Step,
                    SimulationSet::Publish,
                )
                    .chain(),
            )
            .add_systems(Startup, setup_simulation)
            .add_systems(
                Update,
                (
                    reset_simulation.in_set(SimulationSet::Configure),
                    step_simulation.in_set(SimulationSet::Step),
                ),
            );
    }
}

/// Build the simulation from the configured resources.
fn setup_simulation(
    mut commands: Commands,
    orbit_params: Res<OrbitParams>,
    tails: Res<TailConfig>,
    size_feedback: Res<SizeFeedback>,
    seed: Res<SimulationSeed>,
    acceleration: Res<TimeAcceleration>,
) {
    let seed = seed.0.unwrap_or_else(|| rand::rng().random());
    match CometSimulation::new(
        orbit_params.clone(),
        tails.clone(),
        size_feedback.clone(),
        *acceleration,
        seed,
    ) {
        Ok(simulation) => {
            info!(
                "Comet simulation ready: {} dust + {} ion particles (seed {})",
                simulation.pool(TailKind::Dust).len(),
                simulation.pool(TailKind::Ion).len(),
                seed
            );
            commands.insert_resource(simulation);
        }
        Err(err) => error!("Cannot build comet simulation: {err}"),
    }
}

/// Advance the simulation once per rendered frame.
fn step_simulation(
    simulation: Option<ResMut<CometSimulation>>,
    readiness: Res<CometReadiness>,
    distance: Res<CameraDistance>,
) {
    let Some(mut simulation) = simulation else {
        return;
    };
    simulation.step(FrameInput {
        camera_distance: distance.0,
        ready: readiness.loaded,
    });
}

/// Restart the orbit and resample the tails on request.
fn reset_simulation(
    mut resets: MessageReader<ResetSimulation>,
    simulation: Option<ResMut<CometSimulation>>,
) {
    if resets.read().count() == 0 {
        return;
    }
    let Some(mut simulation) = simulation else {
        return;
    };

    info!("Resetting comet simulation...");
    if let Err(err) = simulation.reset() {
        warn!("Comet simulation reset failed: {err}");
    }
}
