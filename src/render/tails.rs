//! Dust and ion tail rendering.
//!
//! Every pool slot is an entity sharing one mesh and one material per tail.
//! Published instance transforms are copied onto those entities in parallel.

use bevy::prelude::*;

use crate::simulation::{CometSimulation, SimulationSet};
use crate::tail::{TailConfig, TailKind};

/// Radius of the particle mesh before instance scaling.
pub const TAIL_PARTICLE_RADIUS: f32 = 0.2;

/// One pool slot of a tail.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TailParticle {
    pub kind: TailKind,
    pub index: usize,
}

/// Plugin providing tail particle entities.
pub struct TailRenderPlugin;

impl Plugin for TailRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_tails)
            .add_systems(Update, sync_tail_instances.in_set(SimulationSet::Publish));
    }
}

/// Tail colour: dust #dddddd, ion #8888ff.
pub fn tail_color(kind: TailKind) -> Color {
    match kind {
        TailKind::Dust => Color::srgb_u8(0xdd, 0xdd, 0xdd),
        TailKind::Ion => Color::srgb_u8(0x88, 0x88, 0xff),
    }
}

/// Transform equivalent to an instance matrix (uniform scale, no rotation).
pub fn instance_transform(matrix: &Mat4) -> Transform {
    Transform {
        translation: matrix.w_axis.truncate(),
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(matrix.x_axis.x),
    }
}

/// Spawn one collapsed entity per pool slot.
fn spawn_tails(
    mut commands: Commands,
    config: Res<TailConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let mesh = meshes.add(Sphere::new(TAIL_PARTICLE_RADIUS).mesh().ico(0)?);

    for kind in TailKind::ALL {
        let material = materials.add(StandardMaterial {
            base_color: tail_color(kind),
            unlit: true,
            ..default()
        });
        let capacity = config.params(kind).capacity;
        let mesh = mesh.clone();
        commands.spawn_batch((0..capacity).map(move |index| {
            (
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_scale(Vec3::ZERO),
                TailParticle { kind, index },
            )
        }));
        info!("Spawned {capacity} {kind} tail particles");
    }
    Ok(())
}

/// Copy changed instance transforms onto the particle entities.
fn sync_tail_instances(
    simulation: Option<ResMut<CometSimulation>>,
    mut particles: Query<(&TailParticle, &mut Transform)>,
) {
    let Some(mut simulation) = simulation else {
        return;
    };
    let (dust, ion) = simulation.publish_instances();
    if dust.is_none() && ion.is_none() {
        return;
    }

    particles.par_iter_mut().for_each(|(particle, mut transform)| {
        let frame = match particle.kind {
            TailKind::Dust => dust,
            TailKind::Ion => ion,
        };
        if let Some(matrix) = frame.and_then(|matrices| matrices.get(particle.index)) {
            *transform = instance_transform(matrix);
        }
    });
}
