//! Star skybox around the comet.
//!
//! The sky rotates about y by the true anomaly, so the stars appear to turn
//! as the comet travels its orbit.

use std::f64::consts::TAU;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::simulation::{CometSimulation, SimulationSet};
use crate::tail::random_range;

/// Distance from the comet to the star shell.
pub const SKYBOX_RADIUS: f32 = 10_000_000.0;

/// Number of background stars.
pub const STAR_COUNT: usize = 2_000;

/// Fixed seed so the sky looks the same every run.
const STAR_SEED: u64 = 0x5ca1_ab1e;

/// Parent entity of every background star.
#[derive(Component)]
pub struct Skybox;

/// Plugin providing the background star shell.
pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_skybox)
            .add_systems(Update, rotate_skybox.in_set(SimulationSet::Publish));
    }
}

/// Uniformly distributed direction on the unit sphere.
pub fn star_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let y = random_range(rng, -1.0, 1.0);
    let theta = random_range(rng, 0.0, TAU);
    let ring = (1.0 - y * y).max(0.0).sqrt();
    Vec3::new((ring * theta.cos()) as f32, y as f32, (ring * theta.sin()) as f32)
}

/// Spawn the star shell with randomly placed stars.
fn spawn_skybox(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let star_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::WHITE * 0.5,
        unlit: true,
        ..default()
    });
    let star_mesh = meshes.add(Sphere::new(1.0));

    let mut rng = ChaCha8Rng::seed_from_u64(STAR_SEED);
    commands
        .spawn((Transform::default(), Visibility::default(), Skybox))
        .with_children(|sky| {
            for _ in 0..STAR_COUNT {
                let position = star_direction(&mut rng) * SKYBOX_RADIUS;
                let scale = random_range(&mut rng, 6_000.0, 18_000.0) as f32;
                sky.spawn((
                    Mesh3d(star_mesh.clone()),
                    MeshMaterial3d(star_material.clone()),
                    Transform::from_translation(position).with_scale(Vec3::splat(scale)),
                ));
            }
        });

    info!("Spawned {STAR_COUNT} background stars");
}

fn rotate_skybox(
    simulation: Option<Res<CometSimulation>>,
    mut skies: Query<&mut Transform, With<Skybox>>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    let rotation = Quat::from_rotation_y(simulation.orbit().true_anomaly as f32);
    for mut transform in &mut skies {
        transform.rotation = rotation;
    }
}
