//! Comet nucleus and sun rendering.
//!
//! Loads the comet model, opens the readiness gate once it is available, and
//! poses the nucleus and the sun from the orbital state every frame.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::simulation::{CometReadiness, CometSimulation, SimulationSet};
use crate::types::{AXIAL_TILT, SUN_DIAMETER};

/// glTF scene of the comet nucleus, relative to the asset folder.
pub const COMET_MODEL_PATH: &str = "models/comet_67p.glb";

/// Radius of the stand-in sphere used when the model cannot be loaded.
pub const COMET_PLACEHOLDER_RADIUS: f32 = 2_000.0;

/// Render radius of the sun sphere, the full reference diameter.
pub const SUN_RADIUS: f32 = SUN_DIAMETER as f32;

/// Sun colour (#ffdd00).
const SUN_COLOR: Color = Color::srgb(1.0, 0.867, 0.0);

/// Marker for the comet nucleus.
#[derive(Component)]
pub struct Comet;

/// Marker for the sun sphere.
#[derive(Component)]
pub struct Sun;

/// Marker for the light cast by the sun.
#[derive(Component)]
pub struct Sunlight;

/// Handle to the comet scene being loaded.
#[derive(Resource, Clone, Debug)]
pub struct CometModel(pub Handle<Scene>);

/// Plugin providing the comet and sun entities.
pub struct CometBodyPlugin;

impl Plugin for CometBodyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_comet, spawn_sun))
            .add_systems(
                Update,
                (
                    track_comet_readiness.in_set(SimulationSet::Input),
                    (orient_comet, place_sun).in_set(SimulationSet::Publish),
                ),
            );
    }
}

/// Nucleus orientation: tilted about z, spun about y.
pub fn comet_rotation(body_rotation: f64) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        0.0,
        body_rotation as f32,
        -AXIAL_TILT as f32,
    )
}

fn spawn_comet(mut commands: Commands, asset_server: Res<AssetServer>) {
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(COMET_MODEL_PATH));
    commands.spawn((
        SceneRoot(scene.clone()),
        Transform::from_rotation(comet_rotation(0.0)),
        Comet,
    ));
    commands.insert_resource(CometModel(scene));
    info!("Loading comet model from {COMET_MODEL_PATH}...");
}

fn spawn_sun(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(SUN_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: SUN_COLOR,
            emissive: SUN_COLOR.to_linear() * 4.0,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Sun,
    ));

    // The sun is millions of units away; a directional light aimed from it
    // stands in for a point light with that reach.
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
        Sunlight,
    ));
}

/// Open the readiness gate once the comet scene and its dependencies load.
///
/// A failed load swaps in a placeholder sphere and opens the gate anyway.
fn track_comet_readiness(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    model: Option<Res<CometModel>>,
    comets: Query<Entity, With<Comet>>,
    mut readiness: ResMut<CometReadiness>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if readiness.loaded {
        return;
    }
    let Some(model) = model else {
        return;
    };

    if asset_server.is_loaded_with_dependencies(&model.0) {
        readiness.loaded = true;
        info!("Comet model loaded");
        return;
    }

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&model.0) {
        warn!("Comet model failed to load ({err}), using placeholder");
        let mesh = meshes.add(Sphere::new(COMET_PLACEHOLDER_RADIUS));
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.33, 0.3),
            perceptual_roughness: 1.0,
            ..default()
        });
        for entity in &comets {
            commands
                .entity(entity)
                .remove::<SceneRoot>()
                .insert((Mesh3d(mesh.clone()), MeshMaterial3d(material.clone())));
        }
        readiness.loaded = true;
    }
}

fn orient_comet(
    simulation: Option<Res<CometSimulation>>,
    mut comets: Query<&mut Transform, With<Comet>>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    let rotation = comet_rotation(simulation.orbit().body_rotation);
    for mut transform in &mut comets {
        transform.rotation = rotation;
    }
}

/// Move the sun to the source position and aim its light at the nucleus.
fn place_sun(
    simulation: Option<Res<CometSimulation>>,
    mut suns: Query<&mut Transform, (With<Sun>, Without<Sunlight>)>,
    mut lights: Query<&mut Transform, (With<Sunlight>, Without<Sun>)>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    let source = simulation.source_position().as_vec3();

    for mut transform in &mut suns {
        transform.translation = source;
    }
    for mut transform in &mut lights {
        *transform = Transform::from_translation(source).looking_at(Vec3::ZERO, Vec3::Y);
    }
}
