//! Orbit camera and camera-distance feedback for the comet tour.
//!
//! The camera orbits the nucleus without panning. Its distance drives the
//! base size of tail instances so the tails stay visible when zoomed out.

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
};

use crate::simulation::SimulationSet;

/// Initial camera distance along each axis, and the reference distance for
/// particle sizing.
pub const DEFAULT_CAMERA_DIST: f64 = 20_000.0;

/// Closest the user can zoom to the nucleus.
pub const MIN_ZOOM_DIST: f32 = 4_000.0;

/// Furthest the user can zoom from the nucleus.
pub const MAX_ZOOM_DIST: f32 = 1_500_000.0;

/// Far clipping plane; far enough to include the sun at aphelion.
pub const CAMERA_FAR: f32 = 51_000_000.0;

/// Camera distance units per unit of particle size.
pub const SIZE_SCALE_DIVISOR: f64 = 250.0;

/// Smallest base particle size.
pub const PARTICLE_SIZE_FLOOR: f64 = 100.0;

/// Zoom speed multiplier for scroll wheel.
pub const ZOOM_SPEED: f32 = 0.1;

/// Radians of orbit per pixel of mouse drag.
pub const ORBIT_SPEED: f32 = 0.005;

/// Pitch limit, just short of the poles.
const MAX_PITCH: f32 = 1.55;

/// Maps camera distance to the base size of tail instances.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SizeFeedback {
    pub reference_distance: f64,
    pub scale_divisor: f64,
    pub size_floor: f64,
}

impl Default for SizeFeedback {
    fn default() -> Self {
        Self {
            reference_distance: DEFAULT_CAMERA_DIST,
            scale_divisor: SIZE_SCALE_DIVISOR,
            size_floor: PARTICLE_SIZE_FLOOR,
        }
    }
}

impl SizeFeedback {
    /// `max((distance - reference) / divisor, floor)`
    pub fn base_size(&self, camera_distance: f64) -> f64 {
        ((camera_distance - self.reference_distance) / self.scale_divisor).max(self.size_floor)
    }
}

/// Current distance from the camera to the nucleus.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct CameraDistance(pub f64);

impl Default for CameraDistance {
    fn default() -> Self {
        Self(DEFAULT_CAMERA_DIST)
    }
}

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Spherical orbit around the nucleus.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub distance: f32,
    /// Rotation about +y, measured from +z towards +x
    pub yaw: f32,
    /// Elevation above the xz-plane
    pub pitch: f32,
}

impl OrbitCamera {
    pub fn from_position(position: Vec3) -> Self {
        let distance = position.length();
        Self {
            distance,
            yaw: position.x.atan2(position.z),
            pitch: (position.y / distance).asin(),
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }
}

/// Plugin providing the orbit camera.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraDistance>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (camera_zoom, camera_orbit, apply_orbit_camera)
                    .chain()
                    .in_set(SimulationSet::Input),
            );
    }
}

/// Spawn the main camera with a perspective projection.
fn setup_camera(mut commands: Commands) {
    let start = Vec3::splat(DEFAULT_CAMERA_DIST as f32);
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            near: 10.0,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::from_position(start),
        MainCamera,
    ));
}

/// Handle mouse scroll wheel for zoom.
fn camera_zoom(
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mut cameras: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    if mouse_scroll.delta.y == 0.0 {
        return;
    }

    let Ok(mut orbit) = cameras.single_mut() else {
        return;
    };

    // Logarithmic zoom: multiply distance by factor based on scroll direction
    let zoom_factor = (1.0 - mouse_scroll.delta.y * ZOOM_SPEED).max(0.1);
    orbit.distance = (orbit.distance * zoom_factor).clamp(MIN_ZOOM_DIST, MAX_ZOOM_DIST);
}

/// Handle left mouse button drag for orbiting.
fn camera_orbit(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut cameras: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    if !mouse_buttons.pressed(MouseButton::Left) || mouse_motion.delta == Vec2::ZERO {
        return;
    }

    let Ok(mut orbit) = cameras.single_mut() else {
        return;
    };

    orbit.yaw -= mouse_motion.delta.x * ORBIT_SPEED;
    orbit.pitch = (orbit.pitch + mouse_motion.delta.y * ORBIT_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
}

/// Place the camera on its orbit and publish its distance.
fn apply_orbit_camera(
    mut cameras: Query<(&OrbitCamera, &mut Transform), (With<MainCamera>, Changed<OrbitCamera>)>,
    mut distance: ResMut<CameraDistance>,
) {
    for (orbit, mut transform) in &mut cameras {
        *transform = Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y);
        distance.0 = orbit.distance as f64;
    }
}
