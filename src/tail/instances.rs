//! Per-instance transforms handed to the renderer.

use bevy::math::DVec3;
use bevy::prelude::*;

/// One transform per pool slot, plus a dirty flag the renderer clears when
/// it consumes the buffer.
#[derive(Clone, Debug, Default)]
pub struct InstanceBuffer {
    matrices: Vec<Mat4>,
    dirty: bool,
}

impl InstanceBuffer {
    /// Buffer of `capacity` collapsed (zero-scale) instances.
    pub fn new(capacity: usize) -> Self {
        Self {
            matrices: vec![Mat4::from_scale(Vec3::ZERO); capacity],
            dirty: true,
        }
    }

    /// Uniformly scaled, unrotated instance at `position`.
    pub fn instance_matrix(position: DVec3, size: f64) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(size as f32),
            Quat::IDENTITY,
            position.as_vec3(),
        )
    }

    pub(super) fn matrices_mut(&mut self) -> &mut [Mat4] {
        &mut self.matrices
    }

    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Translation of instance `index`.
    pub fn translation(&self, index: usize) -> Option<Vec3> {
        self.matrices.get(index).map(|m| m.w_axis.truncate())
    }

    /// Uniform scale of instance `index`.
    pub fn scale(&self, index: usize) -> Option<f32> {
        self.matrices.get(index).map(|m| m.x_axis.x)
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hand the transforms to the renderer if they changed since the last call.
    pub fn publish(&mut self) -> Option<&[Mat4]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(&self.matrices)
    }
}
