//! Per-entity transformation data.
//!
//! A [`Transform`] is what the scene animates every frame; [`ModelUniform`] is
//! what ends up in the entity's uniform buffer for the vertex shaders.

use cgmath::{Euler, Matrix3, Matrix4, Quaternion, Rad, Vector3, Zero};

/// Position, rotation (Euler angles, applied X then Y then Z) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(Quaternion::from(self.rotation))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_uniform(&self) -> ModelUniform {
        let normal = Matrix4::from(Matrix3::from(Quaternion::from(self.rotation)));
        ModelUniform {
            model: self.to_matrix().into(),
            normal: normal.into(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

/**
 * The model uniform is the actual per-entity data stored on the GPU.
 *
 * The normal matrix is padded to a 4x4 matrix as WGSL's `mat3x3` has a
 * column stride of 16 bytes.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}
