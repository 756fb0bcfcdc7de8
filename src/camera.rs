//! Camera math: projection, the orbiting demo camera and its GPU uniform.

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad, Vector3, perspective};

/// cgmath produces OpenGL clip space (z in -1..1) while wgpu and Vulkan expect
/// depth in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Direction of the clip-space Y axis of a render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipSpace {
    /// +Y points up (wgpu, OpenGL, D3D, Metal).
    YUp,
    /// +Y points down (raw Vulkan); projections must flip the vertical axis.
    YDown,
}

/// Perspective projection with a fixed vertical field of view.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    /// A zero-sized viewport falls back to a square aspect.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect_of(width, height).unwrap_or(1.0),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Keeps the previous aspect while either dimension is 0 (minimized window).
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(aspect) = aspect_of(width, height) {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// The projection matrix for a target with the given clip space.
    ///
    /// For [`ClipSpace::YDown`] the Y scale term is negated, the same
    /// `m[1][1] *= -1` every Vulkan renderer applies to a GL-style projection.
    pub fn calc_matrix(&self, clip: ClipSpace) -> Matrix4<f32> {
        let mut matrix =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        if clip == ClipSpace::YDown {
            matrix[1][1] *= -1.0;
        }
        matrix
    }
}

fn aspect_of(width: u32, height: u32) -> Option<f32> {
    (width > 0 && height > 0).then(|| width as f32 / height as f32)
}

/// A camera circling the scene at a fixed height while looking at a fixed target.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub radius: f32,
    pub height: f32,
    /// Centre of the circle the camera travels on (ignoring height).
    pub centre: Vector3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Radians travelled per second of scene time.
    pub angular_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 5.0,
            height: 2.0,
            centre: Vector3::new(0.0, 0.0, 3.0),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            angular_speed: 0.5,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self, seconds: f32) -> Point3<f32> {
        let angle = seconds * self.angular_speed;
        Point3::new(
            self.centre.x + self.radius * angle.sin(),
            self.centre.y + self.height,
            self.centre.z + self.radius * angle.cos(),
        )
    }

    pub fn view_matrix(&self, eye: Point3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(eye, self.target, self.up)
    }
}

/// Camera data as seen by the shaders (bind group 0 of every 3D pipeline).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(
        &mut self,
        eye: Point3<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
    ) {
        self.view_position = eye.to_homogeneous().into();
        self.view_proj = (projection * view).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
