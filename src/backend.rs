//! The seams between the scene and whatever renders it.
//!
//! [`Backend`] covers everything the scene needs outside of a render pass:
//! loading resources, creating per-entity bindings and uploading per-frame
//! data. [`DrawTarget`] covers the render pass itself. `crate::context`
//! implements both for wgpu.

use std::path::Path;

use cgmath::{Matrix4, Point3};

pub use crate::camera::ClipSpace;
use crate::data_structures::{model::FlatVertex, transform::ModelUniform};

/// The four fixed pipelines, in the order the scene draws them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Screen-space textured quads (logo and text).
    Flat,
    /// Textured, lit meshes.
    Basic,
    /// Textured, normal-mapped meshes.
    Bumpy,
    /// A cube drawn at the far plane around the camera.
    Sky,
}

impl PipelineKind {
    pub const DRAW_ORDER: [PipelineKind; 4] = [
        PipelineKind::Flat,
        PipelineKind::Basic,
        PipelineKind::Bumpy,
        PipelineKind::Sky,
    ];
}

/// Resource layout an entity is bound with at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingLayout {
    /// Model uniform + one colour texture.
    Basic,
    /// Model uniform + colour texture + normal map.
    Bumpy,
    /// One texture, geometry supplied as screen-space quads.
    Flat,
}

impl BindingLayout {
    pub fn texture_count(&self) -> usize {
        match self {
            BindingLayout::Basic | BindingLayout::Flat => 1,
            BindingLayout::Bumpy => 2,
        }
    }

    pub fn has_mesh(&self) -> bool {
        !matches!(self, BindingLayout::Flat)
    }

    /// Whether a pipeline can consume bindings of this layout.
    pub fn fits(&self, pipeline: PipelineKind) -> bool {
        matches!(
            (self, pipeline),
            (BindingLayout::Flat, PipelineKind::Flat)
                | (BindingLayout::Basic, PipelineKind::Basic)
                | (BindingLayout::Basic, PipelineKind::Sky)
                | (BindingLayout::Bumpy, PipelineKind::Bumpy)
        )
    }
}

/// Resource creation and per-frame uploads.
pub trait Backend {
    type Mesh;
    type Texture;
    type Binding;

    /// Load a mesh, computing tangents and bitangents when `generate_tangents` is set.
    fn load_mesh(&mut self, path: &Path, generate_tangents: bool) -> anyhow::Result<Self::Mesh>;

    /// Load a texture; normal maps are kept in linear colour space.
    fn load_texture(&mut self, path: &Path, is_normal_map: bool) -> anyhow::Result<Self::Texture>;

    /// Create the per-entity binding state. `textures` must match `layout.texture_count()`.
    fn create_binding(
        &mut self,
        label: &str,
        layout: BindingLayout,
        textures: &[&Self::Texture],
    ) -> anyhow::Result<Self::Binding>;

    /// Current render target size in pixels.
    fn viewport(&self) -> (u32, u32);

    fn clip_space(&self) -> ClipSpace;

    fn set_camera(&mut self, eye: Point3<f32>, view: Matrix4<f32>, projection: Matrix4<f32>);

    fn write_model(&mut self, binding: &Self::Binding, uniform: &ModelUniform);

    fn write_quads(&mut self, binding: &mut Self::Binding, vertices: &[FlatVertex]);
}

/// Pipeline selection and draw calls within a single render pass.
pub trait DrawTarget<B: Backend + ?Sized> {
    fn use_pipeline(&mut self, pipeline: PipelineKind);

    fn draw(&mut self, mesh: Option<&B::Mesh>, binding: &B::Binding);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pipeline_accepts_exactly_one_layout() {
        let layouts = [BindingLayout::Basic, BindingLayout::Bumpy, BindingLayout::Flat];
        for pipeline in PipelineKind::DRAW_ORDER {
            let fitting = layouts.iter().filter(|l| l.fits(pipeline)).count();
            assert_eq!(fitting, 1, "{pipeline:?}");
        }
    }

    #[test]
    fn flat_bindings_have_no_mesh() {
        assert!(!BindingLayout::Flat.has_mesh());
        assert!(BindingLayout::Basic.has_mesh());
        assert_eq!(BindingLayout::Bumpy.texture_count(), 2);
    }
}
