//! Renderable entities.
//!
//! An [`Entity`] never owns the mesh or textures it draws with. It refers to
//! them by [`MeshId`] / [`TextureId`], indices into the resource tables of the
//! scene that created it, so the scene alone decides when resources are released.

use anyhow::ensure;
use cgmath::Vector2;

use crate::{
    backend::{Backend, BindingLayout, PipelineKind},
    camera::ClipSpace,
    data_structures::{
        text::{self, GlyphGrid},
        transform::Transform,
    },
};

/// Index of a mesh in the owning scene's mesh table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Index of a texture in the owning scene's texture table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) usize);

impl MeshId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl TextureId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A renderable unit: transform, resource references, optional label and the
/// binding state created for its pipeline.
///
/// For 2D entities `transform.position.xy` is the screen position in normalized
/// device coordinates and `transform.scale.x` the overlay scale.
#[derive(Debug)]
pub struct Entity<B> {
    name: String,
    pub transform: Transform,
    pub label: Option<String>,
    mesh: Option<MeshId>,
    textures: [Option<TextureId>; 2],
    layout: BindingLayout,
    pipeline: PipelineKind,
    binding: B,
}

impl<B> Entity<B> {
    /// Wrap an already created binding. Fails if the resources do not match
    /// what `layout` and `pipeline` expect.
    pub fn new(
        name: &str,
        pipeline: PipelineKind,
        layout: BindingLayout,
        mesh: Option<MeshId>,
        textures: &[TextureId],
        binding: B,
    ) -> anyhow::Result<Self> {
        ensure!(
            layout.fits(pipeline),
            "entity {name}: {layout:?} bindings cannot be drawn by the {pipeline:?} pipeline"
        );
        ensure!(
            layout.has_mesh() == mesh.is_some(),
            "entity {name}: {layout:?} bindings {} a mesh",
            if layout.has_mesh() { "require" } else { "take no" }
        );
        ensure!(
            textures.len() == layout.texture_count(),
            "entity {name}: {layout:?} bindings take {} texture(s), got {}",
            layout.texture_count(),
            textures.len()
        );
        let mut slots = [None; 2];
        slots
            .iter_mut()
            .zip(textures)
            .for_each(|(slot, id)| *slot = Some(*id));
        Ok(Self {
            name: name.to_string(),
            transform: Transform::new(),
            label: None,
            mesh,
            textures: slots,
            layout,
            pipeline,
            binding,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> Option<MeshId> {
        self.mesh
    }

    pub fn textures(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.textures.iter().flatten().copied()
    }

    pub fn layout(&self) -> BindingLayout {
        self.layout
    }

    pub fn pipeline(&self) -> PipelineKind {
        self.pipeline
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn is_flat(&self) -> bool {
        self.layout == BindingLayout::Flat
    }

    /// Recompute the model matrix and upload it.
    pub fn update_3d<K>(&self, backend: &mut K)
    where
        K: Backend<Binding = B>,
    {
        backend.write_model(&self.binding, &self.transform.to_uniform());
    }

    /// Recompute the screen-space quads (one sprite, or one glyph per label
    /// character) and upload them.
    pub fn update_2d<K>(&mut self, backend: &mut K, grid: GlyphGrid)
    where
        K: Backend<Binding = B>,
    {
        let clip: ClipSpace = backend.clip_space();
        let position = Vector2::new(self.transform.position.x, self.transform.position.y);
        let scale = self.transform.scale.x;
        let vertices = match &self.label {
            Some(label) => text::layout_label(position, scale, label, grid, clip),
            None => text::layout_sprite(position, scale, clip),
        };
        backend.write_quads(&mut self.binding, &vertices);
    }
}
