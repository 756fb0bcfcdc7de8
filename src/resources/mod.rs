use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use anyhow::Context as _;
use wgpu::util::DeviceExt;

use crate::data_structures::model;

/**
 * This module contains all logic for loading meshes and textures from external files.
 */
pub mod mesh;
pub mod texture;

pub fn load_string(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

pub fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Parse an OBJ file into vertices and indices. Material libraries are ignored;
/// the scene binds its textures explicitly.
pub fn load_obj(path: &Path) -> anyhow::Result<Vec<tobj::Model>> {
    let obj_text = load_string(path)?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .with_context(|| format!("{} is not a valid OBJ file", path.display()))?;
    anyhow::ensure!(!models.is_empty(), "{} contains no geometry", path.display());
    Ok(models)
}

/// Load every object of an OBJ file into a single GPU mesh.
pub fn load_model_obj(
    path: &Path,
    generate_tangents: bool,
    device: &wgpu::Device,
) -> anyhow::Result<model::Mesh> {
    let models = load_obj(path)?;
    let (vertices, indices) = mesh::build_geometry(&models, generate_tangents);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    log::debug!(
        "Loaded {} with {} vertices and {} triangles (tangents: {})",
        name,
        vertices.len(),
        indices.len() / 3,
        generate_tangents
    );

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Ok(model::Mesh {
        name,
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
    })
}
