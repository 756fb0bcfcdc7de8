use std::path::Path;

use image::ImageFormat;

use crate::{
    backend::BindingLayout,
    data_structures::{texture, transform::ModelUniform},
};

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn model_uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniform>() as u64),
        },
        count: None,
    }
}

/// Group 1 of the basic and sky pipelines: model uniform, colour texture, sampler.
pub fn basic_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[model_uniform_entry(0), texture_entry(1), sampler_entry(2)],
        label: Some("basic entity_bind_group_layout"),
    })
}

/// Group 1 of the bumpy pipeline: model uniform, colour texture and sampler,
/// normal map and sampler.
pub fn bumpy_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            model_uniform_entry(0),
            texture_entry(1),
            sampler_entry(2),
            texture_entry(3),
            sampler_entry(4),
        ],
        label: Some("bumpy entity_bind_group_layout"),
    })
}

/// Group 0 of the 2D pipeline: texture and sampler only, the quads are
/// already in screen space.
pub fn flat_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[texture_entry(0), sampler_entry(1)],
        label: Some("flat texture_bind_group_layout"),
    })
}

/// All entity bind group layouts, created once per device.
#[derive(Debug)]
pub struct EntityLayouts {
    pub basic: wgpu::BindGroupLayout,
    pub bumpy: wgpu::BindGroupLayout,
    pub flat: wgpu::BindGroupLayout,
}

impl EntityLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            basic: basic_layout(device),
            bumpy: bumpy_layout(device),
            flat: flat_layout(device),
        }
    }

    pub fn get(&self, layout: BindingLayout) -> &wgpu::BindGroupLayout {
        match layout {
            BindingLayout::Basic => &self.basic,
            BindingLayout::Bumpy => &self.bumpy,
            BindingLayout::Flat => &self.flat,
        }
    }
}

pub fn load_texture(
    path: &Path,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = super::load_binary(path)?;
    let label = path.display().to_string();
    // the extension is only a hint, the decoder sniffs the data otherwise
    let format = ImageFormat::from_path(path).ok();
    texture::Texture::from_bytes(device, queue, &data, &label, format, is_normal_map)
}
