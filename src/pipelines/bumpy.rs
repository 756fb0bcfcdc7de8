use crate::{
    data_structures::model::{self, Vertex},
    pipelines::{mk_render_pipeline, opaque_depth},
};

/// Normal-mapped meshes. Needs meshes loaded with tangents.
pub fn mk_bumpy_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    entity_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Bumpy Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, entity_bind_group_layout],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Bumpy Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("bumpy.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        "Bumpy Pipeline",
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        opaque_depth(),
        Some(wgpu::Face::Back),
        &[model::ModelVertex::desc()],
        shader,
    )
}
