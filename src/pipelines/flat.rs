use crate::{
    data_structures::{
        model::{FlatVertex, Vertex},
        texture::Texture,
    },
    pipelines::mk_render_pipeline,
};

/**
 * Screen-space overlays (logo and text). Quads arrive in normalized device
 * coordinates and are blended over the frame.
 *
 * Overlays are drawn before the 3D geometry. They write the nearest depth
 * without testing, and the fragment shader discards transparent texels, so the
 * meshes drawn afterwards cannot cover them while the empty parts of a glyph
 * cell stay see-through.
 */
pub fn mk_flat_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Flat Pipeline Layout"),
        bind_group_layouts: &[texture_bind_group_layout],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Flat Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("flat.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        "Flat Pipeline",
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState {
            color: wgpu::BlendComponent::OVER,
            alpha: wgpu::BlendComponent::OVER,
        }),
        wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        },
        None,
        &[FlatVertex::desc()],
        shader,
    )
}
