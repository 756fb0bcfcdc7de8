//! The four fixed render pipelines.
//!
//! Every 3D pipeline reads the camera from bind group 0 and the entity (model
//! uniform plus textures) from bind group 1. The 2D pipeline only binds its
//! texture at group 0 since its quads are already in screen space.

use crate::{backend::PipelineKind, data_structures::texture::Texture, resources::texture::EntityLayouts};

pub mod basic;
pub mod bumpy;
pub mod flat;
pub mod sky;

/// Render pipelines of the scene, created once per surface format.
#[derive(Debug)]
pub struct Pipelines {
    pub flat: wgpu::RenderPipeline,
    pub basic: wgpu::RenderPipeline,
    pub bumpy: wgpu::RenderPipeline,
    pub sky: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        layouts: &EntityLayouts,
    ) -> Self {
        Self {
            flat: flat::mk_flat_pipeline(device, config, &layouts.flat),
            basic: basic::mk_basic_pipeline(device, config, camera_bind_group_layout, &layouts.basic),
            bumpy: bumpy::mk_bumpy_pipeline(device, config, camera_bind_group_layout, &layouts.bumpy),
            sky: sky::mk_sky_pipeline(device, config, camera_bind_group_layout, &layouts.basic),
        }
    }

    pub fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Flat => &self.flat,
            PipelineKind::Basic => &self.basic,
            PipelineKind::Bumpy => &self.bumpy,
            PipelineKind::Sky => &self.sky,
        }
    }
}

/// Depth state of opaque geometry: test and write.
pub fn opaque_depth() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: Texture::DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_stencil: wgpu::DepthStencilState,
    cull_mode: Option<wgpu::Face>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(depth_stencil),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
