//! GPU state of the window and the wgpu implementation of [`Backend`].
//!
//! [`Context`] owns the surface, device and queue together with everything
//! shared by all entities: the camera uniform, the entity bind group layouts,
//! the four render pipelines and the depth buffer. A [`Frame`] wraps one open
//! render pass and is what the scene draws into.

use std::{path::Path, sync::Arc};

use anyhow::Context as _;
use cgmath::{Matrix4, Point3};
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    backend::{Backend, BindingLayout, ClipSpace, DrawTarget, PipelineKind},
    camera::CameraUniform,
    data_structures::{
        model::{self, DrawMesh, FlatVertex},
        text::VERTICES_PER_QUAD,
        texture,
        transform::{ModelUniform, Transform},
    },
    pipelines::Pipelines,
    resources::{self, texture::EntityLayouts},
};

/// Most quads a single 2D binding can hold. Longer labels are cut off.
pub const MAX_QUADS: usize = 64;

const MAX_FLAT_VERTICES: usize = MAX_QUADS * VERTICES_PER_QUAD;

/// Screen-space vertex buffer of a 2D entity and the number of vertices in use.
#[derive(Debug)]
pub struct QuadBuffer {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

/// Per-entity GPU state: the bind group for its pipeline plus either a model
/// uniform (3D) or a quad buffer (2D).
#[derive(Debug)]
pub struct GpuBinding {
    pub layout: BindingLayout,
    pub uniform: Option<wgpu::Buffer>,
    pub bind_group: wgpu::BindGroup,
    pub quads: Option<QuadBuffer>,
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera_uniform: CameraUniform,
    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,
    pub layouts: EntityLayouts,
    pub pipelines: Pipelines,
    is_surface_configured: bool,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to the window")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pipeline-scene device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("cannot create the device and queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders output linear colour and rely on an sRGB surface for the conversion.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        let is_surface_configured = size.width > 0 && size.height > 0;
        if is_surface_configured {
            surface.configure(&device, &config);
        }

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let layouts = EntityLayouts::new(&device);
        let pipelines = Pipelines::new(&device, &config, &camera_bind_group_layout, &layouts);

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            layouts,
            pipelines,
            is_surface_configured,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn is_surface_configured(&self) -> bool {
        self.is_surface_configured
    }

    /// Reconfigure the surface and depth buffer. Zero-sized windows (minimized)
    /// leave the surface unconfigured until the next non-empty resize.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            self.is_surface_configured = false;
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
        self.is_surface_configured = true;
        log::debug!("Resized surface to {}x{}", size.width, size.height);
    }

    /// Clear the next surface texture and depth buffer, let `draw` record into
    /// the render pass, then submit and present.
    pub fn render<F>(&self, clear_colour: wgpu::Color, draw: F) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&mut Frame<'_, '_>),
    {
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            let mut frame = Frame {
                ctx: self,
                pass: &mut render_pass,
            };
            draw(&mut frame);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        Ok(())
    }

    fn bind_group_entries<'a>(
        layout: BindingLayout,
        uniform: Option<&'a wgpu::Buffer>,
        textures: &[&'a texture::Texture],
    ) -> anyhow::Result<Vec<wgpu::BindGroupEntry<'a>>> {
        let mut entries = Vec::with_capacity(1 + textures.len() * 2);
        if let Some(buffer) = uniform {
            entries.push(wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            });
        }
        let first = entries.len() as u32;
        for (i, &texture) in textures.iter().enumerate() {
            let sampler = texture
                .sampler
                .as_ref()
                .with_context(|| format!("{layout:?} binding got a texture without sampler"))?;
            let binding = first + 2 * i as u32;
            entries.push(wgpu::BindGroupEntry {
                binding,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: binding + 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            });
        }
        Ok(entries)
    }
}

impl Backend for Context {
    type Mesh = model::Mesh;
    type Texture = texture::Texture;
    type Binding = GpuBinding;

    fn load_mesh(&mut self, path: &Path, generate_tangents: bool) -> anyhow::Result<model::Mesh> {
        resources::load_model_obj(path, generate_tangents, &self.device)
    }

    fn load_texture(
        &mut self,
        path: &Path,
        is_normal_map: bool,
    ) -> anyhow::Result<texture::Texture> {
        resources::texture::load_texture(path, is_normal_map, &self.device, &self.queue)
    }

    fn create_binding(
        &mut self,
        label: &str,
        layout: BindingLayout,
        textures: &[&texture::Texture],
    ) -> anyhow::Result<GpuBinding> {
        anyhow::ensure!(
            textures.len() == layout.texture_count(),
            "{label}: {layout:?} bindings take {} texture(s), got {}",
            layout.texture_count(),
            textures.len()
        );

        let uniform = layout.has_mesh().then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} Model Buffer")),
                    contents: bytemuck::cast_slice(&[Transform::new().to_uniform()]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                })
        });
        let quads = (!layout.has_mesh()).then(|| QuadBuffer {
            buffer: self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} Quad Buffer")),
                size: (MAX_FLAT_VERTICES * std::mem::size_of::<FlatVertex>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            vertex_count: 0,
        });

        let entries = Self::bind_group_entries(layout, uniform.as_ref(), textures)?;
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: self.layouts.get(layout),
            entries: &entries,
            label: Some(&format!("{label} bind_group")),
        });

        Ok(GpuBinding {
            layout,
            uniform,
            bind_group,
            quads,
        })
    }

    fn viewport(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn clip_space(&self) -> ClipSpace {
        ClipSpace::YUp
    }

    fn set_camera(&mut self, eye: Point3<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.camera_uniform.update_view_proj(eye, view, projection);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    fn write_model(&mut self, binding: &GpuBinding, uniform: &ModelUniform) {
        match &binding.uniform {
            Some(buffer) => self
                .queue
                .write_buffer(buffer, 0, bytemuck::cast_slice(&[*uniform])),
            None => log::warn!("{:?} binding has no model uniform", binding.layout),
        }
    }

    fn write_quads(&mut self, binding: &mut GpuBinding, vertices: &[FlatVertex]) {
        let Some(quads) = &mut binding.quads else {
            log::warn!("{:?} binding has no quad buffer", binding.layout);
            return;
        };
        let vertices = if vertices.len() > MAX_FLAT_VERTICES {
            log::warn!(
                "{} quads exceed the limit of {MAX_QUADS}, the rest is not drawn",
                vertices.len() / VERTICES_PER_QUAD
            );
            &vertices[..MAX_FLAT_VERTICES]
        } else {
            vertices
        };
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&quads.buffer, 0, bytemuck::cast_slice(vertices));
        }
        quads.vertex_count = vertices.len() as u32;
    }
}

/// One open render pass on the surface texture.
pub struct Frame<'a, 'pass> {
    ctx: &'a Context,
    pass: &'a mut wgpu::RenderPass<'pass>,
}

impl DrawTarget<Context> for Frame<'_, '_> {
    fn use_pipeline(&mut self, pipeline: PipelineKind) {
        self.pass.set_pipeline(self.ctx.pipelines.get(pipeline));
    }

    fn draw(&mut self, mesh: Option<&model::Mesh>, binding: &GpuBinding) {
        match (mesh, &binding.quads) {
            (Some(mesh), _) => {
                self.pass
                    .draw_mesh(mesh, &binding.bind_group, &self.ctx.camera_bind_group)
            }
            (None, Some(quads)) if quads.vertex_count > 0 => {
                self.pass.set_bind_group(0, &binding.bind_group, &[]);
                self.pass
                    .set_vertex_buffer(0, quads.buffer.slice(..));
                self.pass.draw(0..quads.vertex_count, 0..1);
            }
            (None, Some(_)) => (),
            (None, None) => log::warn!("{:?} binding has nothing to draw", binding.layout),
        }
    }
}
