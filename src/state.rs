use std::sync::Arc;
use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::window::Window;
use glam::Vec3;
use crate::{camera::Camera, clock::FrameClock, config, mesh::Mesh, motion::Motion, shader, vertex};
use crate::fragment::Interpolants;
use crate::pipeline::{ClipStats, DrawBindings, Pipeline, Profile};
use crate::transform::ObjectTransform;
use crate::uniforms::{self, GlobalUniforms, TimeUniform, TransformUniform};
use crate::vertex::{StaticVertex, Vertex};

pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub depth_texture: wgpu::TextureView,
}

impl GpuContext {
    pub async fn new(window: Arc<Window>, present_mode: wgpu::PresentMode) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone()).context("failed to create surface")?;
        let adapter = instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }).await.context("no GPU adapter compatible with the window surface")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter.request_device(&wgpu::DeviceDescriptor::default(), None).await.context("failed to open GPU device")?;
        let mut config = surface.get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .context("surface is not supported by the adapter")?;

        let caps = surface.get_capabilities(&adapter);
        config.present_mode = if caps.present_modes.contains(&present_mode) { present_mode } else { wgpu::PresentMode::Fifo };
        surface.configure(&device, &config);

        let depth_texture = Self::create_depth(&device, &config);

        Ok(Self { surface, device, queue, config, size, depth_texture })
    }

    fn create_depth(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
        let desc = wgpu::TextureDescriptor {
            label: Some("Depth"), size: wgpu::Extent3d { width: config.width, height: config.height, depth_or_array_layers: 1 },
            mip_level_count: 1, sample_count: 1, dimension: wgpu::TextureDimension::D2, format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT, view_formats: &[],
        };
        device.create_texture(&desc).create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth(&self.device, &self.config);
            log::debug!("surface resized to {}x{}", new_size.width, new_size.height);
        }
    }
}

struct GpuObject {
    name: &'static str,
    mesh: Mesh,
    transform: ObjectTransform,
    motion: Motion,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

pub struct RenderState {
    pub ctx: GpuContext,
    profile: Profile,
    render_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    // Full profile only: one matrix per object at a dynamic offset
    transform_buffer: Option<wgpu::Buffer>,
    transform_bind_group: Option<wgpu::BindGroup>,
    transform_stride: wgpu::BufferAddress,
    objects: Vec<GpuObject>,
    camera: Camera,
    clock: FrameClock,
    globals: GlobalUniforms,
}

impl RenderState {
    pub fn new(ctx: GpuContext, profile: Profile, time_scale: f32) -> Result<Self> {
        let camera = Camera::new(ctx.config.width as f32 / ctx.config.height as f32);
        let globals = Self::globals_for(&profile, &camera, 0.0);

        let uniform_size = if profile.transform.binds_camera() {
            std::mem::size_of::<GlobalUniforms>()
        } else {
            std::mem::size_of::<TimeUniform>()
        } as wgpu::BufferAddress;

        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"), size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST, mapped_at_creation: false,
        });

        let uniform_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0, visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer { ty: wgpu::BufferBindingType::Uniform, has_dynamic_offset: false, min_binding_size: wgpu::BufferSize::new(uniform_size) }, count: None,
            }], label: Some("Uniform Layout"),
        });

        let uniform_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_layout, entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() }], label: Some("Uniform Bind Group"),
        });

        let transform_size = std::mem::size_of::<TransformUniform>() as wgpu::BufferAddress;
        let transform_stride = uniforms::aligned_transform_stride(ctx.device.limits().min_uniform_buffer_offset_alignment);
        let transform_layout = profile.transform.binds_transform().then(|| {
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0, visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer { ty: wgpu::BufferBindingType::Uniform, has_dynamic_offset: true, min_binding_size: wgpu::BufferSize::new(transform_size) }, count: None,
                }], label: Some("Transform Layout"),
            })
        });

        let (transform_buffer, transform_bind_group) = match &transform_layout {
            Some(layout) => {
                let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Transform Buffer"), size: transform_stride * config::MAX_OBJECTS,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST, mapped_at_creation: false,
                });
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding { buffer: &buffer, offset: 0, size: wgpu::BufferSize::new(transform_size) }),
                    }],
                    label: Some("Transform Bind Group"),
                });
                (Some(buffer), Some(bind_group))
            }
            None => (None, None),
        };

        let shader_source = shader::generate(&profile);
        let shader_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wave Shader"), source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let mut bind_group_layouts = vec![&uniform_layout];
        bind_group_layouts.extend(transform_layout.as_ref());
        let render_pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None, bind_group_layouts: &bind_group_layouts, push_constant_ranges: &[],
        });

        let vertex_layout = if profile.has_wave_attribute() { Vertex::desc() } else { StaticVertex::desc() };
        let render_pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"), layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState { module: &shader_module, entry_point: shader::VS_ENTRY, buffers: &[vertex_layout] },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module, entry_point: shader::FS_ENTRY,
                targets: &[Some(wgpu::ColorTargetState { format: ctx.config.format, blend: Some(wgpu::BlendState::REPLACE), write_mask: wgpu::ColorWrites::ALL })],
            }),
            primitive: wgpu::PrimitiveState { topology: wgpu::PrimitiveTopology::TriangleList, cull_mode: None, ..Default::default() },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float, depth_write_enabled: true, depth_compare: wgpu::CompareFunction::Less, stencil: wgpu::StencilState::default(), bias: wgpu::DepthBiasState::default()
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });
        log::info!("render pipeline ready: {:?}", profile);

        let mut ground = ObjectTransform::default();
        ground.set_position(Vec3::from_array(config::GROUND_OFFSET));
        ground.set_scale(Vec3::splat(config::GROUND_SCALE));
        let scene = [
            ("grid", Mesh::triangle_grid(config::GRID_COLS, config::GRID_ROWS, config::GRID_SPACING, config::TRIANGLE_SIZE), ObjectTransform::default(), Motion::default()),
            ("ground", Mesh::ground_quad(config::GROUND_COLOR), ground, Motion::spinning(Vec3::new(0.0, config::GROUND_SPIN, 0.0))),
        ];
        let mut objects = Vec::with_capacity(scene.len());
        for (name, mesh, transform, motion) in scene {
            vertex::validate_wave_flags(&mesh.vertices).with_context(|| format!("mesh '{}' failed validation", name))?;
            let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(name), contents: &mesh.vertex_bytes(&profile), usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(name), contents: &mesh.index_bytes(), usage: wgpu::BufferUsages::INDEX,
            });
            objects.push(GpuObject { name, mesh, transform, motion, vertex_buffer, index_buffer });
        }
        anyhow::ensure!(objects.len() as u64 <= config::MAX_OBJECTS, "scene has {} objects, transform buffer holds {}", objects.len(), config::MAX_OBJECTS);

        let state = Self {
            ctx, profile, render_pipeline,
            uniform_buffer, uniform_bind_group,
            transform_buffer, transform_bind_group, transform_stride,
            objects, camera,
            clock: FrameClock::new(time_scale),
            globals,
        };
        state.log_reference_draw()?;
        Ok(state)
    }

    /// Runs the CPU reference over every object with the current uniforms and
    /// reports what the GPU is about to see.
    fn log_reference_draw(&self) -> Result<()> {
        let pipeline = Pipeline::new(self.profile);
        match pipeline.profile().wave {
            Some(mode) if !mode.is_animated() => log::info!("{:?} wave is time-invariant, geometry stays put", mode),
            None => log::info!("no wave stage, waving flags are ignored"),
            _ => {}
        }
        for obj in &self.objects {
            log::debug!("{}: position {:?} rotation {:?} scale {:?}", obj.name, obj.transform.position(), obj.transform.rotation(), obj.transform.scale());
            let model = obj.transform.uniform();
            let outputs = pipeline.draw_vertices(&obj.mesh.vertices, DrawBindings { globals: &self.globals, transform: Some(&model) })?;
            if let [a, b, c, ..] = obj.mesh.indices[..] {
                let centroid = Interpolants::barycentric([&outputs[a as usize], &outputs[b as usize], &outputs[c as usize]], Vec3::splat(1.0 / 3.0));
                log::trace!("{}: first triangle centroid shades to {:?}", obj.name, pipeline.shade_fragments(&[centroid]));
            }
            if let Some(stats) = ClipStats::collect(&outputs) {
                log::debug!("{}: {} vertices, clip min {:?} max {:?}", obj.name, outputs.len(), stats.min, stats.max);
                if stats.behind_camera > 0 {
                    log::warn!("{}: {} vertices have clip w <= 0 and will be clipped", obj.name, stats.behind_camera);
                }
            }
        }
        Ok(())
    }

    // The identity profile never reads the matrices, only time
    fn globals_for(profile: &Profile, camera: &Camera, t: f32) -> GlobalUniforms {
        if profile.transform.binds_camera() {
            GlobalUniforms::new(t, camera.projection(), camera.view())
        } else {
            GlobalUniforms::identity(t)
        }
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.ctx.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.set_aspect(self.ctx.config.width, self.ctx.config.height);
    }

    // Uniform writes happen here, strictly between draws
    pub fn update(&mut self) {
        let t = self.clock.tick();
        let dt = self.clock.delta();
        log::trace!("t = {:.3}s (dt {:.4}s)", self.clock.elapsed(), dt);
        self.globals = Self::globals_for(&self.profile, &self.camera, t);

        for obj in &mut self.objects {
            obj.motion.integrate(&mut obj.transform, dt);
        }

        if self.profile.transform.binds_camera() {
            self.ctx.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.globals));
        } else {
            self.ctx.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.globals.time_only()));
        }

        if let Some(buffer) = &self.transform_buffer {
            let transforms: Vec<TransformUniform> = self.objects.iter().map(|o| o.transform.uniform()).collect();
            self.ctx.queue.write_buffer(buffer, 0, &uniforms::pack_transforms(&transforms, self.transform_stride));
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view, resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Clear(config::CLEAR_COLOR), store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture,
                    depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                    stencil_ops: None,
                }),
                timestamp_writes: None, occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            let stride = self.transform_stride;
            for (i, obj) in self.objects.iter().enumerate() {
                if let Some(bind_group) = &self.transform_bind_group {
                    render_pass.set_bind_group(1, bind_group, &[(i as wgpu::BufferAddress * stride) as wgpu::DynamicOffset]);
                }
                render_pass.set_vertex_buffer(0, obj.vertex_buffer.slice(..));
                render_pass.set_index_buffer(obj.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..obj.mesh.index_count(), 0, 0..1);
            }
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
