//! WebGPU renderer: one additive sprite pipeline for the particle cloud,
//! ornaments, ribbon points and topper, plus a textured-quad pipeline for
//! the photo planes.

use glam::{Mat4, Quat, Vec3};
use tree_core::{TreeEngine, PHOTO_COUNT, PHOTO_SIZE, RIBBON_EMISSIVE_BASE};
use web_sys as web;

// Sprite sizing in world units
const PARTICLE_SPRITE: f32 = 0.12;
const PARTICLE_ALPHA: f32 = 0.7;
const RIBBON_SPRITE: f32 = 0.24;
const TOPPER_SPRITE: f32 = 2.0;
const PHOTO_TINT_ALPHA: f32 = 0.95;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteInstance {
    pos: [f32; 3],
    size: f32,
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PhotoUniforms {
    model: [[f32; 4]; 4],
    tint: [f32; 4],
}

struct PhotoSlot {
    uniforms: wgpu::Buffer,
    uniform_bg: wgpu::BindGroup,
    texture_bg: wgpu::BindGroup,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    sprite_pipeline: wgpu::RenderPipeline,
    photo_pipeline: wgpu::RenderPipeline,
    globals_buf: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<SpriteInstance>,

    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    photo_slots: Vec<PhotoSlot>,

    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        max_instances: usize,
    ) -> anyhow::Result<Self> {
        use wgpu::util::DeviceExt;

        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(tree_core::SCENE_WGSL.into()),
        });

        let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            }],
        });

        // Quad vertices for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<SpriteInstance>() * max_instances) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        };
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 3,
                },
            ],
        };

        let sprite_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pl"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };
        let sprite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&sprite_pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_sprite"),
                buffers: &[quad_layout.clone(), instance_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_sprite"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let photo_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("photo_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let photo_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("photo_pl"),
            bind_group_layouts: &[&globals_bgl, &photo_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let photo_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("photo_pipeline"),
            layout: Some(&photo_pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_photo"),
                buffers: &[quad_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_photo"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("photo_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Untextured planes render as a faint white frame until their image
        // arrives.
        let mut photo_slots = Vec::with_capacity(PHOTO_COUNT);
        for i in 0..PHOTO_COUNT {
            let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("photo_uniforms"),
                size: std::mem::size_of::<PhotoUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let uniform_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("photo_uniform_bg"),
                layout: &photo_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                }],
            });
            let texture_bg = make_photo_texture_bg(
                &device,
                &queue,
                &texture_bgl,
                &sampler,
                &format!("photo_placeholder_{i}"),
                1,
                1,
                &[255, 255, 255, 60],
            );
            photo_slots.push(PhotoSlot {
                uniforms,
                uniform_bg,
                texture_bg,
            });
        }

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprite_pipeline,
            photo_pipeline,
            globals_buf,
            globals_bg,
            quad_vb,
            instance_vb,
            instance_capacity: max_instances,
            instances: Vec::with_capacity(max_instances),
            texture_bgl,
            sampler,
            photo_slots,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Swap a plane's texture once its image has decoded. Idempotent; safe
    /// to call again for the same plane when the photo list changes.
    pub fn set_photo_texture(&mut self, plane: usize, width: u32, height: u32, rgba: &[u8]) {
        if plane >= self.photo_slots.len() || width == 0 || height == 0 {
            return;
        }
        self.photo_slots[plane].texture_bg = make_photo_texture_bg(
            &self.device,
            &self.queue,
            &self.texture_bgl,
            &self.sampler,
            &format!("photo_{plane}"),
            width,
            height,
            rgba,
        );
    }

    fn build_instances(&mut self, engine: &TreeEngine) {
        self.instances.clear();
        let scale = engine.scale();
        let tree_rot = Quat::from_rotation_y(engine.tree_yaw);
        let ribbon_rot = Quat::from_rotation_y(engine.ribbon_yaw);

        for ((p, c), s) in engine
            .cloud
            .positions()
            .iter()
            .zip(engine.cloud.colors())
            .zip(engine.cloud.sizes())
        {
            self.instances.push(SpriteInstance {
                pos: (tree_rot * (*p * scale)).to_array(),
                size: PARTICLE_SPRITE * s,
                color: [c[0], c[1], c[2], PARTICLE_ALPHA],
            });
        }
        for d in &engine.decorations {
            self.instances.push(SpriteInstance {
                pos: (tree_rot * (d.position * scale)).to_array(),
                size: d.size * scale,
                color: [d.color[0], d.color[1], d.color[2], 1.0],
            });
        }
        for ribbon in &engine.ribbons {
            let glow = ribbon.emissive / RIBBON_EMISSIVE_BASE;
            for p in &ribbon.points {
                let local = Vec3::new(
                    p.x * ribbon.breathe,
                    p.y + ribbon.y_offset,
                    p.z * ribbon.breathe,
                );
                self.instances.push(SpriteInstance {
                    pos: (ribbon_rot * (local * scale)).to_array(),
                    size: RIBBON_SPRITE * scale,
                    color: [0.88, 0.91, 0.94, glow],
                });
            }
        }
        self.instances.push(SpriteInstance {
            pos: engine.topper.position(scale).to_array(),
            size: TOPPER_SPRITE * scale,
            color: [1.0, 1.0, 1.0, engine.topper.glow],
        });
    }

    /// Draw one frame. Surface loss (resize or teardown race) is a no-op,
    /// never an error.
    pub fn render(&mut self, engine: &TreeEngine) -> anyhow::Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => {
                log::warn!("surface unavailable: {e:?}");
                return Ok(());
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.globals_buf,
            0,
            bytemuck::bytes_of(&Globals {
                view: engine.camera.view_matrix().to_cols_array_2d(),
                proj: engine.camera.projection_matrix().to_cols_array_2d(),
            }),
        );

        self.build_instances(engine);
        let count = self.instances.len().min(self.instance_capacity);
        self.queue.write_buffer(
            &self.instance_vb,
            0,
            bytemuck::cast_slice(&self.instances[..count]),
        );

        let wall_rot = Mat4::from_rotation_y(engine.photos.yaw);
        for (slot, plane) in self.photo_slots.iter().zip(&engine.photos.planes) {
            let model = wall_rot
                * Mat4::from_scale_rotation_translation(
                    Vec3::splat(plane.scale * PHOTO_SIZE),
                    plane.rotation,
                    plane.position,
                );
            self.queue.write_buffer(
                &slot.uniforms,
                0,
                bytemuck::bytes_of(&PhotoUniforms {
                    model: model.to_cols_array_2d(),
                    tint: [1.0, 1.0, 1.0, PHOTO_TINT_ALPHA],
                }),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.008,
                            g: 0.008,
                            b: 0.02,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.sprite_pipeline);
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..count as u32);

            rpass.set_pipeline(&self.photo_pipeline);
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            for slot in &self.photo_slots {
                rpass.set_bind_group(1, &slot.uniform_bg, &[]);
                rpass.set_bind_group(2, &slot.texture_bg, &[]);
                rpass.draw(0..6, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn make_photo_texture_bg(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::BindGroup {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
