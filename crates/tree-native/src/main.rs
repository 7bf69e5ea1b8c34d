use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use glam::{Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tree_core::{
    GestureClassifier, Shape, TreeEngine, VisualConfig, DECORATION_COUNT, PARTICLE_COUNT,
    PHOTO_COUNT, PHOTO_SIZE, RIBBON_COUNT, RIBBON_EMISSIVE_BASE, RIBBON_POINTS_PER_TURN,
};

const MAX_SPRITE_INSTANCES: usize =
    PARTICLE_COUNT + DECORATION_COUNT + RIBBON_COUNT * (5 * RIBBON_POINTS_PER_TURN + 1) + 1;

const PARTICLE_SPRITE: f32 = 0.12;
const PARTICLE_ALPHA: f32 = 0.7;
const RIBBON_SPRITE: f32 = 0.24;
const TOPPER_SPRITE: f32 = 2.0;

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

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_pipeline: wgpu::RenderPipeline,
    photo_pipeline: wgpu::RenderPipeline,
    globals_buf: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instances: Vec<SpriteInstance>,
    photo_uniform_bufs: Vec<wgpu::Buffer>,
    photo_uniform_bgs: Vec<wgpu::BindGroup>,
    photo_texture_bg: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
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
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
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
            size: (std::mem::size_of::<SpriteInstance>() * MAX_SPRITE_INSTANCES) as u64,
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

        // Desktop has no photo upload surface; planes render as frosted
        // placeholders from a 1x1 texture.
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("photo_placeholder"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
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
            &[255, 255, 255, 60],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());
        let photo_texture_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("photo_texture_bg"),
            layout: &texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let mut photo_uniform_bufs = Vec::with_capacity(PHOTO_COUNT);
        let mut photo_uniform_bgs = Vec::with_capacity(PHOTO_COUNT);
        for _ in 0..PHOTO_COUNT {
            let buf = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("photo_uniforms"),
                size: std::mem::size_of::<PhotoUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            photo_uniform_bgs.push(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("photo_uniform_bg"),
                layout: &photo_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buf.as_entire_binding(),
                }],
            }));
            photo_uniform_bufs.push(buf);
        }

        Ok(Self {
            window,
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
            instances: Vec::with_capacity(MAX_SPRITE_INSTANCES),
            photo_uniform_bufs,
            photo_uniform_bgs,
            photo_texture_bg,
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
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

    fn render(&mut self, engine: &TreeEngine) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
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
        let count = self.instances.len().min(MAX_SPRITE_INSTANCES);
        self.queue.write_buffer(
            &self.instance_vb,
            0,
            bytemuck::cast_slice(&self.instances[..count]),
        );

        let wall_rot = Mat4::from_rotation_y(engine.photos.yaw);
        for (buf, plane) in self.photo_uniform_bufs.iter().zip(&engine.photos.planes) {
            let model = wall_rot
                * Mat4::from_scale_rotation_translation(
                    Vec3::splat(plane.scale * PHOTO_SIZE),
                    plane.rotation,
                    plane.position,
                );
            self.queue.write_buffer(
                buf,
                0,
                bytemuck::bytes_of(&PhotoUniforms {
                    model: model.to_cols_array_2d(),
                    tint: [1.0, 1.0, 1.0, 0.95],
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
            for bg in &self.photo_uniform_bgs {
                rpass.set_bind_group(1, bg, &[]);
                rpass.set_bind_group(2, &self.photo_texture_bg, &[]);
                rpass.draw(0..6, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn shape_for_digit(key: &str) -> Option<Shape> {
    match key {
        "1" => Some(Shape::Cone),
        "2" => Some(Shape::Heart),
        "3" => Some(Shape::Star),
        "4" => Some(Shape::Snowflake),
        "5" => Some(Shape::Fireworks),
        _ => None,
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut config = VisualConfig::default();
    let mut engine = TreeEngine::new(&config, 16.0 / 9.0, &mut rng);
    // No camera on desktop; the classifier just keeps targets at neutral.
    let mut classifier = GestureClassifier::new();

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Tree Light (native)")
        .build(&event_loop)
        .expect("window");

    let mut state = pollster::block_on(GpuState::new(&window)).expect("gpu");
    engine.resize(state.width as f32 / state.height as f32);
    let start = Instant::now();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                state.resize(size);
                engine.resize(state.width as f32 / state.height as f32);
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => match &logical_key {
                Key::Named(NamedKey::Escape) => elwt.exit(),
                Key::Character(c) => {
                    if let Some(shape) = shape_for_digit(c.as_str()) {
                        config.shape = shape;
                        engine.set_shape(shape, &mut rng);
                        log::info!("shape: {}", shape.as_str());
                    } else if c.as_str().eq_ignore_ascii_case("r") {
                        config.reset();
                        engine.set_shape(config.shape, &mut rng);
                        engine.set_colors(config.color1, config.color2, &mut rng);
                        engine.set_photo_source_count(config.photo_sources.len());
                        log::info!("reset to defaults");
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let photo_positions = engine.photo_world_positions();
                let _ = classifier.observe(None, &photo_positions, engine.camera.eye);
                engine.step(
                    start.elapsed().as_secs_f32(),
                    classifier.targets(),
                    classifier.state(),
                );
                match state.render(&engine) {
                    Ok(_) => state.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(_) => {}
                }
            }
            _ => {}
        })
        .unwrap();
}
