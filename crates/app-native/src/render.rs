use anyhow::anyhow;
use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use app_core::{
    CullMode, MeshId, PointLight, BLOOM_BLUR_PASSES, LIGHT_COUNT, POST_WGSL, SCENE_WGSL,
    SHADOW_FAR, SHININESS, SKY_WGSL,
};

use crate::app::FramePlan;
use crate::meshes::{MeshBank, Vertex};
use crate::textures;

mod helpers;
mod post;
mod shadow;
mod targets;

use post::{PostResources, PostUniforms, POST_UNIFORM_STRIDE};
use shadow::ShadowResources;
use targets::RenderTargets;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Capacity of the per-draw uniform buffer. The scene currently issues nine
/// draws per frame; the headroom covers overlay experiments.
const MAX_DRAWS: usize = 32;
const DRAW_UNIFORM_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    view_pos: [f32; 4],
    // x: shadow far plane, y: shadows enabled, z: shininess
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightUniform {
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    attenuation: [f32; 4],
}

impl From<&PointLight> for LightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.extend(1.0).to_array(),
            ambient: light.ambient.extend(1.0).to_array(),
            diffuse: light.diffuse.extend(1.0).to_array(),
            specular: light.specular.extend(1.0).to_array(),
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightsUniform {
    lights: [LightUniform; LIGHT_COUNT],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    // x: alpha-discard flag
    flags: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SkyUniforms {
    view_proj: [[f32; 4]; 4],
}

/// Forward-pass pipeline per cull mode; the draw list flips modes per
/// instance, so all three variants are built once at startup.
struct ScenePipelines {
    back: wgpu::RenderPipeline,
    front: wgpu::RenderPipeline,
    off: wgpu::RenderPipeline,
}

impl ScenePipelines {
    fn for_cull(&self, cull: CullMode) -> &wgpu::RenderPipeline {
        match cull {
            CullMode::Back => &self.back,
            CullMode::Front => &self.front,
            CullMode::Off => &self.off,
        }
    }
}

struct Materials {
    terrain: wgpu::BindGroup,
    canopy: wgpu::BindGroup,
    undergrowth: wgpu::BindGroup,
    stalker: wgpu::BindGroup,
    relic: wgpu::BindGroup,
}

impl Materials {
    fn get(&self, id: MeshId) -> &wgpu::BindGroup {
        match id {
            MeshId::Terrain => &self.terrain,
            MeshId::Canopy => &self.canopy,
            MeshId::Undergrowth => &self.undergrowth,
            MeshId::Stalker => &self.stalker,
            MeshId::Relic => &self.relic,
        }
    }
}

/// Bind groups that reference the swapchain-sized targets; rebuilt together
/// with them on every resize.
struct TargetBindGroups {
    bg_hdr: wgpu::BindGroup,
    bg_from_bright: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup,
    bg_bloom_b_only: wgpu::BindGroup,
}

pub struct GpuState<'w> {
    pub window: &'w Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    meshes: MeshBank,
    materials: Materials,
    scene_pipelines: ScenePipelines,
    sky_pipeline: wgpu::RenderPipeline,
    shadow: ShadowResources,
    post: PostResources,
    targets: RenderTargets,
    target_bgs: TargetBindGroups,

    frame_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    sky_buffer: wgpu::Buffer,
    draw_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_bind_group: wgpu::BindGroup,
    sky_bind_group: wgpu::BindGroup,
    post_sampler: wgpu::Sampler,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w Window) -> anyhow::Result<Self> {
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
            .ok_or_else(|| anyhow!("No GPU adapter"))?;
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
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let meshes = MeshBank::build(&device);

        // Materials: one diffuse texture per mesh and a shared sampler.
        let material_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let material_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        let material_for = |id: MeshId| {
            let view = textures::scene_texture(&device, &queue, id);
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("material_bg"),
                layout: &material_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&material_sampler),
                    },
                ],
            })
        };
        let materials = Materials {
            terrain: material_for(MeshId::Terrain),
            canopy: material_for(MeshId::Canopy),
            undergrowth: material_for(MeshId::Undergrowth),
            stalker: material_for(MeshId::Stalker),
            relic: material_for(MeshId::Relic),
        };

        // Per-draw uniforms, shared by the shadow and forward passes through
        // one dynamic-offset buffer.
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: MAX_DRAWS as u64 * DRAW_UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bg"),
            layout: &draw_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        let shadow = ShadowResources::new(&device, &draw_bgl);

        // Frame uniforms + light block + shadow cubemap, bound once per pass.
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("light_uniforms"),
            size: std::mem::size_of::<LightsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        sample_type: wgpu::TextureSampleType::Depth,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &frame_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&shadow.cube_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&shadow.sampler),
                },
            ],
        });

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&frame_bgl, &draw_bgl, &material_bgl],
            push_constant_ranges: &[],
        });
        let scene_pipelines = ScenePipelines {
            back: helpers::make_scene_pipeline(
                &device,
                &scene_layout,
                &scene_shader,
                HDR_FORMAT,
                DEPTH_FORMAT,
                Some(wgpu::Face::Back),
            ),
            front: helpers::make_scene_pipeline(
                &device,
                &scene_layout,
                &scene_shader,
                HDR_FORMAT,
                DEPTH_FORMAT,
                Some(wgpu::Face::Front),
            ),
            off: helpers::make_scene_pipeline(
                &device,
                &scene_layout,
                &scene_shader,
                HDR_FORMAT,
                DEPTH_FORMAT,
                None,
            ),
        };

        // Skybox: drawn into the HDR pass after the scene, at depth 1.0.
        let sky_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky_shader"),
            source: wgpu::ShaderSource::Wgsl(SKY_WGSL.into()),
        });
        let sky_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sky_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sky_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sky_uniforms"),
            size: std::mem::size_of::<SkyUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sky_view = textures::sky_cubemap(&device, &queue);
        let sky_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky_bg"),
            layout: &sky_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: sky_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sky_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&material_sampler),
                },
            ],
        });
        let sky_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky_pipeline_layout"),
            bind_group_layouts: &[&sky_bgl],
            push_constant_ranges: &[],
        });
        let sky_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sky_pipeline"),
            layout: Some(&sky_layout),
            vertex: wgpu::VertexState {
                module: &sky_shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &sky_shader,
                entry_point: Some("fs_main"),
                targets: &[
                    Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    }),
                    Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    }),
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Presentation chain resources and the swapchain-sized targets.
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });
        let post_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, HDR_FORMAT, format);
        let targets = RenderTargets::new(&device, config.width, config.height);
        let target_bgs = Self::build_target_bind_groups(&device, &post, &targets, &post_sampler);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            meshes,
            materials,
            scene_pipelines,
            sky_pipeline,
            shadow,
            post,
            targets,
            target_bgs,
            frame_buffer,
            lights_buffer,
            sky_buffer,
            draw_buffer,
            frame_bind_group,
            draw_bind_group,
            sky_bind_group,
            post_sampler,
        })
    }

    fn build_target_bind_groups(
        device: &wgpu::Device,
        post: &PostResources,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> TargetBindGroups {
        let uniform_binding = || wgpu::BindGroupEntry {
            binding: 2,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &post.uniform_buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<PostUniforms>() as u64),
            }),
        };
        let bg0_for = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &post.bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    uniform_binding(),
                ],
            })
        };
        let bg1_for = |label: &str, view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &post.bgl1,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        };
        TargetBindGroups {
            bg_hdr: bg0_for("bg_hdr", &targets.hdr_color_view),
            bg_from_bright: bg0_for("bg_from_bright", &targets.hdr_bright_view),
            bg_from_bloom_a: bg0_for("bg_from_bloom_a", &targets.bloom_a_view),
            bg_from_bloom_b: bg0_for("bg_from_bloom_b", &targets.bloom_b_view),
            bg_bloom_a_only: bg1_for("bg_bloom_a_only", &targets.bloom_a_view),
            bg_bloom_b_only: bg1_for("bg_bloom_b_only", &targets.bloom_b_view),
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.targets = RenderTargets::new(&self.device, new_size.width, new_size.height);
        self.target_bgs = Self::build_target_bind_groups(
            &self.device,
            &self.post,
            &self.targets,
            &self.post_sampler,
        );
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn render(&mut self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
        let surface_tex = self.surface.get_current_texture()?;
        let surface_view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if plan.instances.len() > MAX_DRAWS {
            log::warn!(
                "draw list truncated: {} instances, capacity {MAX_DRAWS}",
                plan.instances.len()
            );
        }
        let instances = &plan.instances[..plan.instances.len().min(MAX_DRAWS)];

        // Per-frame uniforms.
        self.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms {
                view_proj: plan.view_proj.to_cols_array_2d(),
                view_pos: plan.view_pos.extend(1.0).to_array(),
                params: [
                    SHADOW_FAR,
                    if plan.shadows_enabled { 1.0 } else { 0.0 },
                    SHININESS,
                    0.0,
                ],
            }),
        );
        let mut lights = LightsUniform {
            lights: [LightUniform::zeroed(); LIGHT_COUNT],
        };
        for (slot, light) in lights.lights.iter_mut().zip(plan.lights.iter()) {
            *slot = LightUniform::from(light);
        }
        self.queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&lights));
        self.queue.write_buffer(
            &self.sky_buffer,
            0,
            bytemuck::bytes_of(&SkyUniforms {
                view_proj: plan.sky_view_proj.to_cols_array_2d(),
            }),
        );
        for (index, instance) in instances.iter().enumerate() {
            let uniforms = DrawUniforms {
                model: instance.transform.to_cols_array_2d(),
                flags: [if instance.discard { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
            };
            self.queue.write_buffer(
                &self.draw_buffer,
                index as u64 * DRAW_UNIFORM_STRIDE,
                bytemuck::bytes_of(&uniforms),
            );
        }
        self.shadow.write_face_uniforms(
            &self.queue,
            &plan.shadow_transforms,
            plan.hero_position,
            SHADOW_FAR,
        );
        for (slot, dir) in [[1.0f32, 0.0], [0.0, 1.0]].iter().enumerate() {
            self.queue.write_buffer(
                &self.post.uniform_buffer,
                slot as u64 * POST_UNIFORM_STRIDE,
                bytemuck::bytes_of(&PostUniforms {
                    blur_dir: *dir,
                    exposure: plan.exposure,
                    bloom_enabled: if plan.bloom_enabled { 1.0 } else { 0.0 },
                }),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        // 1. Shadow pass: scene depth into each cube face. Must finish
        // before the forward pass samples the cubemap.
        for (face, face_view) in self.shadow.face_views.iter().enumerate() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: face_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.shadow.pipeline);
            pass.set_bind_group(
                0,
                &self.shadow.bind_group,
                &[face as u32 * shadow::FACE_UNIFORM_STRIDE as u32],
            );
            for (index, instance) in instances.iter().enumerate() {
                if !instance.casts_shadow || instance.discard {
                    continue;
                }
                let mesh = self.meshes.get(instance.mesh);
                pass.set_bind_group(
                    1,
                    &self.draw_bind_group,
                    &[index as u32 * DRAW_UNIFORM_STRIDE as u32],
                );
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        // 2. Forward pass into the HDR MRT pair, skybox last.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("forward_pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.hdr_color_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: plan.clear_color.x as f64,
                                g: plan.clear_color.y as f64,
                                b: plan.clear_color.z as f64,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.hdr_bright_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                ],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (index, instance) in instances.iter().enumerate() {
                pass.set_pipeline(self.scene_pipelines.for_cull(instance.cull));
                pass.set_bind_group(
                    1,
                    &self.draw_bind_group,
                    &[index as u32 * DRAW_UNIFORM_STRIDE as u32],
                );
                pass.set_bind_group(2, self.materials.get(instance.mesh), &[]);
                let mesh = self.meshes.get(instance.mesh);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            pass.set_pipeline(&self.sky_pipeline);
            pass.set_bind_group(0, &self.sky_bind_group, &[]);
            pass.set_vertex_buffer(0, self.meshes.sky.vertex_buffer.slice(..));
            pass.set_index_buffer(
                self.meshes.sky.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..self.meshes.sky.index_count, 0, 0..1);
        }

        // 3. Presentation: ping-pong blur of the brightness target, then the
        // tone-mapping composite to the swapchain.
        if plan.bloom_enabled {
            for i in 0..BLOOM_BLUR_PASSES {
                let horizontal = i % 2 == 0;
                let source = if i == 0 {
                    &self.target_bgs.bg_from_bright
                } else if horizontal {
                    &self.target_bgs.bg_from_bloom_b
                } else {
                    &self.target_bgs.bg_from_bloom_a
                };
                let target = if horizontal {
                    &self.targets.bloom_a_view
                } else {
                    &self.targets.bloom_b_view
                };
                let offset = if horizontal { 0 } else { POST_UNIFORM_STRIDE as u32 };
                post::blit(
                    &mut encoder,
                    "bloom_blur",
                    target,
                    &self.post.blur_pipeline,
                    source,
                    offset,
                    None,
                );
            }
        }
        let final_bloom = if BLOOM_BLUR_PASSES % 2 == 0 {
            &self.target_bgs.bg_bloom_b_only
        } else {
            &self.target_bgs.bg_bloom_a_only
        };
        post::blit(
            &mut encoder,
            "composite",
            &surface_view,
            &self.post.composite_pipeline,
            &self.target_bgs.bg_hdr,
            0,
            Some(final_bloom),
        );

        self.queue.submit(Some(encoder.finish()));
        surface_tex.present();
        Ok(())
    }
}
