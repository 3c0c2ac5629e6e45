//! Depth cubemap resources and the per-face uniform plumbing for the shadow
//! pass. The map is a 6-layer D2 depth texture: each layer gets its own
//! attachment view for rendering, and a cube view for sampling in the
//! forward pass.

use glam::{Mat4, Vec3};

use app_core::{SHADOW_RESOLUTION, SHADOW_WGSL};

use super::DEPTH_FORMAT;
use crate::meshes::Vertex;

pub(crate) const FACE_COUNT: usize = 6;
pub(crate) const FACE_UNIFORM_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FaceUniforms {
    view_proj: [[f32; 4]; 4],
    // xyz: light position, w: far plane
    light_pos: [f32; 4],
}

pub(crate) struct ShadowResources {
    pub(crate) cube_view: wgpu::TextureView,
    pub(crate) face_views: Vec<wgpu::TextureView>,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) bind_group: wgpu::BindGroup,
    face_buffer: wgpu::Buffer,
    _texture: wgpu::Texture,
}

impl ShadowResources {
    pub(crate) fn new(device: &wgpu::Device, draw_bgl: &wgpu::BindGroupLayout) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_cubemap"),
            size: wgpu::Extent3d {
                width: SHADOW_RESOLUTION,
                height: SHADOW_RESOLUTION,
                depth_or_array_layers: FACE_COUNT as u32,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("shadow_cube_view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let face_views = (0..FACE_COUNT as u32)
            .map(|layer| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("shadow_face_view"),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_array_layer: layer,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        // Distance comparisons happen in the shader, so this is a plain
        // nearest sampler rather than a comparison sampler.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_WGSL.into()),
        });

        let face_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_face_bgl"),
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

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_pipeline_layout"),
            bind_group_layouts: &[&face_bgl, draw_bgl],
            push_constant_ranges: &[],
        });

        // Depth-only: a fragment stage with no color targets, writing linear
        // distance through frag_depth. Culling stays off so the thin
        // double-sided foliage casts from both sides.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
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
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let face_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shadow_face_uniforms"),
            size: FACE_COUNT as u64 * FACE_UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_face_bg"),
            layout: &face_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &face_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<FaceUniforms>() as u64),
                }),
            }],
        });

        Self {
            cube_view,
            face_views,
            sampler,
            pipeline,
            bind_group,
            face_buffer,
            _texture: texture,
        }
    }

    pub(crate) fn write_face_uniforms(
        &self,
        queue: &wgpu::Queue,
        transforms: &[Mat4; 6],
        light_pos: Vec3,
        far_plane: f32,
    ) {
        for (face, matrix) in transforms.iter().enumerate() {
            let uniforms = FaceUniforms {
                view_proj: matrix.to_cols_array_2d(),
                light_pos: [light_pos.x, light_pos.y, light_pos.z, far_plane],
            };
            queue.write_buffer(
                &self.face_buffer,
                face as u64 * FACE_UNIFORM_STRIDE,
                bytemuck::bytes_of(&uniforms),
            );
        }
    }
}
