use super::helpers;
use super::{DEPTH_FORMAT, HDR_FORMAT};

/// Offscreen targets for the frame: the HDR scene/brightness MRT pair with
/// its depth buffer, and the two bloom ping-pong textures. All of them are
/// swapchain-sized and rebuilt on resize; the shadow cubemap lives
/// separately because its size never changes.
pub(crate) struct RenderTargets {
    pub(crate) hdr_color: wgpu::Texture,
    pub(crate) hdr_color_view: wgpu::TextureView,
    pub(crate) hdr_bright: wgpu::Texture,
    pub(crate) hdr_bright_view: wgpu::TextureView,
    pub(crate) depth: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let color_usage =
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (hdr_color, hdr_color_view) =
            helpers::create_color_texture(device, "hdr_color", width, height, HDR_FORMAT, color_usage);
        let (hdr_bright, hdr_bright_view) =
            helpers::create_color_texture(device, "hdr_bright", width, height, HDR_FORMAT, color_usage);
        let (depth, depth_view) =
            helpers::create_depth_texture(device, "scene_depth", width, height, DEPTH_FORMAT);
        let (bloom_a, bloom_a_view) =
            helpers::create_color_texture(device, "bloom_a", width, height, HDR_FORMAT, color_usage);
        let (bloom_b, bloom_b_view) =
            helpers::create_color_texture(device, "bloom_b", width, height, HDR_FORMAT, color_usage);
        Self {
            hdr_color,
            hdr_color_view,
            hdr_bright,
            hdr_bright_view,
            depth,
            depth_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
        }
    }
}
