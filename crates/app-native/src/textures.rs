//! Texture creation: tries the assets directory first and falls back to
//! generated pixels. A face or texture that fails to decode is logged and
//! replaced; it never aborts startup.

use std::path::PathBuf;

use app_core::MeshId;

/// All generated textures (and resized disk textures) use this edge length.
const TEXTURE_SIZE: u32 = 256;

/// Skybox face names in cubemap layer order (+X, -X, +Y, -Y, +Z, -Z).
const SKYBOX_FACES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

fn texture_path(id: MeshId) -> PathBuf {
    let name = match id {
        MeshId::Terrain => "terrain",
        MeshId::Canopy => "canopy",
        MeshId::Undergrowth => "undergrowth",
        MeshId::Stalker => "stalker",
        MeshId::Relic => "relic",
    };
    PathBuf::from("assets/textures").join(format!("{name}.png"))
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    layers: u32,
    pixels: &[u8],
) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: TEXTURE_SIZE,
            height: TEXTURE_SIZE,
            depth_or_array_layers: layers,
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
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * TEXTURE_SIZE),
            rows_per_image: Some(TEXTURE_SIZE),
        },
        wgpu::Extent3d {
            width: TEXTURE_SIZE,
            height: TEXTURE_SIZE,
            depth_or_array_layers: layers,
        },
    );
    texture
}

/// Decode an image file into RGBA at [`TEXTURE_SIZE`], or None with a
/// warning when it is missing or broken.
fn decode_face(path: &PathBuf) -> Option<Vec<u8>> {
    match image::open(path) {
        Ok(img) => Some(
            img.resize_exact(
                TEXTURE_SIZE,
                TEXTURE_SIZE,
                image::imageops::FilterType::Triangle,
            )
            .to_rgba8()
            .into_raw(),
        ),
        Err(err) => {
            log::warn!(
                "texture {} unavailable ({err}); using generated pixels",
                path.display()
            );
            None
        }
    }
}

/// Cheap deterministic per-texel noise.
fn hash01(x: u32, y: u32, salt: u32) -> f32 {
    let mut h = x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B) ^ salt;
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    (h & 0xFFFF) as f32 / 65535.0
}

fn fill(pixels: &mut Vec<u8>, rgba: impl Fn(u32, u32) -> [f32; 4]) {
    for y in 0..TEXTURE_SIZE {
        for x in 0..TEXTURE_SIZE {
            let c = rgba(x, y);
            for channel in c {
                pixels.push((channel.clamp(0.0, 1.0) * 255.0) as u8);
            }
        }
    }
}

fn procedural_pixels(id: MeshId) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize);
    match id {
        MeshId::Terrain => fill(&mut pixels, |x, y| {
            let n = hash01(x / 4, y / 4, 1);
            let moss = 0.25 + 0.2 * n;
            [0.1 + 0.08 * n, moss, 0.08, 1.0]
        }),
        MeshId::Canopy => fill(&mut pixels, |x, y| {
            // Leafy blotches; alpha holes feed the shader's alpha cutoff.
            let n = hash01(x / 8, y / 8, 2);
            let hole = hash01(x / 16, y / 16, 3) < 0.22;
            [0.1, 0.3 + 0.25 * n, 0.08, if hole { 0.0 } else { 1.0 }]
        }),
        MeshId::Undergrowth => fill(&mut pixels, |x, y| {
            let n = hash01(x / 6, y / 6, 4);
            [0.07, 0.18 + 0.15 * n, 0.05, 1.0]
        }),
        MeshId::Stalker => fill(&mut pixels, |x, y| {
            let n = hash01(x / 10, y / 10, 5);
            [0.35 + 0.1 * n, 0.42 + 0.1 * n, 0.2, 1.0]
        }),
        MeshId::Relic => fill(&mut pixels, |x, y| {
            // Bright enough to cross the bloom threshold under direct light.
            let n = hash01(x / 3, y / 3, 6);
            [0.95, 0.8 + 0.15 * n, 0.25, 1.0]
        }),
    }
    pixels
}

/// Night-sky gradient with a sparse star field for a single cube face.
fn procedural_sky_face(face: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize);
    fill(&mut pixels, |x, y| {
        let u = x as f32 / (TEXTURE_SIZE - 1) as f32 * 2.0 - 1.0;
        let v = y as f32 / (TEXTURE_SIZE - 1) as f32 * 2.0 - 1.0;
        // Direction for this texel following the cubemap face layout.
        let dir = match face {
            0 => [1.0, -v, -u],
            1 => [-1.0, -v, u],
            2 => [u, 1.0, v],
            3 => [u, -1.0, -v],
            4 => [u, -v, 1.0],
            _ => [-u, -v, -1.0],
        };
        let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
        let up = dir[1] / len;
        let t = (up * 0.5 + 0.5).clamp(0.0, 1.0);
        let star = if hash01(x, y, 7 + face as u32) > 0.9985 { 0.8 } else { 0.0 };
        [
            0.01 + 0.03 * t + star,
            0.015 + 0.04 * t + star,
            0.05 + 0.10 * t + star,
            1.0,
        ]
    });
    pixels
}

/// Diffuse texture for a mesh: disk file when present, generated otherwise.
pub fn scene_texture(device: &wgpu::Device, queue: &wgpu::Queue, id: MeshId) -> wgpu::TextureView {
    let path = texture_path(id);
    let pixels = decode_face(&path).unwrap_or_else(|| procedural_pixels(id));
    let texture = upload_rgba(device, queue, &format!("{id:?}_tex"), 1, &pixels);
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Skybox cubemap from assets/skybox/<face>.png. Each face that fails to
/// load is logged and replaced by the generated sky, never aborting the
/// whole cubemap.
pub fn sky_cubemap(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
    let mut pixels = Vec::with_capacity((TEXTURE_SIZE * TEXTURE_SIZE * 4 * 6) as usize);
    for (face, name) in SKYBOX_FACES.iter().enumerate() {
        let path = PathBuf::from("assets/skybox").join(format!("{name}.png"));
        let face_pixels = decode_face(&path).unwrap_or_else(|| procedural_sky_face(face));
        pixels.extend_from_slice(&face_pixels);
    }
    let texture = upload_rgba(device, queue, "sky_cubemap", 6, &pixels);
    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("sky_cubemap_view"),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..Default::default()
    })
}
