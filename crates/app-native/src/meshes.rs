//! Procedural geometry for the scene. Mesh file parsing is out of scope, so
//! every mesh is generated in code at startup and uploaded once; scatter
//! placement uses a fixed seed so the forest is identical every run.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::prelude::*;
use wgpu::util::DeviceExt;

use app_core::MeshId;

const SCATTER_SEED: u64 = 0x6f72_e57;

/// Half extent of the terrain patch in model units; the draw transform
/// scales it up to world size.
const TERRAIN_EXTENT: f32 = 6.0;
const TERRAIN_CELLS: usize = 48;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Push a quad a-b-c-d, counter-clockwise when viewed from the normal
    /// side.
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for (corner, uv) in corners.iter().zip(uvs) {
            self.vertices.push(Vertex {
                position: corner.to_array(),
                normal: normal.to_array(),
                uv,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn push_box(&mut self, center: Vec3, half: Vec3) {
        let (cx, cy, cz) = (center.x, center.y, center.z);
        let (hx, hy, hz) = (half.x, half.y, half.z);
        // +Z
        self.push_quad(
            [
                Vec3::new(cx - hx, cy - hy, cz + hz),
                Vec3::new(cx + hx, cy - hy, cz + hz),
                Vec3::new(cx + hx, cy + hy, cz + hz),
                Vec3::new(cx - hx, cy + hy, cz + hz),
            ],
            Vec3::Z,
        );
        // -Z
        self.push_quad(
            [
                Vec3::new(cx + hx, cy - hy, cz - hz),
                Vec3::new(cx - hx, cy - hy, cz - hz),
                Vec3::new(cx - hx, cy + hy, cz - hz),
                Vec3::new(cx + hx, cy + hy, cz - hz),
            ],
            Vec3::NEG_Z,
        );
        // +X
        self.push_quad(
            [
                Vec3::new(cx + hx, cy - hy, cz + hz),
                Vec3::new(cx + hx, cy - hy, cz - hz),
                Vec3::new(cx + hx, cy + hy, cz - hz),
                Vec3::new(cx + hx, cy + hy, cz + hz),
            ],
            Vec3::X,
        );
        // -X
        self.push_quad(
            [
                Vec3::new(cx - hx, cy - hy, cz - hz),
                Vec3::new(cx - hx, cy - hy, cz + hz),
                Vec3::new(cx - hx, cy + hy, cz + hz),
                Vec3::new(cx - hx, cy + hy, cz - hz),
            ],
            Vec3::NEG_X,
        );
        // +Y
        self.push_quad(
            [
                Vec3::new(cx - hx, cy + hy, cz + hz),
                Vec3::new(cx + hx, cy + hy, cz + hz),
                Vec3::new(cx + hx, cy + hy, cz - hz),
                Vec3::new(cx - hx, cy + hy, cz - hz),
            ],
            Vec3::Y,
        );
        // -Y
        self.push_quad(
            [
                Vec3::new(cx - hx, cy - hy, cz - hz),
                Vec3::new(cx + hx, cy - hy, cz - hz),
                Vec3::new(cx + hx, cy - hy, cz + hz),
                Vec3::new(cx - hx, cy - hy, cz + hz),
            ],
            Vec3::NEG_Y,
        );
    }
}

/// Terrain height in model units.
fn terrain_height(x: f32, z: f32) -> f32 {
    0.08 * (x * 0.9).sin() * (z * 0.7).cos() + 0.04 * (x * 2.3 + z * 1.7).sin()
}

fn terrain_normal(x: f32, z: f32) -> Vec3 {
    let dh_dx = 0.08 * 0.9 * (x * 0.9).cos() * (z * 0.7).cos() + 0.04 * 2.3 * (x * 2.3 + z * 1.7).cos();
    let dh_dz = -0.08 * 0.7 * (x * 0.9).sin() * (z * 0.7).sin() + 0.04 * 1.7 * (x * 2.3 + z * 1.7).cos();
    Vec3::new(-dh_dx, 1.0, -dh_dz).normalize()
}

/// Gently rolling ground plane.
fn terrain() -> MeshData {
    let mut mesh = MeshData::default();
    let step = 2.0 * TERRAIN_EXTENT / TERRAIN_CELLS as f32;
    for j in 0..=TERRAIN_CELLS {
        for i in 0..=TERRAIN_CELLS {
            let x = -TERRAIN_EXTENT + i as f32 * step;
            let z = -TERRAIN_EXTENT + j as f32 * step;
            mesh.vertices.push(Vertex {
                position: [x, terrain_height(x, z), z],
                normal: terrain_normal(x, z).to_array(),
                uv: [i as f32 / TERRAIN_CELLS as f32 * 8.0, j as f32 / TERRAIN_CELLS as f32 * 8.0],
            });
        }
    }
    let stride = (TERRAIN_CELLS + 1) as u32;
    for j in 0..TERRAIN_CELLS as u32 {
        for i in 0..TERRAIN_CELLS as u32 {
            let v00 = j * stride + i;
            let v10 = v00 + 1;
            let v01 = v00 + stride;
            let v11 = v01 + 1;
            mesh.indices.extend_from_slice(&[v00, v01, v11, v00, v11, v10]);
        }
    }
    mesh
}

/// Thin, mostly horizontal leaf quads floating at canopy height. Single
/// sided; the forward pass draws them twice with flipped culling.
fn canopy() -> MeshData {
    let mut mesh = MeshData::default();
    let mut rng = StdRng::seed_from_u64(SCATTER_SEED);
    for _ in 0..48 {
        let center = Vec3::new(
            rng.gen_range(-5.5..=5.5),
            rng.gen_range(0.6..=1.1),
            rng.gen_range(-5.5..=5.5),
        );
        let yaw = rng.gen_range(0.0..std::f32::consts::TAU);
        let tilt = rng.gen_range(-0.25..=0.25f32);
        let half = rng.gen_range(0.5..=0.9);
        let tangent = Vec3::new(yaw.cos(), tilt, yaw.sin()) * half;
        let bitangent = Vec3::new(-yaw.sin(), tilt, yaw.cos()) * half;
        let normal = tangent.cross(bitangent).normalize_or_zero();
        mesh.push_quad(
            [
                center - tangent - bitangent,
                center + tangent - bitangent,
                center + tangent + bitangent,
                center - tangent + bitangent,
            ],
            if normal.y < 0.0 { -normal } else { normal },
        );
    }
    mesh
}

/// Low cross-quad bushes sitting on the terrain.
fn undergrowth() -> MeshData {
    let mut mesh = MeshData::default();
    let mut rng = StdRng::seed_from_u64(SCATTER_SEED ^ 0xb05c);
    for _ in 0..64 {
        let x = rng.gen_range(-5.8..=5.8);
        let z = rng.gen_range(-5.8..=5.8);
        let base = terrain_height(x, z);
        let half_w = rng.gen_range(0.12..=0.22);
        let height = rng.gen_range(0.2..=0.35);
        let yaw = rng.gen_range(0.0..std::f32::consts::TAU);
        let dir = Vec3::new(yaw.cos(), 0.0, yaw.sin());
        let perp = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
        for tangent in [dir, perp] {
            let a = Vec3::new(x, base, z) - tangent * half_w;
            let b = Vec3::new(x, base, z) + tangent * half_w;
            let up = Vec3::Y * height;
            let normal = tangent.cross(Vec3::Y).normalize_or_zero();
            mesh.push_quad([a, b, b + up, a + up], normal);
        }
    }
    mesh
}

/// Blocky humanoid, origin at the feet. Scaled to full size by the draw
/// transform.
fn stalker() -> MeshData {
    let mut mesh = MeshData::default();
    // legs
    mesh.push_box(Vec3::new(-0.08, 0.18, 0.0), Vec3::new(0.06, 0.18, 0.06));
    mesh.push_box(Vec3::new(0.08, 0.18, 0.0), Vec3::new(0.06, 0.18, 0.06));
    // torso
    mesh.push_box(Vec3::new(0.0, 0.58, 0.0), Vec3::new(0.16, 0.22, 0.09));
    // arms
    mesh.push_box(Vec3::new(-0.24, 0.55, 0.0), Vec3::new(0.05, 0.2, 0.05));
    mesh.push_box(Vec3::new(0.24, 0.55, 0.0), Vec3::new(0.05, 0.2, 0.05));
    // head
    mesh.push_box(Vec3::new(0.0, 0.92, 0.0), Vec3::new(0.09, 0.1, 0.09));
    mesh
}

/// A thick coin standing on its edge; spins about Y in the draw transform.
fn relic() -> MeshData {
    let mut mesh = MeshData::default();
    let segments = 24u32;
    let radius = 1.2f32;
    let half_thickness = 0.15f32;

    // Caps: a center vertex plus a fan per side.
    for (z, normal) in [(half_thickness, Vec3::Z), (-half_thickness, Vec3::NEG_Z)] {
        let center_index = mesh.vertices.len() as u32;
        mesh.vertices.push(Vertex {
            position: [0.0, 0.0, z],
            normal: normal.to_array(),
            uv: [0.5, 0.5],
        });
        for s in 0..=segments {
            let angle = s as f32 / segments as f32 * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            mesh.vertices.push(Vertex {
                position: [cos * radius, sin * radius, z],
                normal: normal.to_array(),
                uv: [0.5 + cos * 0.5, 0.5 - sin * 0.5],
            });
        }
        for s in 0..segments {
            let a = center_index + 1 + s;
            let b = center_index + 2 + s;
            if normal.z > 0.0 {
                mesh.indices.extend_from_slice(&[center_index, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center_index, b, a]);
            }
        }
    }

    // Rim.
    let rim_base = mesh.vertices.len() as u32;
    for s in 0..=segments {
        let angle = s as f32 / segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        let normal = [cos, sin, 0.0];
        let u = s as f32 / segments as f32 * 4.0;
        for z in [half_thickness, -half_thickness] {
            mesh.vertices.push(Vertex {
                position: [cos * radius, sin * radius, z],
                normal,
                uv: [u, if z > 0.0 { 0.0 } else { 1.0 }],
            });
        }
    }
    for s in 0..segments {
        let a = rim_base + s * 2; // front at segment s
        let b = a + 1; // back at segment s
        let c = a + 2; // front at segment s + 1
        let d = a + 3;
        mesh.indices.extend_from_slice(&[a, d, c, a, b, d]);
    }
    mesh
}

/// Unit cube for the skybox; drawn with culling off, so winding is moot.
fn sky_cube() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_box(Vec3::ZERO, Vec3::splat(1.0));
    mesh
}

pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> MeshBuffers {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&data.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    MeshBuffers {
        vertex_buffer,
        index_buffer,
        index_count: data.indices.len() as u32,
    }
}

pub struct MeshBank {
    terrain: MeshBuffers,
    canopy: MeshBuffers,
    undergrowth: MeshBuffers,
    stalker: MeshBuffers,
    relic: MeshBuffers,
    pub sky: MeshBuffers,
}

impl MeshBank {
    pub fn build(device: &wgpu::Device) -> Self {
        Self {
            terrain: upload(device, "terrain_mesh", &terrain()),
            canopy: upload(device, "canopy_mesh", &canopy()),
            undergrowth: upload(device, "undergrowth_mesh", &undergrowth()),
            stalker: upload(device, "stalker_mesh", &stalker()),
            relic: upload(device, "relic_mesh", &relic()),
            sky: upload(device, "sky_mesh", &sky_cube()),
        }
    }

    pub fn get(&self, id: MeshId) -> &MeshBuffers {
        match id {
            MeshId::Terrain => &self.terrain,
            MeshId::Canopy => &self.canopy,
            MeshId::Undergrowth => &self.undergrowth,
            MeshId::Stalker => &self.stalker,
            MeshId::Relic => &self.relic,
        }
    }
}
