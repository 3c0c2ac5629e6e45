//! View-projection construction for omnidirectional shadow mapping: six
//! square 90-degree frusta covering the cube faces around a point light.

use glam::{Mat4, Vec3};

use crate::constants::{SHADOW_FAR, SHADOW_NEAR};

/// Cube-face (forward, up) pairs in +X, -X, +Y, -Y, +Z, -Z order. The up
/// vectors match the cubemap face orientations the sampler expects.
pub const CUBE_FACES: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Y),
    (Vec3::NEG_X, Vec3::NEG_Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::NEG_Z),
    (Vec3::Z, Vec3::NEG_Y),
    (Vec3::NEG_Z, Vec3::NEG_Y),
];

/// The 90-degree square-aspect projection shared by all six faces.
pub fn shadow_projection() -> Mat4 {
    Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, SHADOW_NEAR, SHADOW_FAR)
}

/// Build the six face view-projection matrices for a light at `light_pos`.
/// Rebuilt every frame; the matrices live for one frame only.
pub fn cube_shadow_transforms(light_pos: Vec3) -> [Mat4; 6] {
    let proj = shadow_projection();
    CUBE_FACES.map(|(dir, up)| proj * Mat4::look_at_rh(light_pos, light_pos + dir, up))
}
