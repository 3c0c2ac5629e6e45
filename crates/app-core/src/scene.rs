//! Per-frame construction of the drawable list: one homogeneous sequence of
//! instance descriptors the render passes iterate uniformly, instead of one
//! hand-written block per model.

use glam::{Mat4, Vec2, Vec3};
use rand::Rng;

use crate::constants::*;

/// Meshes known to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshId {
    Terrain,
    Canopy,
    Undergrowth,
    Stalker,
    Relic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullMode {
    Back,
    Front,
    Off,
}

/// One drawable for this frame. The forward pass consumes these in order;
/// the shadow pass consumes the subset with `casts_shadow` set.
#[derive(Clone, Copy, Debug)]
pub struct DrawInstance {
    pub mesh: MeshId,
    pub transform: Mat4,
    pub cull: CullMode,
    pub discard: bool,
    pub casts_shadow: bool,
}

/// Inputs to [`frame_instances`], gathered from the behavior machines and
/// the light rig once per frame.
pub struct FrameParams<'a> {
    pub time_sec: f32,
    pub camera_position: Vec3,
    pub stalker_xz: Vec2,
    pub discard_stalker: bool,
    pub scramble_stalker: bool,
    pub relic_anchors: &'a [Vec3],
}

/// Rotation axis for the stalker's 180-degree flip, slightly tilted off
/// vertical so the silhouette leans.
const STALKER_FLIP_AXIS: Vec3 = Vec3::new(0.0, 1.0, -0.2);

/// Build the frame's draw list. Order is fixed: terrain, canopy twice (front
/// cull then cull disabled, to show both sides of the thin geometry without
/// z-fighting), undergrowth, stalker, then one relic per anchor.
pub fn frame_instances(params: &FrameParams, rng: &mut impl Rng) -> Vec<DrawInstance> {
    let mut instances = Vec::with_capacity(5 + params.relic_anchors.len());
    let terrain = Mat4::from_scale(Vec3::splat(TERRAIN_SCALE));

    instances.push(DrawInstance {
        mesh: MeshId::Terrain,
        transform: terrain,
        cull: CullMode::Back,
        discard: false,
        casts_shadow: true,
    });
    instances.push(DrawInstance {
        mesh: MeshId::Canopy,
        transform: terrain,
        cull: CullMode::Front,
        discard: false,
        casts_shadow: true,
    });
    instances.push(DrawInstance {
        mesh: MeshId::Canopy,
        transform: terrain,
        cull: CullMode::Off,
        discard: false,
        casts_shadow: true,
    });
    instances.push(DrawInstance {
        mesh: MeshId::Undergrowth,
        transform: terrain,
        cull: CullMode::Off,
        discard: false,
        casts_shadow: true,
    });

    let stalker = if params.scramble_stalker {
        scrambled_stalker_transform(params.stalker_xz, params.camera_position, rng)
    } else {
        stalker_transform(params.stalker_xz, params.camera_position)
    };
    instances.push(DrawInstance {
        mesh: MeshId::Stalker,
        transform: stalker,
        cull: CullMode::Back,
        discard: params.discard_stalker,
        casts_shadow: true,
    });

    for anchor in params.relic_anchors {
        instances.push(DrawInstance {
            mesh: MeshId::Relic,
            transform: relic_transform(*anchor, params.time_sec),
            cull: CullMode::Back,
            discard: false,
            casts_shadow: true,
        });
    }

    instances
}

/// Place the stalker at its ground position, upright and turned toward the
/// camera.
pub fn stalker_transform(ground_xz: Vec2, camera_position: Vec3) -> Mat4 {
    let eye = Vec3::new(ground_xz.x, STALKER_BASE_HEIGHT, ground_xz.y);
    facing(eye, camera_position)
        * Mat4::from_scale(Vec3::splat(STALKER_SCALE))
        * Mat4::from_axis_angle(STALKER_FLIP_AXIS.normalize(), std::f32::consts::PI)
}

/// One-frame teleport dressing: the stalker is drawn with a bounded random
/// offset and tilt while its pursuit position stays untouched.
pub fn scrambled_stalker_transform(
    ground_xz: Vec2,
    camera_position: Vec3,
    rng: &mut impl Rng,
) -> Mat4 {
    let jx = rng.gen_range(-SCRAMBLE_XZ_JITTER..=SCRAMBLE_XZ_JITTER);
    let jy = rng.gen_range(-SCRAMBLE_Y_JITTER..=SCRAMBLE_Y_JITTER);
    let jz = rng.gen_range(-SCRAMBLE_XZ_JITTER..=SCRAMBLE_XZ_JITTER);
    let rx = rng
        .gen_range(-SCRAMBLE_TILT_DEG..=SCRAMBLE_TILT_DEG)
        .to_radians();
    let ry = rng
        .gen_range(-SCRAMBLE_TILT_DEG..=SCRAMBLE_TILT_DEG)
        .to_radians();
    let rz = rng
        .gen_range(-SCRAMBLE_TILT_DEG..=SCRAMBLE_TILT_DEG)
        .to_radians();
    let eye = Vec3::new(
        ground_xz.x + jx,
        STALKER_BASE_HEIGHT + jy,
        ground_xz.y + jz,
    );
    facing(eye, camera_position)
        * Mat4::from_axis_angle(STALKER_FLIP_AXIS.normalize(), std::f32::consts::PI)
        * Mat4::from_scale(Vec3::splat(STALKER_SCALE))
        * Mat4::from_rotation_x(rx)
        * Mat4::from_rotation_y(ry)
        * Mat4::from_rotation_z(rz)
}

/// Spin-and-bob transform for a relic prop around its light anchor.
pub fn relic_transform(anchor: Vec3, time_sec: f32) -> Mat4 {
    Mat4::from_translation(anchor)
        * Mat4::from_scale(Vec3::splat(RELIC_SCALE))
        * Mat4::from_rotation_y((RELIC_SPIN_DEG_PER_SEC * time_sec).to_radians())
}

/// Model matrix positioning an object at `eye` looking toward `target`.
/// Degenerate directions (zero length, or parallel to the up axis) fall back
/// to fixed axes instead of producing NaNs.
fn facing(eye: Vec3, target: Vec3) -> Mat4 {
    let mut dir = (target - eye).normalize_or_zero();
    if dir == Vec3::ZERO {
        dir = Vec3::Z;
    }
    let up = if dir.dot(Vec3::Y).abs() > 0.999 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    Mat4::look_at_rh(eye, eye + dir, up).inverse()
}
