// Host-side tests for per-frame draw-list construction and the stalker
// transform builders.

use app_core::{
    frame_instances, relic_transform, scrambled_stalker_transform, stalker_transform, CullMode,
    FrameParams, MeshId,
};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn params<'a>(anchors: &'a [Vec3], discard: bool, scramble: bool) -> FrameParams<'a> {
    FrameParams {
        time_sec: 2.5,
        camera_position: Vec3::new(0.0, 1.0, 8.0),
        stalker_xz: Vec2::new(3.0, -4.0),
        discard_stalker: discard,
        scramble_stalker: scramble,
        relic_anchors: anchors,
    }
}

#[test]
fn draw_order_and_cull_modes_are_fixed() {
    let anchors = [Vec3::new(10.0, 1.5, -7.0), Vec3::new(-20.0, 1.5, 4.0)];
    let mut rng = StdRng::seed_from_u64(1);
    let instances = frame_instances(&params(&anchors, false, false), &mut rng);

    let meshes: Vec<MeshId> = instances.iter().map(|i| i.mesh).collect();
    assert_eq!(
        meshes,
        vec![
            MeshId::Terrain,
            MeshId::Canopy,
            MeshId::Canopy,
            MeshId::Undergrowth,
            MeshId::Stalker,
            MeshId::Relic,
            MeshId::Relic,
        ]
    );
    let culls: Vec<CullMode> = instances.iter().map(|i| i.cull).collect();
    assert_eq!(
        &culls[..5],
        &[
            CullMode::Back,
            CullMode::Front,
            CullMode::Off,
            CullMode::Off,
            CullMode::Back,
        ]
    );
    assert!(instances.iter().all(|i| i.casts_shadow));
    assert!(instances.iter().all(|i| !i.discard));
}

#[test]
fn stalker_discard_flag_follows_flicker() {
    let anchors = [Vec3::new(10.0, 1.5, -7.0)];
    let mut rng = StdRng::seed_from_u64(1);
    let instances = frame_instances(&params(&anchors, true, false), &mut rng);
    for instance in &instances {
        assert_eq!(instance.discard, instance.mesh == MeshId::Stalker);
    }
}

#[test]
fn stalker_transform_places_origin_at_ground_target() {
    let transform = stalker_transform(Vec2::new(3.0, -4.0), Vec3::new(0.0, 1.0, 8.0));
    let origin = transform.transform_point3(Vec3::ZERO);
    assert!(origin.abs_diff_eq(Vec3::new(3.0, 0.1, -4.0), 1e-4), "{origin:?}");
    assert!(transform.determinant().abs() > 1e-3);
}

#[test]
fn stalker_transform_survives_degenerate_view_direction() {
    // Camera directly above the stalker: the look-at up axis is parallel to
    // the view direction, which must not produce NaNs.
    let transform = stalker_transform(Vec2::new(3.0, -4.0), Vec3::new(3.0, 5.0, -4.0));
    assert!(transform.is_finite());
    let origin = transform.transform_point3(Vec3::ZERO);
    assert!(origin.abs_diff_eq(Vec3::new(3.0, 0.1, -4.0), 1e-4));

    // Camera exactly on top of the stalker origin.
    let coincident = stalker_transform(Vec2::new(0.0, 0.0), Vec3::new(0.0, 0.1, 0.0));
    assert!(coincident.is_finite());
}

#[test]
fn scramble_jitter_is_bounded() {
    let mut rng = StdRng::seed_from_u64(99);
    let ground = Vec2::new(5.0, 5.0);
    let camera = Vec3::new(0.0, 1.0, 0.0);
    for _ in 0..200 {
        let transform = scrambled_stalker_transform(ground, camera, &mut rng);
        let origin = transform.transform_point3(Vec3::ZERO);
        assert!((origin.x - ground.x).abs() <= 1.0 + 1e-4);
        assert!((origin.y - 0.1).abs() <= 1.0 / 3.0 + 1e-4);
        assert!((origin.z - ground.y).abs() <= 1.0 + 1e-4);
    }
}

#[test]
fn relic_spins_in_place_around_its_anchor() {
    let anchor = Vec3::new(-20.0, 1.5, 4.0);
    let at_start = relic_transform(anchor, 0.0);
    assert!(at_start
        .transform_point3(Vec3::ZERO)
        .abs_diff_eq(anchor, 1e-5));

    // A full revolution later the transform repeats.
    let period = 360.0 / 125.0;
    let after_turn = relic_transform(anchor, period);
    let probe = Vec3::new(1.0, 0.0, 0.0);
    assert!(at_start
        .transform_point3(probe)
        .abs_diff_eq(after_turn.transform_point3(probe), 1e-4));

    // Halfway through the revolution the probe is mirrored across the anchor.
    let half_turn = relic_transform(anchor, period / 2.0);
    let a = at_start.transform_point3(probe) - anchor;
    let b = half_turn.transform_point3(probe) - anchor;
    assert!(a.abs_diff_eq(-b, 1e-4), "{a:?} vs {b:?}");
}

#[test]
fn scrambled_frame_still_keeps_draw_order() {
    let anchors = [Vec3::new(10.0, 1.5, -7.0)];
    let mut rng = StdRng::seed_from_u64(4);
    let instances = frame_instances(&params(&anchors, true, true), &mut rng);
    assert_eq!(instances[4].mesh, MeshId::Stalker);
    assert!(instances[4].discard);
    assert_eq!(instances.len(), 6);
}
