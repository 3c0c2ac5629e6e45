// Host-side tests for the cube shadow transform set: each face frustum must
// look straight down its axis with the declared near/far range.

use app_core::{cube_shadow_transforms, CUBE_FACES, SHADOW_FAR, SHADOW_NEAR};
use glam::{Vec3, Vec4};

#[test]
fn each_face_axis_projects_to_its_face_center() {
    let light = Vec3::new(2.0, 4.5, -1.0);
    let transforms = cube_shadow_transforms(light);
    for (matrix, (dir, _up)) in transforms.iter().zip(CUBE_FACES) {
        let probe = light + dir * 10.0;
        let clip = *matrix * Vec4::new(probe.x, probe.y, probe.z, 1.0);
        assert!(clip.w > 0.0, "face axis behind its own frustum");
        assert!((clip.x / clip.w).abs() < 1e-4, "off-center x for {dir:?}");
        assert!((clip.y / clip.w).abs() < 1e-4, "off-center y for {dir:?}");
    }
}

#[test]
fn near_and_far_planes_map_to_unit_depth_range() {
    let light = Vec3::ZERO;
    let transforms = cube_shadow_transforms(light);
    for (matrix, (dir, _up)) in transforms.iter().zip(CUBE_FACES) {
        let near = *matrix * (light + dir * SHADOW_NEAR).extend(1.0);
        let far = *matrix * (light + dir * SHADOW_FAR).extend(1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }
}

#[test]
fn opposite_axis_falls_behind_the_face() {
    let light = Vec3::new(-3.0, 1.0, 7.0);
    let transforms = cube_shadow_transforms(light);
    for (matrix, (dir, _up)) in transforms.iter().zip(CUBE_FACES) {
        let behind = *matrix * (light - dir * 5.0).extend(1.0);
        assert!(behind.w < 0.0, "opposite axis should project behind {dir:?}");
    }
}

#[test]
fn inverse_unprojects_face_center_back_onto_the_axis() {
    let light = Vec3::new(1.0, 2.0, 3.0);
    let transforms = cube_shadow_transforms(light);
    for (matrix, (dir, _up)) in transforms.iter().zip(CUBE_FACES) {
        // Unproject the center of the face at mid depth; the result must lie
        // on the ray from the light along the face direction.
        let world = matrix.inverse().project_point3(Vec3::new(0.0, 0.0, 0.5));
        let recovered = (world - light).normalize();
        assert!(
            recovered.abs_diff_eq(dir, 1e-3),
            "expected {dir:?}, got {recovered:?}"
        );
    }
}
