// Host-side tests for the fly camera: pitch/zoom clamping and the derived
// basis vectors.

use app_core::{Camera, CameraMovement, CAMERA_PITCH_LIMIT_DEG, CAMERA_SPEED};
use glam::Vec3;

#[test]
fn pitch_stays_clamped_for_any_mouse_sequence() {
    let mut camera = Camera::new(Vec3::ZERO);
    // Mix of huge and tiny deltas in both directions.
    let deltas = [
        (0.0, 10_000.0),
        (5.0, -25_000.0),
        (-3.0, 400.0),
        (0.0, -0.01),
        (1e6, 1e6),
        (-1e6, -1e6),
        (0.0, 179.9),
    ];
    for _ in 0..50 {
        for (dx, dy) in deltas {
            camera.process_mouse_movement(dx, dy);
            assert!(
                camera.pitch.abs() <= CAMERA_PITCH_LIMIT_DEG,
                "pitch escaped the clamp: {}",
                camera.pitch
            );
            assert!(camera.front.is_finite());
            assert!(
                (camera.front.length() - 1.0).abs() < 1e-4,
                "front not unit length: {:?}",
                camera.front
            );
        }
    }
}

#[test]
fn zoom_clamps_to_fov_bounds() {
    let mut camera = Camera::new(Vec3::ZERO);
    camera.process_mouse_scroll(1_000.0);
    assert_eq!(camera.zoom, 1.0);
    camera.process_mouse_scroll(-1_000.0);
    assert_eq!(camera.zoom, 45.0);
    camera.process_mouse_scroll(5.0);
    assert_eq!(camera.zoom, 40.0);
}

#[test]
fn keyboard_moves_along_front_and_right() {
    // Default yaw looks down -Z, so forward decreases z and right increases x.
    let mut camera = Camera::new(Vec3::ZERO);
    camera.process_keyboard(CameraMovement::Forward, 1.0);
    assert!((camera.position.z + CAMERA_SPEED).abs() < 1e-5);
    assert!(camera.position.x.abs() < 1e-5);

    camera.process_keyboard(CameraMovement::Right, 1.0);
    assert!((camera.position.x - CAMERA_SPEED).abs() < 1e-5);

    camera.process_keyboard(CameraMovement::Backward, 1.0);
    camera.process_keyboard(CameraMovement::Left, 1.0);
    assert!(camera.position.length() < 1e-4);
}

#[test]
fn view_matrix_maps_look_target_onto_view_axis() {
    let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
    camera.process_mouse_movement(123.0, -45.0);
    let view = camera.view_matrix();
    let ahead = view.transform_point3(camera.position + camera.front);
    // A point one unit along front lands one unit down the view -Z axis.
    assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-4), "{ahead:?}");
}

#[test]
fn set_front_rederives_yaw_and_pitch() {
    let mut camera = Camera::new(Vec3::ZERO);
    camera.set_front(Vec3::new(0.0, 0.0, 1.0));
    assert!(camera.front.abs_diff_eq(Vec3::Z, 1e-5));
    assert!((camera.yaw - 90.0).abs() < 1e-3);
    assert!(camera.pitch.abs() < 1e-3);

    let diagonal = Vec3::new(1.0, 1.0, 0.0).normalize();
    camera.set_front(diagonal);
    assert!(camera.front.abs_diff_eq(diagonal, 1e-4), "{:?}", camera.front);
    assert!((camera.pitch - 45.0).abs() < 1e-3);
}

#[test]
fn set_front_ignores_zero_vector() {
    let mut camera = Camera::new(Vec3::ZERO);
    let before = camera.front;
    camera.set_front(Vec3::ZERO);
    assert_eq!(camera.front, before);
}
