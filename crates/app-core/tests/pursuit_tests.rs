// Host-side tests for the pursuit machine's distance band and retarget
// bounds.

use app_core::PursuitState;
use glam::Vec2;

#[test]
fn retargets_immediately_when_too_far() {
    // Camera at the origin, stalker 20 units away: distance >= 12 forces a
    // retarget into camera +- 12 on both axes.
    let mut pursuit = PursuitState::with_position(Vec2::new(0.0, 20.0), 7);
    let camera = Vec2::ZERO;
    assert!(pursuit.update(camera));
    let pos = pursuit.position();
    assert!(pos.x.abs() <= 12.0, "x out of bounds: {pos:?}");
    assert!(pos.y.abs() <= 12.0, "z out of bounds: {pos:?}");
}

#[test]
fn retargets_when_too_close() {
    let mut pursuit = PursuitState::with_position(Vec2::new(1.0, 0.0), 7);
    assert!(pursuit.update(Vec2::ZERO));
}

#[test]
fn holds_position_inside_the_band() {
    let mut pursuit = PursuitState::with_position(Vec2::new(8.0, 0.0), 7);
    assert!(!pursuit.update(Vec2::ZERO));
    assert_eq!(pursuit.position(), Vec2::new(8.0, 0.0));
}

#[test]
fn new_state_retargets_on_first_update() {
    // Fresh state starts on top of a camera at the origin (distance 0 <= 5).
    let mut pursuit = PursuitState::new(3);
    assert!(pursuit.update(Vec2::ZERO));
}

#[test]
fn retarget_bounds_hold_while_camera_wanders() {
    let mut pursuit = PursuitState::new(11);
    let mut camera = Vec2::ZERO;
    for step in 0..500 {
        camera += Vec2::new((step as f32 * 0.13).sin(), (step as f32 * 0.07).cos()) * 0.8;
        let before = pursuit.position();
        let retargeted = pursuit.update(camera);
        let pos = pursuit.position();
        if retargeted {
            assert!((pos.x - camera.x).abs() <= 12.0, "step {step}: {pos:?}");
            assert!((pos.y - camera.y).abs() <= 12.0, "step {step}: {pos:?}");
        } else {
            assert_eq!(pos, before, "position changed without a retarget");
            let distance = pos.distance(camera);
            assert!(distance > 5.0 && distance < 12.0);
        }
    }
}
