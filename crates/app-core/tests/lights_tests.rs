// Host-side tests for light rig construction and per-frame updates.

use app_core::{LightRig, HERO_HIDDEN_Y, LIGHT_COUNT};
use glam::Vec2;

#[test]
fn rig_has_hero_plus_decoratives_within_field() {
    let rig = LightRig::new(LIGHT_COUNT, 42);
    assert_eq!(rig.lights().len(), LIGHT_COUNT);

    let hero = rig.hero();
    assert_eq!(hero.ambient.x, 0.5);
    assert_eq!(hero.ambient.y, 0.3);
    assert_eq!(hero.specular.z, 0.2);
    assert_eq!(hero.linear, 0.48);

    for light in &rig.lights()[1..] {
        assert!(light.position.x.abs() <= 40.0);
        assert!(light.position.z.abs() <= 40.0);
    }
}

#[test]
fn decorative_horizontal_positions_never_move() {
    let mut rig = LightRig::new(LIGHT_COUNT, 42);
    let anchors: Vec<(f32, f32)> = rig.lights()[1..]
        .iter()
        .map(|l| (l.position.x, l.position.z))
        .collect();

    for step in 0..200 {
        rig.update(step as f32 * 0.16, Vec2::new(3.0, -2.0), step % 7 == 0);
        for (light, (x, z)) in rig.lights()[1..].iter().zip(&anchors) {
            assert_eq!(light.position.x, *x);
            assert_eq!(light.position.z, *z);
            assert!(light.position.y >= 1.375 && light.position.y <= 1.625);
        }
    }
}

#[test]
fn hero_follows_target_with_bounded_bob() {
    let mut rig = LightRig::new(LIGHT_COUNT, 42);
    for step in 0..200 {
        let t = step as f32 * 0.33;
        rig.update(t, Vec2::new(3.0, 4.0), false);
        let hero = rig.hero();
        assert_eq!(hero.position.x, 3.0);
        assert_eq!(hero.position.z, 4.0);
        assert!(hero.position.y >= 4.25 && hero.position.y <= 4.75);
    }
}

#[test]
fn hero_parked_below_scene_while_hidden() {
    let mut rig = LightRig::new(LIGHT_COUNT, 42);
    rig.update(1.0, Vec2::new(-5.0, 9.0), true);
    assert_eq!(rig.hero().position.y, HERO_HIDDEN_Y);
    // Visible again next frame.
    rig.update(1.016, Vec2::new(-5.0, 9.0), false);
    assert!(rig.hero().position.y > 4.0);
}
