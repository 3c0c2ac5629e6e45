use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::constants::*;

/// A point light with Blinn-Phong color terms and distance attenuation.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

/// Fixed-size set of scene lights.
///
/// Light 0 is the shadow-casting hero light and follows the pursuit target;
/// the rest are decorative, get a seeded random horizontal position at
/// construction and never move horizontally again. There are no add/remove
/// operations after startup.
#[derive(Clone, Debug)]
pub struct LightRig {
    lights: Vec<PointLight>,
}

impl LightRig {
    pub fn new(light_count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut lights = Vec::with_capacity(light_count);
        lights.push(PointLight {
            position: Vec3::new(0.0, HERO_BASE_HEIGHT, 0.0),
            ambient: Vec3::new(0.5, 0.3, 0.3),
            diffuse: Vec3::new(0.5, 0.3, 0.3),
            specular: Vec3::new(0.5, 0.2, 0.2),
            constant: ATTENUATION_CONSTANT,
            linear: ATTENUATION_LINEAR,
            quadratic: ATTENUATION_QUADRATIC,
        });
        for _ in 1..light_count {
            let x = rng.gen_range(-LIGHT_FIELD_EXTENT..=LIGHT_FIELD_EXTENT);
            let z = rng.gen_range(-LIGHT_FIELD_EXTENT..=LIGHT_FIELD_EXTENT);
            lights.push(PointLight {
                position: Vec3::new(x, DECOR_BASE_HEIGHT, z),
                ambient: Vec3::splat(0.5),
                diffuse: Vec3::splat(0.5),
                specular: Vec3::splat(0.5),
                constant: ATTENUATION_CONSTANT,
                linear: ATTENUATION_LINEAR,
                quadratic: ATTENUATION_QUADRATIC,
            });
        }
        Self { lights }
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn hero(&self) -> &PointLight {
        &self.lights[0]
    }

    pub fn hero_mut(&mut self) -> &mut PointLight {
        &mut self.lights[0]
    }

    /// Positions of the decorative lights; the relic props are drawn here.
    pub fn decorative_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.lights[1..].iter().map(|light| light.position)
    }

    /// Advance all light positions for this frame. The hero tracks the
    /// pursuit target with a slow vertical bob unless it is hidden, in which
    /// case it is parked far below the scene.
    pub fn update(&mut self, time_sec: f32, hero_xz: Vec2, hero_hidden: bool) {
        let hero_y = if hero_hidden {
            HERO_HIDDEN_Y
        } else {
            HERO_BASE_HEIGHT + (time_sec * HERO_BOB_RATE).cos() * HERO_BOB_AMPLITUDE
        };
        self.lights[0].position = Vec3::new(hero_xz.x, hero_y, hero_xz.y);

        let decor_y = DECOR_BASE_HEIGHT + (time_sec * DECOR_BOB_RATE).cos() * DECOR_BOB_AMPLITUDE;
        for light in &mut self.lights[1..] {
            light.position.y = decor_y;
        }
    }
}
