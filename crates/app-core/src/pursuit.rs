//! Keeps the stalker inside a distance band around the camera by drawing a
//! fresh target position whenever it drifts too far away or too close.

use glam::Vec2;
use rand::prelude::*;

use crate::constants::{CHASE_MAX_DISTANCE, CHASE_MIN_DISTANCE, RETARGET_SPREAD};

#[derive(Clone, Debug)]
pub struct PursuitState {
    pos: Vec2,
    rng: StdRng,
}

impl PursuitState {
    pub fn new(seed: u64) -> Self {
        Self::with_position(Vec2::ZERO, seed)
    }

    pub fn with_position(pos: Vec2, seed: u64) -> Self {
        Self {
            pos,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Ground-plane (x, z) position of the stalker.
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Step the machine against the camera's ground position. Returns true
    /// when a retarget happened this frame.
    pub fn update(&mut self, camera_xz: Vec2) -> bool {
        let distance = self.pos.distance(camera_xz);
        if distance >= CHASE_MAX_DISTANCE || distance <= CHASE_MIN_DISTANCE {
            self.pos = camera_xz
                + Vec2::new(
                    self.rng.gen_range(-RETARGET_SPREAD..=RETARGET_SPREAD),
                    self.rng.gen_range(-RETARGET_SPREAD..=RETARGET_SPREAD),
                );
            return true;
        }
        false
    }
}
