use glam::{Mat4, Vec3};

use crate::constants::*;

/// Movement directions understood by [`Camera::process_keyboard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Fly camera driven by yaw/pitch angles (degrees) with a perspective zoom.
///
/// The derived `front`/`right`/`up` vectors are recomputed whenever the
/// orientation changes and are defensively normalized, so degenerate input
/// never propagates NaNs into the view matrix.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: CAMERA_YAW_DEFAULT_DEG,
            pitch: 0.0,
            zoom: CAMERA_ZOOM_DEFAULT_DEG,
        };
        camera.update_vectors();
        camera
    }

    /// Translate along the front/right axes, scaled by `dt` and a fixed speed.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = CAMERA_SPEED * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a cursor delta (pixels) to yaw/pitch. Pitch is clamped so the
    /// view never flips over the vertical axis.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * CAMERA_SENSITIVITY;
        self.pitch = (self.pitch + dy * CAMERA_SENSITIVITY)
            .clamp(-CAMERA_PITCH_LIMIT_DEG, CAMERA_PITCH_LIMIT_DEG);
        self.update_vectors();
    }

    /// Apply a scroll delta to the field of view, kept within [1, 45] degrees.
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(CAMERA_ZOOM_MIN_DEG, CAMERA_ZOOM_MAX_DEG);
    }

    /// Point the camera along `front`, rederiving yaw/pitch. Used to restore
    /// a persisted orientation; a zero-length vector leaves the camera as is.
    pub fn set_front(&mut self, front: Vec3) {
        let front = front.normalize_or_zero();
        if front == Vec3::ZERO {
            return;
        }
        self.pitch = front
            .y
            .asin()
            .to_degrees()
            .clamp(-CAMERA_PITCH_LIMIT_DEG, CAMERA_PITCH_LIMIT_DEG);
        self.yaw = front.z.atan2(front.x).to_degrees();
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.zoom.to_radians(),
            aspect.max(1e-4),
            CAMERA_NEAR,
            CAMERA_FAR,
        )
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize_or_zero();
        if self.front == Vec3::ZERO {
            self.front = Vec3::NEG_Z;
        }
        self.right = self.front.cross(self.world_up).normalize_or_zero();
        if self.right == Vec3::ZERO {
            self.right = Vec3::X;
        }
        self.up = self.right.cross(self.front).normalize_or_zero();
        if self.up == Vec3::ZERO {
            self.up = Vec3::Y;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
