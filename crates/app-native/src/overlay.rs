//! Debug overlay boundary. The overlay owns the live editable handles
//! (clear color, a stalker position/scale pair, the hero light's attenuation
//! and the camera-mouse-update toggle); how they are drawn is delegated to
//! whichever front-end wants to present them. The native build surfaces the
//! read-only camera readout through the log at a throttled rate.

use app_core::{Camera, ATTENUATION_CONSTANT, ATTENUATION_LINEAR, ATTENUATION_QUADRATIC};
use glam::Vec3;

pub struct DebugOverlay {
    pub enabled: bool,
    /// While the overlay is up the cursor is released and mouse look pauses.
    pub camera_mouse_enabled: bool,
    pub clear_color: Vec3,
    pub stalker_offset: Vec3,
    pub stalker_scale: f32,
    /// Hero light attenuation: constant, linear, quadratic.
    pub hero_attenuation: Vec3,
    last_report_sec: f64,
}

impl DebugOverlay {
    pub fn new(clear_color: Vec3, enabled: bool) -> Self {
        Self {
            enabled,
            camera_mouse_enabled: !enabled,
            clear_color,
            stalker_offset: Vec3::ZERO,
            stalker_scale: 1.0,
            hero_attenuation: Vec3::new(
                ATTENUATION_CONSTANT,
                ATTENUATION_LINEAR,
                ATTENUATION_QUADRATIC,
            ),
            last_report_sec: 0.0,
        }
    }

    /// Emit the camera readout roughly once a second while enabled.
    pub fn maybe_report(&mut self, camera: &Camera, time_sec: f64) {
        if !self.enabled || time_sec - self.last_report_sec < 1.0 {
            return;
        }
        self.last_report_sec = time_sec;
        log::info!(
            "camera pos ({:.2}, {:.2}, {:.2}) yaw {:.1} pitch {:.1} front ({:.2}, {:.2}, {:.2})",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.yaw,
            camera.pitch,
            camera.front.x,
            camera.front.y,
            camera.front.z,
        );
    }
}
