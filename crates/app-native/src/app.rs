use std::path::Path;

use glam::{Mat3, Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window};

use app_core::{
    cube_shadow_transforms, frame_instances, Camera, CameraMovement, DrawInstance, FlickerFrame,
    FlickerState, FrameParams, LightRig, MeshId, PointLight, ProgramSettings, PursuitState,
    EXPOSURE_DEFAULT, EXPOSURE_STEP, LIGHT_COUNT,
};

use crate::overlay::DebugOverlay;

/// Base seed for everything random in a run, so a session is reproducible.
const WORLD_SEED: u64 = 42;

/// Everything the render pass needs for one frame, assembled by [`App`].
pub struct FramePlan {
    pub instances: Vec<DrawInstance>,
    pub lights: Vec<PointLight>,
    pub view_proj: Mat4,
    pub sky_view_proj: Mat4,
    pub view_pos: Vec3,
    pub shadow_transforms: [Mat4; 6],
    pub hero_position: Vec3,
    pub clear_color: Vec3,
    pub bloom_enabled: bool,
    pub exposure: f32,
    pub shadows_enabled: bool,
}

#[derive(Default)]
struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    exposure_up: bool,
    exposure_down: bool,
}

/// Mutable state of the whole application, owned by the main loop and passed
/// by reference into input handling and rendering. Nothing here is global.
pub struct App {
    pub camera: Camera,
    pub rig: LightRig,
    pub flicker: FlickerState,
    pub pursuit: PursuitState,
    pub overlay: DebugOverlay,
    pub bloom_enabled: bool,
    pub exposure: f32,
    pub shadows_enabled: bool,
    scramble_rng: StdRng,
    flicker_frame: FlickerFrame,
    time_sec: f64,
    held: HeldKeys,
    last_cursor: Option<(f32, f32)>,
}

impl App {
    pub fn new(settings: ProgramSettings) -> Self {
        let mut camera = Camera::new(settings.camera_position);
        camera.set_front(settings.camera_front);
        // Derive per-subsystem seeds from the base so they stay independent.
        let mix = |i: u64| WORLD_SEED ^ i.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self {
            camera,
            rig: LightRig::new(LIGHT_COUNT, mix(1)),
            flicker: FlickerState::default(),
            pursuit: PursuitState::new(mix(2)),
            overlay: DebugOverlay::new(settings.clear_color, settings.overlay_enabled),
            bloom_enabled: true,
            exposure: EXPOSURE_DEFAULT,
            shadows_enabled: true,
            scramble_rng: StdRng::seed_from_u64(mix(3)),
            flicker_frame: FlickerFrame::default(),
            time_sec: 0.0,
            held: HeldKeys::default(),
            last_cursor: None,
        }
    }

    /// Per-frame simulation step: camera movement from held keys, then the
    /// behavior machines, then the light rig.
    pub fn update(&mut self, dt: f32, time_sec: f64) {
        self.time_sec = time_sec;

        if self.held.forward {
            self.camera.process_keyboard(CameraMovement::Forward, dt);
        }
        if self.held.backward {
            self.camera.process_keyboard(CameraMovement::Backward, dt);
        }
        if self.held.left {
            self.camera.process_keyboard(CameraMovement::Left, dt);
        }
        if self.held.right {
            self.camera.process_keyboard(CameraMovement::Right, dt);
        }
        if self.held.exposure_down {
            self.exposure = (self.exposure - EXPOSURE_STEP).max(0.0);
        }
        if self.held.exposure_up {
            self.exposure += EXPOSURE_STEP;
        }

        self.flicker_frame = self.flicker.advance(time_sec);
        let camera_xz = Vec2::new(self.camera.position.x, self.camera.position.z);
        self.pursuit.update(camera_xz);
        self.rig.update(
            time_sec as f32,
            self.pursuit.position(),
            self.flicker_frame.light_off,
        );

        // Write the overlay's attenuation handles through to the hero light.
        let hero = self.rig.hero_mut();
        hero.constant = self.overlay.hero_attenuation.x;
        hero.linear = self.overlay.hero_attenuation.y;
        hero.quadratic = self.overlay.hero_attenuation.z;

        self.overlay.maybe_report(&self.camera, time_sec);
    }

    /// Assemble the per-frame draw list, matrices and light state.
    pub fn frame_plan(&mut self, aspect: f32) -> FramePlan {
        let anchors: Vec<Vec3> = self.rig.decorative_positions().collect();
        let params = FrameParams {
            time_sec: self.time_sec as f32,
            camera_position: self.camera.position,
            stalker_xz: self.pursuit.position(),
            discard_stalker: self.flicker_frame.light_off,
            scramble_stalker: self.flicker_frame.scramble,
            relic_anchors: &anchors,
        };
        let mut instances = frame_instances(&params, &mut self.scramble_rng);

        // The overlay's position/scale handles adjust the stalker only.
        if let Some(stalker) = instances.iter_mut().find(|i| i.mesh == MeshId::Stalker) {
            stalker.transform = Mat4::from_translation(self.overlay.stalker_offset)
                * stalker.transform
                * Mat4::from_scale(Vec3::splat(self.overlay.stalker_scale));
        }

        let view = self.camera.view_matrix();
        let proj = self.camera.projection_matrix(aspect);
        let sky_view = Mat4::from_mat3(Mat3::from_mat4(view));

        FramePlan {
            instances,
            lights: self.rig.lights().to_vec(),
            view_proj: proj * view,
            sky_view_proj: proj * sky_view,
            view_pos: self.camera.position,
            shadow_transforms: cube_shadow_transforms(self.rig.hero().position),
            hero_position: self.rig.hero().position,
            clear_color: self.overlay.clear_color,
            bloom_enabled: self.bloom_enabled,
            exposure: self.exposure,
            shadows_enabled: self.shadows_enabled,
        }
    }

    /// Handle a keyboard event. Returns true when the app should exit.
    pub fn handle_key(&mut self, event: &KeyEvent, window: &Window) -> bool {
        let pressed = event.state == ElementState::Pressed;
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => return pressed,
            PhysicalKey::Code(KeyCode::KeyW) => self.held.forward = pressed,
            PhysicalKey::Code(KeyCode::KeyS) => self.held.backward = pressed,
            PhysicalKey::Code(KeyCode::KeyA) => self.held.left = pressed,
            PhysicalKey::Code(KeyCode::KeyD) => self.held.right = pressed,
            PhysicalKey::Code(KeyCode::KeyQ) => self.held.exposure_down = pressed,
            PhysicalKey::Code(KeyCode::KeyE) => self.held.exposure_up = pressed,
            PhysicalKey::Code(KeyCode::Space) => {
                if pressed && !event.repeat {
                    self.bloom_enabled = !self.bloom_enabled;
                    log::info!(
                        "bloom {} | exposure {:.3}",
                        if self.bloom_enabled { "on" } else { "off" },
                        self.exposure
                    );
                }
            }
            PhysicalKey::Code(KeyCode::F1) => {
                if pressed && !event.repeat {
                    self.toggle_overlay(window);
                }
            }
            _ => {}
        }
        false
    }

    pub fn handle_cursor(&mut self, x: f32, y: f32) {
        let (dx, dy) = match self.last_cursor {
            Some((last_x, last_y)) => (x - last_x, last_y - y), // y grows downward
            None => (0.0, 0.0),
        };
        self.last_cursor = Some((x, y));
        if self.overlay.camera_mouse_enabled {
            self.camera.process_mouse_movement(dx, dy);
        }
    }

    pub fn handle_scroll(&mut self, dy: f32) {
        self.camera.process_mouse_scroll(dy);
    }

    fn toggle_overlay(&mut self, window: &Window) {
        self.overlay.enabled = !self.overlay.enabled;
        self.overlay.camera_mouse_enabled = !self.overlay.enabled;
        self.apply_cursor_mode(window);
        // Forget the last cursor position so look-around does not jump when
        // the cursor is re-captured.
        self.last_cursor = None;
    }

    /// Capture the cursor for mouse look, or release it while the overlay is
    /// up. Grab failures (some window managers) are non-fatal.
    pub fn apply_cursor_mode(&self, window: &Window) {
        if self.overlay.enabled {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        } else {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(err) = grabbed {
                log::warn!("cursor grab unavailable: {err}");
            }
            window.set_cursor_visible(false);
        }
    }

    pub fn save_settings(&self, path: &Path) {
        let settings = ProgramSettings {
            clear_color: self.overlay.clear_color,
            overlay_enabled: self.overlay.enabled,
            camera_position: self.camera.position,
            camera_front: self.camera.front,
        };
        match settings.save(path) {
            Ok(()) => log::info!("saved program state to {}", path.display()),
            Err(err) => log::warn!("failed to save program state to {}: {err}", path.display()),
        }
    }
}
