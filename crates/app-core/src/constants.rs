// Shared tuning constants for the scene, the animation machines and the
// presentation chain. Keeping them here makes the behavior of the flicker
// and pursuit machines tunable and testable without touching the frame loop.

// Window / projection
pub const WINDOW_WIDTH: u32 = 1920;
pub const WINDOW_HEIGHT: u32 = 1080;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

// Camera controls
pub const CAMERA_SPEED: f32 = 2.5; // world units per second
pub const CAMERA_SENSITIVITY: f32 = 0.1; // degrees per cursor pixel
pub const CAMERA_PITCH_LIMIT_DEG: f32 = 89.0;
pub const CAMERA_YAW_DEFAULT_DEG: f32 = -90.0; // looking down -Z
pub const CAMERA_ZOOM_MIN_DEG: f32 = 1.0;
pub const CAMERA_ZOOM_MAX_DEG: f32 = 45.0;
pub const CAMERA_ZOOM_DEFAULT_DEG: f32 = 45.0;

// Light rig
pub const LIGHT_COUNT: usize = 5; // light 0 is the hero, the rest decorative
pub const LIGHT_FIELD_EXTENT: f32 = 40.0; // decorative x/z drawn in [-40, 40]
pub const HERO_BASE_HEIGHT: f32 = 4.5;
pub const HERO_BOB_AMPLITUDE: f32 = 0.25;
pub const HERO_BOB_RATE: f32 = 0.25; // radians per second
pub const HERO_HIDDEN_Y: f32 = -20.0; // far below the scene while flickered off
pub const DECOR_BASE_HEIGHT: f32 = 1.5;
pub const DECOR_BOB_AMPLITUDE: f32 = 0.125;
pub const DECOR_BOB_RATE: f32 = 2.0;
pub const ATTENUATION_CONSTANT: f32 = 1.0;
pub const ATTENUATION_LINEAR: f32 = 0.48;
pub const ATTENUATION_QUADRATIC: f32 = 0.48;

// Flicker machine
pub const FLICKER_PERIOD_SEC: u32 = 16; // seconds between off windows
pub const FLICKER_OFF_FRAMES: u32 = 1; // frames the light stays out per burst

// Pursuit machine / stalker
pub const CHASE_MIN_DISTANCE: f32 = 5.0;
pub const CHASE_MAX_DISTANCE: f32 = 12.0;
pub const RETARGET_SPREAD: f32 = 12.0; // new target within camera +- this, per axis
pub const STALKER_BASE_HEIGHT: f32 = 0.1;
pub const STALKER_SCALE: f32 = 2.8;
pub const SCRAMBLE_XZ_JITTER: f32 = 1.0;
pub const SCRAMBLE_Y_JITTER: f32 = 1.0 / 3.0;
pub const SCRAMBLE_TILT_DEG: f32 = 30.0;

// Scene layout
pub const TERRAIN_SCALE: f32 = 8.0;
pub const RELIC_SCALE: f32 = 0.1;
pub const RELIC_SPIN_DEG_PER_SEC: f32 = 125.0;

// Shadow pass
pub const SHADOW_RESOLUTION: u32 = 1024;
pub const SHADOW_NEAR: f32 = 1.0;
pub const SHADOW_FAR: f32 = 25.0;

// Presentation
pub const SHININESS: f32 = 32.0;
pub const BLOOM_BLUR_PASSES: u32 = 10;
pub const EXPOSURE_DEFAULT: f32 = 1.0;
pub const EXPOSURE_STEP: f32 = 0.001; // per frame while Q/E held
