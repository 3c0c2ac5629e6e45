pub mod camera;
pub mod constants;
pub mod flicker;
pub mod lights;
pub mod pursuit;
pub mod scene;
pub mod settings;
pub mod shadow;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static SHADOW_WGSL: &str = include_str!("../shaders/shadow.wgsl");
pub static SKY_WGSL: &str = include_str!("../shaders/sky.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use camera::*;
pub use constants::*;
pub use flicker::*;
pub use lights::*;
pub use pursuit::*;
pub use scene::*;
pub use settings::*;
pub use shadow::*;
