pub mod color;
pub mod config;
pub mod constants;
pub mod engine;
pub mod gesture;
pub mod particles;
pub mod scene;
pub mod shapes;
pub mod state;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use color::*;
pub use config::*;
pub use constants::*;
pub use engine::*;
pub use gesture::*;
pub use particles::*;
pub use scene::*;
pub use shapes::*;
pub use state::*;
