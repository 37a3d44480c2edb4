pub mod camera;
pub mod config;
pub mod input;
pub mod light;
pub mod logger;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod state;

pub use camera::Camera;
pub use config::ViewerConfig;
pub use input::Action;
pub use input::InputEvent;
pub use input::TransformMode;
pub use light::LightMode;
pub use light::LightState;
pub use light::LightUniforms;
pub use logger::init_logging;
pub use math::Mat4;
pub use mesh::Model;
pub use mesh::PhongMaterial;
pub use mesh::RawMesh;
pub use mesh::Shape;
pub use projection::ProjectionSettings;
pub use state::FrameUniforms;
pub use state::ViewerState;
