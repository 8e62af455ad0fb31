//! ECS Components module
//!
//! Built-in components that collaborating subsystems (renderer, camera
//! control) read from entities.

pub mod camera;
pub mod mesh_renderer;

pub use camera::{CameraComponent, ProjectionType};
pub use mesh_renderer::MeshRendererComponent;
