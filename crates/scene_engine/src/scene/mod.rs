//! Scene management system
//!
//! ## Architecture
//!
//! ```text
//! SceneManager ──owns──> Scene ──owns──> EntityRegistry
//!      │                   └───owns──> SystemRegistry (one per type)
//!      └── active: Option<SceneId>
//! ```
//!
//! Only the active scene is updated and rendered each frame.

#[allow(clippy::module_inception)]
mod scene;
mod scene_manager;

pub use scene::Scene;
pub use scene_manager::{SceneId, SceneManager};

use crate::ecs::EcsError;
use thiserror::Error;

/// Scene-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No scene with this name exists
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// The id does not belong to this manager (or was destroyed)
    #[error("scene {0:?} is not owned by this scene manager")]
    UnknownScene(SceneId),

    /// Error from the scene's ECS
    #[error(transparent)]
    Ecs(#[from] EcsError),
}
