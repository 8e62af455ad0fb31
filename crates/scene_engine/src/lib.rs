//! # Scene Engine
//!
//! Scene-based Entity-Component-System runtime for a game engine.
//!
//! ## Features
//!
//! - **Entity Registry**: FIFO numeric ID recycling with generation-checked handles
//! - **Components**: one instance per concrete type, looked up by runtime type
//! - **Systems**: explicit membership, lifecycle hooks, one system per type per scene
//! - **Scenes**: named scenes with a single active scene updated each frame
//! - **Transforms**: lazily cached local and world matrices with parent links
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut scenes = SceneManager::new();
//! let main = scenes.create_scene("Main");
//! scenes.set_active_scene(main).unwrap();
//!
//! let scene = scenes.active_scene_mut().unwrap();
//! let player = scene.create_entity_named("Player");
//! player.transform_mut().set_position_xyz(0.0, 1.0, 0.0);
//!
//! scenes.update(0.016);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod scene;

mod engine;

pub use engine::{Engine, EngineError, Subsystem};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, EngineConfig},
        ecs::{
            components::{CameraComponent, MeshRendererComponent, ProjectionType},
            Component, EcsError, EcsResult, Entity, EntityId, EntityRegistry, System, SystemBase,
            SystemRegistry, Transform, World,
        },
        foundation::{
            math::{Mat4, Quat, Vec3},
            time::FrameTimer,
        },
        scene::{Scene, SceneError, SceneId, SceneManager},
        Engine, EngineError, Subsystem,
    };
}
