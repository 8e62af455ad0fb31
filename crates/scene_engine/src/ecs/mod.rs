//! Entity-Component-System implementation
//!
//! Entities own a transform and a table of components keyed by type.
//! Systems keep an explicit membership list of entity handles and run in
//! registration order once per frame.

pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod registry;
pub mod system;
pub mod transform;
pub mod world;

pub use component::{Component, ComponentSet, ComponentTable, ComponentType};
pub use entity::{Entity, EntityId};
pub use error::{EcsError, EcsResult};
pub use registry::EntityRegistry;
pub use system::{AsAny, RegistrationMode, System, SystemBase, SystemRegistry};
pub use transform::Transform;
pub use world::World;
