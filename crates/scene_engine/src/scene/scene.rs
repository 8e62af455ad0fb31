//! A named container of entities and systems

use std::collections::HashMap;

use super::SceneError;
use crate::ecs::{EcsError, EcsResult, Entity, EntityId, EntityRegistry, System, SystemRegistry};

/// One level or context: an entity registry, one system per type and a
/// name lookup for entities created with a name.
#[derive(Debug)]
pub struct Scene {
    name: String,
    entities: EntityRegistry,
    systems: SystemRegistry,
    entity_names: HashMap<String, EntityId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        log::debug!("Scene constructed: {name}");
        Self {
            name,
            entities: EntityRegistry::new(),
            systems: SystemRegistry::by_type(),
            entity_names: HashMap::new(),
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Update: registry bookkeeping, then every system in registration order
    pub fn update(&mut self, delta_time: f32) {
        self.entities.update(delta_time);
        self.systems.update(delta_time, &mut self.entities);
    }

    /// Give every system its render hook, in registration order
    pub fn render(&mut self) {
        self.systems.render(&self.entities);
    }

    /// Create an unnamed entity
    pub fn create_entity(&mut self) -> &mut Entity {
        self.entities.create_entity()
    }

    /// Create an entity and index it by `name`.
    ///
    /// Names are not unique; a later entity with the same name takes over
    /// the lookup entry.
    pub fn create_entity_named(&mut self, name: impl Into<String>) -> &mut Entity {
        let name = name.into();
        let entity = self.entities.create_entity();
        entity.set_name(name.clone());
        if let Some(previous) = self.entity_names.insert(name, entity.handle()) {
            log::debug!("Entity name {:?} now refers to {} (was {previous})", entity.name(), entity.handle());
        }
        entity
    }

    /// Destroy an entity, dropping its name entry if it owns one.
    ///
    /// System membership lists are left alone; stale members are skipped
    /// during updates.
    pub fn destroy_entity(&mut self, entity: EntityId) -> EcsResult<()> {
        if !self.entities.contains(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }

        // Keys are the name at creation time; the entity may have been renamed since
        self.entity_names.retain(|_, handle| *handle != entity);
        self.entities.destroy_entity(entity)
    }

    /// Live entity with numeric ID `id`
    pub fn get_entity(&self, id: u32) -> Option<&Entity> {
        self.entities.get_entity(id)
    }

    /// Live entity with numeric ID `id`, mutably
    pub fn get_entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.get_entity_mut(id)
    }

    /// Entity registered under `name`
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        let handle = *self.entity_names.get(name)?;
        self.entities.get(handle)
    }

    /// Entity registered under `name`, mutably
    pub fn entity_by_name_mut(&mut self, name: &str) -> Option<&mut Entity> {
        let handle = *self.entity_names.get(name)?;
        self.entities.get_mut(handle)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The scene's entity registry
    pub const fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// The scene's entity registry, mutably
    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    /// Initialize and register a system; a second `T` replaces the first
    pub fn add_system<T: System>(&mut self, system: T) -> EcsResult<&mut T> {
        self.systems.add_system(system)
    }

    /// The registered `T`, if any
    pub fn get_system<T: System>(&self) -> Option<&T> {
        self.systems.get()
    }

    /// The registered `T`, mutably
    pub fn get_system_mut<T: System>(&mut self) -> Option<&mut T> {
        self.systems.get_mut()
    }

    /// Shut down and drop the registered `T`
    pub fn remove_system<T: System>(&mut self) -> bool {
        self.systems.remove::<T>()
    }

    /// Names of registered systems in run order
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.names()
    }

    /// Add `entity` to `T`'s membership if it has `T`'s required components.
    ///
    /// Returns `Ok(false)` when the entity lacks a required component or is
    /// already a member.
    pub fn enroll<T: System>(&mut self, entity: EntityId) -> Result<bool, SceneError> {
        let target = self
            .entities
            .get(entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        let system = self
            .systems
            .get_mut::<T>()
            .ok_or(EcsError::SystemNotFound(std::any::type_name::<T>()))?;

        if !system.has_required_components(target) {
            log::debug!("{} lacks components required by {}", entity, system.name());
            return Ok(false);
        }
        Ok(system.add_entity(entity))
    }

    /// Shut systems down in reverse order and drop every entity
    pub fn shutdown(&mut self) {
        self.systems.shutdown();
        self.entities.clear();
        self.entity_names.clear();
    }
}
