//! ECS World: an entity registry plus an ordered system list
//!
//! The scene-independent flavour of the runtime, used for bookkeeping that
//! spans scenes. Unlike a [`Scene`](crate::scene::Scene) it allows several
//! systems of the same type and has no name lookup.

use super::{EcsResult, Entity, EntityId, EntityRegistry, System, SystemRegistry};

/// ECS World containing entities and systems
#[derive(Debug)]
pub struct World {
    entities: EntityRegistry,
    systems: SystemRegistry,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: EntityRegistry::new(),
            systems: SystemRegistry::ordered(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> &mut Entity {
        self.entities.create_entity()
    }

    /// Destroy an entity
    pub fn destroy_entity(&mut self, entity: EntityId) -> EcsResult<()> {
        self.entities.destroy_entity(entity)
    }

    /// Live entity with numeric ID `id`
    pub fn get_entity(&self, id: u32) -> Option<&Entity> {
        self.entities.get_entity(id)
    }

    /// Entity registry
    pub const fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Entity registry, mutably
    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    /// Initialize and append a system
    pub fn add_system<T: System>(&mut self, system: T) -> EcsResult<&mut T> {
        self.systems.add_system(system)
    }

    /// First system of type `T`
    pub fn get_system<T: System>(&self) -> Option<&T> {
        self.systems.get()
    }

    /// First system of type `T`, mutably
    pub fn get_system_mut<T: System>(&mut self) -> Option<&mut T> {
        self.systems.get_mut()
    }

    /// Update the world: registry bookkeeping, then systems in order
    pub fn update(&mut self, delta_time: f32) {
        self.entities.update(delta_time);
        self.systems.update(delta_time, &mut self.entities);
    }

    /// Shut systems down and drop every entity
    pub fn shutdown(&mut self) {
        self.systems.shutdown();
        self.entities.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, SystemBase};

    struct Ticks(u32);
    impl Component for Ticks {}

    struct TickSystem {
        base: SystemBase,
    }

    impl System for TickSystem {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }

        fn process_entity(&mut self, entity: &mut Entity, _delta_time: f32) {
            if let Ok(ticks) = entity.component_mut::<Ticks>() {
                ticks.0 += 1;
            }
        }
    }

    #[test]
    fn test_duplicate_system_types_all_run() {
        let mut world = World::new();
        let entity = world.create_entity();
        entity.add_component(Ticks(0)).unwrap();
        let handle = entity.handle();

        for name in ["a", "b"] {
            world
                .add_system(TickSystem {
                    base: SystemBase::new(name).require::<Ticks>(),
                })
                .unwrap()
                .add_entity(handle);
        }
        world.update(0.1);

        let ticks = world.get_entity(handle.id()).unwrap().component::<Ticks>().unwrap();
        assert_eq!(ticks.0, 2);
        assert_eq!(world.get_system::<TickSystem>().unwrap().name(), "a");
    }

    #[test]
    fn test_shutdown_clears_entities() {
        let mut world = World::new();
        world.create_entity();
        world.shutdown();
        assert!(world.entities().is_empty());
    }
}
