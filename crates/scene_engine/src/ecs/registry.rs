//! Entity registry: ownership, ID allocation and recycling

use std::collections::VecDeque;

use super::{EcsError, EcsResult, Entity, EntityId};
use crate::foundation::math::Mat4;

/// One numeric ID's storage; `generation` survives destruction
#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Owns every entity of a scene and hands out their IDs.
///
/// Freed IDs go into a FIFO queue and are reused before `next_id` grows, so
/// the first ID released is the first one handed out again. An ID whose
/// generation reaches `u32::MAX` is retired instead of wrapping.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    free_ids: VecDeque<u32>,
    next_id: u32,
    alive: usize,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity, recycling the oldest freed ID if there is one
    pub fn create_entity(&mut self) -> &mut Entity {
        let id = match self.free_ids.pop_front() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.slots.push(Slot {
                    generation: 0,
                    entity: None,
                });
                id
            }
        };

        let slot = &mut self.slots[id as usize];
        slot.generation += 1;
        let handle = EntityId::new(id, slot.generation);
        log::trace!("Created entity {handle}");

        self.alive += 1;
        slot.entity.insert(Entity::new(handle))
    }

    /// Destroy an entity, dropping its components and freeing its ID.
    ///
    /// Stale handles are reported as [`EcsError::EntityNotFound`].
    pub fn destroy_entity(&mut self, handle: EntityId) -> EcsResult<()> {
        let slot = self
            .slots
            .get_mut(handle.id() as usize)
            .filter(|slot| slot.generation == handle.generation() && slot.entity.is_some())
            .ok_or(EcsError::EntityNotFound(handle))?;

        slot.entity = None;
        if slot.generation == u32::MAX {
            log::warn!("Entity ID {} exhausted its generations; retiring it", handle.id());
        } else {
            self.free_ids.push_back(handle.id());
        }
        self.alive -= 1;
        log::trace!("Destroyed entity {handle}");
        Ok(())
    }

    /// Live entity currently holding numeric ID `id`
    pub fn get_entity(&self, id: u32) -> Option<&Entity> {
        self.slots.get(id as usize)?.entity.as_ref()
    }

    /// Mutable access to the live entity holding numeric ID `id`
    pub fn get_entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.slots.get_mut(id as usize)?.entity.as_mut()
    }

    /// Entity for `handle`, `None` if it has been destroyed
    pub fn get(&self, handle: EntityId) -> Option<&Entity> {
        self.get_entity(handle.id())
            .filter(|entity| entity.handle() == handle)
    }

    /// Mutable entity for `handle`, `None` if it has been destroyed
    pub fn get_mut(&mut self, handle: EntityId) -> Option<&mut Entity> {
        self.get_entity_mut(handle.id())
            .filter(|entity| entity.handle() == handle)
    }

    /// Whether `handle` names a live entity
    pub fn contains(&self, handle: EntityId) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live entities
    pub const fn len(&self) -> usize {
        self.alive
    }

    /// Whether there are no live entities
    pub const fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Live entities in ascending ID order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter_map(|slot| slot.entity.as_ref())
    }

    /// Live entities in ascending ID order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut().filter_map(|slot| slot.entity.as_mut())
    }

    /// Per-frame bookkeeping.
    ///
    /// The registry owns no per-frame state today; activation flags are read
    /// by systems, never changed here.
    pub fn update(&mut self, delta_time: f32) {
        log::trace!("Entity registry update: {} live, dt={delta_time}", self.alive);
    }

    /// Destroy every entity. Generations are kept so old handles stay stale;
    /// freed IDs are queued in ascending order.
    pub fn clear(&mut self) {
        self.free_ids.clear();
        for (id, slot) in (0u32..).zip(self.slots.iter_mut()) {
            slot.entity = None;
            if slot.generation < u32::MAX {
                self.free_ids.push_back(id);
            }
        }
        self.alive = 0;
    }

    /// Set or clear `child`'s parent.
    ///
    /// Rejects parents that are not alive and links that would make `child`
    /// its own ancestor. Only `child` is marked dirty.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> EcsResult<()> {
        if !self.contains(child) {
            return Err(EcsError::EntityNotFound(child));
        }

        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(EcsError::EntityNotFound(parent));
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(EcsError::ParentCycle { child, parent });
            }
        }

        if let Some(entity) = self.get_mut(child) {
            entity.transform_mut().set_parent(parent);
        }
        Ok(())
    }

    /// Whether `ancestor` is `node` or one of its live ancestors
    fn is_ancestor_or_self(&self, ancestor: EntityId, node: EntityId) -> bool {
        let mut current = Some(node);
        let mut steps = 0;
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            // A pre-existing loop built through `transform_mut` must not hang us.
            steps += 1;
            if steps > self.alive {
                return true;
            }
            current = self.get(handle).and_then(|e| e.transform().parent());
        }
        false
    }

    /// Live children of `parent`, in ascending ID order
    pub fn children(&self, parent: EntityId) -> Vec<EntityId> {
        self.iter()
            .filter(|entity| entity.transform().parent() == Some(parent))
            .map(Entity::handle)
            .collect()
    }

    /// World matrix of `handle`, resolving parents through this registry.
    ///
    /// Uses each transform's cache; a child whose own flags are clean keeps
    /// its cached matrix even if an ancestor moved. A parent that no longer
    /// exists is treated as no parent.
    pub fn world_matrix(&self, handle: EntityId) -> Option<Mat4> {
        self.world_matrix_at_depth(handle, 0)
    }

    fn world_matrix_at_depth(&self, handle: EntityId, depth: usize) -> Option<Mat4> {
        if depth > self.alive {
            log::warn!("Parent chain of {handle} loops; treating it as a root");
            return None;
        }

        let entity = self.get(handle)?;
        Some(entity.transform().world_matrix_with(|parent| {
            let world = self.world_matrix_at_depth(parent, depth + 1);
            if world.is_none() {
                log::debug!("Parent {parent} of {handle} is gone; using local matrix");
            }
            world
        }))
    }

    /// Mark the world matrix of every descendant of `root` dirty.
    ///
    /// Never called implicitly; use it after moving a parent when children
    /// must observe the move. Returns the number of descendants touched.
    pub fn invalidate_hierarchy(&self, root: EntityId) -> usize {
        let mut pending = vec![root];
        let mut touched = 0;

        while let Some(parent) = pending.pop() {
            for entity in self.iter() {
                if entity.transform().parent() == Some(parent) && entity.handle() != root {
                    entity.transform().invalidate_world();
                    pending.push(entity.handle());
                    touched += 1;
                }
            }
            if touched > self.alive {
                break;
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_create_and_lookup() {
        let mut registry = EntityRegistry::new();
        let a = registry.create_entity().handle();
        let b = registry.create_entity().handle();

        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_entity(a.id()).map(Entity::handle), Some(a));
        assert_eq!(registry.get(b).map(Entity::handle), Some(b));
    }

    #[test]
    fn test_destroy_invalidates_handle() {
        let mut registry = EntityRegistry::new();
        let a = registry.create_entity().handle();

        registry.destroy_entity(a).unwrap();
        assert!(registry.get(a).is_none());
        assert!(registry.get_entity(a.id()).is_none());
        assert!(registry.is_empty());
        assert_eq!(registry.destroy_entity(a), Err(EcsError::EntityNotFound(a)));
    }

    #[test]
    fn test_recycled_id_is_not_conflated() {
        let mut registry = EntityRegistry::new();
        let old = registry.create_entity().handle();
        registry.destroy_entity(old).unwrap();

        let new = registry.create_entity().handle();
        assert_eq!(new.id(), old.id());
        assert_ne!(new, old);
        assert!(registry.get(old).is_none());
        assert_eq!(registry.get_entity(old.id()).map(Entity::handle), Some(new));
    }

    #[test]
    fn test_free_ids_are_reused_in_fifo_order() {
        let mut registry = EntityRegistry::new();
        let handles: Vec<_> = (0..5).map(|_| registry.create_entity().handle()).collect();

        registry.destroy_entity(handles[3]).unwrap();
        registry.destroy_entity(handles[1]).unwrap();

        assert_eq!(registry.create_entity().id(), 3);
        assert_eq!(registry.create_entity().id(), 1);
        assert_eq!(registry.create_entity().id(), 5);
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let mut registry = EntityRegistry::new();
        for _ in 0..4 {
            registry.create_entity();
        }
        registry.destroy_entity(EntityId::new(2, 1)).unwrap();

        let ids: Vec<_> = registry.iter().map(Entity::id).collect();
        assert_eq!(ids, vec![0, 1, 3]);
    }

    #[test]
    fn test_world_matrix_composes_parent() {
        let mut registry = EntityRegistry::new();
        let parent = registry.create_entity().handle();
        let child = registry.create_entity().handle();

        registry
            .get_mut(parent)
            .unwrap()
            .transform_mut()
            .set_position_xyz(10.0, 0.0, 0.0);
        registry
            .get_mut(child)
            .unwrap()
            .transform_mut()
            .set_position_xyz(0.0, 1.0, 0.0);
        registry.set_parent(child, Some(parent)).unwrap();

        let world = registry.world_matrix(child).unwrap();
        assert_relative_eq!(world.translation_part(), Vec3::new(10.0, 1.0, 0.0));
        assert_eq!(registry.children(parent), vec![child]);
    }

    #[test]
    fn test_child_keeps_stale_world_matrix_after_parent_moves() {
        let mut registry = EntityRegistry::new();
        let parent = registry.create_entity().handle();
        let child = registry.create_entity().handle();
        registry
            .get_mut(parent)
            .unwrap()
            .transform_mut()
            .set_position_xyz(1.0, 2.0, 3.0);
        registry.set_parent(child, Some(parent)).unwrap();

        let before = registry.world_matrix(child).unwrap();

        registry
            .get_mut(parent)
            .unwrap()
            .transform_mut()
            .set_position_xyz(50.0, 0.0, 0.0);
        let after = registry.world_matrix(child).unwrap();

        assert_eq!(after, before);
        assert_eq!(
            registry.world_matrix(parent).unwrap().translation_part(),
            Vec3::new(50.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_invalidate_hierarchy_refreshes_descendants() {
        let mut registry = EntityRegistry::new();
        let root = registry.create_entity().handle();
        let middle = registry.create_entity().handle();
        let leaf = registry.create_entity().handle();
        registry.set_parent(middle, Some(root)).unwrap();
        registry.set_parent(leaf, Some(middle)).unwrap();
        registry.world_matrix(leaf).unwrap();

        registry
            .get_mut(root)
            .unwrap()
            .transform_mut()
            .set_position_xyz(0.0, 0.0, 7.0);
        assert_eq!(registry.invalidate_hierarchy(root), 2);

        let world = registry.world_matrix(leaf).unwrap();
        assert_relative_eq!(world.translation_part(), Vec3::new(0.0, 0.0, 7.0));
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut registry = EntityRegistry::new();
        let a = registry.create_entity().handle();
        let b = registry.create_entity().handle();
        registry.set_parent(b, Some(a)).unwrap();

        assert_eq!(
            registry.set_parent(a, Some(b)),
            Err(EcsError::ParentCycle { child: a, parent: b })
        );
        assert!(matches!(
            registry.set_parent(a, Some(a)),
            Err(EcsError::ParentCycle { .. })
        ));
    }

    #[test]
    fn test_destroyed_parent_is_treated_as_root() {
        let mut registry = EntityRegistry::new();
        let parent = registry.create_entity().handle();
        let child = registry.create_entity().handle();
        registry
            .get_mut(child)
            .unwrap()
            .transform_mut()
            .set_position_xyz(1.0, 0.0, 0.0);
        registry.set_parent(child, Some(parent)).unwrap();
        registry.destroy_entity(parent).unwrap();

        let world = registry.world_matrix(child).unwrap();
        assert_relative_eq!(world.translation_part(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_exhausted_generation_retires_id() {
        let mut registry = EntityRegistry::new();
        let first = registry.create_entity().handle();
        registry.destroy_entity(first).unwrap();

        registry.slots[first.id() as usize].generation = u32::MAX - 1;
        let last = registry.create_entity().handle();
        assert_eq!(last.id(), first.id());
        assert_eq!(last.generation(), u32::MAX);

        registry.destroy_entity(last).unwrap();
        let fresh = registry.create_entity().handle();
        assert_ne!(fresh.id(), first.id());
        assert!(registry.get(first).is_none());
        assert!(registry.get(last).is_none());

        registry.clear();
        assert!(!registry.free_ids.contains(&first.id()));
    }
}
