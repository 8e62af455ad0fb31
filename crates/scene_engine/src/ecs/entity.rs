//! Entity implementation

use std::fmt;
use std::num::NonZeroU32;

use super::{Component, ComponentTable, ComponentType, EcsResult, Transform};

/// Generation-checked entity handle.
///
/// `id` is the numeric entity ID, unique only among live entities and
/// recycled after destruction. `generation` distinguishes successive
/// entities that reuse the same ID, so a handle to a destroyed entity never
/// resolves to its replacement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    id: u32,
    generation: NonZeroU32,
}

impl EntityId {
    /// Create a handle; a zero generation is bumped to 1
    pub fn new(id: u32, generation: u32) -> Self {
        Self {
            id,
            generation: NonZeroU32::new(generation).unwrap_or(NonZeroU32::MIN),
        }
    }

    /// Numeric entity ID
    #[inline]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Generation of the ID slot this handle was issued for
    #[inline]
    pub const fn generation(&self) -> u32 {
        self.generation.get()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.id, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.id, self.generation)
    }
}

/// An identity with a name, an active flag, a transform and components.
///
/// Entities are owned by an [`EntityRegistry`](super::EntityRegistry);
/// hold an [`EntityId`] rather than a reference across frames.
#[derive(Debug)]
pub struct Entity {
    handle: EntityId,
    name: String,
    active: bool,
    transform: Transform,
    components: ComponentTable,
}

impl Entity {
    pub(super) fn new(handle: EntityId) -> Self {
        Self {
            handle,
            name: String::new(),
            active: true,
            transform: Transform::default(),
            components: ComponentTable::new(handle),
        }
    }

    /// Numeric ID (recycled after destruction)
    pub const fn id(&self) -> u32 {
        self.handle.id()
    }

    /// Generation-checked handle for this entity
    pub const fn handle(&self) -> EntityId {
        self.handle
    }

    /// Display name, empty unless set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name.
    ///
    /// Scenes index names at creation time only; renaming afterwards does
    /// not update a scene's name lookup.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether systems should process this entity
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable processing by systems
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The embedded transform
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the embedded transform.
    ///
    /// Prefer [`EntityRegistry::set_parent`](super::EntityRegistry::set_parent)
    /// for parenting so cycles are rejected.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Attach a component; fails if one of type `T` is already attached
    pub fn add_component<T: Component>(&mut self, component: T) -> EcsResult<&mut T> {
        self.components.add(component)
    }

    /// The `T` component; fails if absent
    pub fn component<T: Component>(&self) -> EcsResult<&T> {
        self.components.get()
    }

    /// The `T` component, mutably; fails if absent
    pub fn component_mut<T: Component>(&mut self) -> EcsResult<&mut T> {
        self.components.get_mut()
    }

    /// Whether a `T` component is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.components.contains::<T>()
    }

    /// Remove the `T` component; `false` if absent.
    ///
    /// Systems whose membership includes this entity are not notified.
    pub fn remove_component<T: Component>(&mut self) -> bool {
        self.components.remove::<T>()
    }

    /// Runtime types of the attached components
    pub fn component_types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.types()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// The component table
    pub const fn components(&self) -> &ComponentTable {
        &self.components
    }
}
