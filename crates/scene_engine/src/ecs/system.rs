//! System trait, shared system state and the system registry

use std::any::{type_name, Any, TypeId};

use super::{Component, ComponentSet, ComponentType, EcsError, EcsResult, Entity, EntityId, EntityRegistry};

/// Downcasting support for boxed systems
pub trait AsAny: Any {
    /// `self` as [`Any`]
    fn as_any(&self) -> &dyn Any;
    /// `self` as mutable [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// State every system carries: name, required components and membership.
///
/// Membership is explicit. Nothing adds an entity when it gains the required
/// components or removes it when it loses them; whoever builds the scene
/// decides, usually by checking [`SystemBase::has_required_components`].
#[derive(Debug, Clone, Default)]
pub struct SystemBase {
    name: String,
    required: ComponentSet,
    entities: Vec<EntityId>,
}

impl SystemBase {
    /// New base with no requirements and no members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: ComponentSet::new(),
            entities: Vec::new(),
        }
    }

    /// Builder: require component `T`
    #[must_use]
    pub fn require<T: Component>(mut self) -> Self {
        self.required.insert(ComponentType::of::<T>());
        self
    }

    /// System name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required component types
    pub const fn required_components(&self) -> &ComponentSet {
        &self.required
    }

    /// Whether `entity` carries every required component
    pub fn has_required_components(&self, entity: &Entity) -> bool {
        self.required
            .iter()
            .all(|component_type| entity.components().contains_type(component_type))
    }

    /// Append to the membership list; `false` if already a member
    pub fn add_entity(&mut self, entity: EntityId) -> bool {
        if self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Remove from the membership list, keeping the order of the rest
    pub fn remove_entity(&mut self, entity: EntityId) -> bool {
        match self.entities.iter().position(|e| *e == entity) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    /// Members in insertion order
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Drop every member
    pub fn clear_entities(&mut self) {
        self.entities.clear();
    }
}

/// Stateful logic run once per frame over a membership list.
///
/// Implementors embed a [`SystemBase`] and usually override
/// [`System::process_entity`]; the default [`System::update`] walks members
/// in insertion order, skipping inactive entities and handles whose entity
/// has been destroyed.
pub trait System: AsAny {
    /// Shared system state
    fn base(&self) -> &SystemBase;

    /// Shared system state, mutably
    fn base_mut(&mut self) -> &mut SystemBase;

    /// Called once on registration; an `Err` discards the system
    fn initialize(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Per-entity logic used by the default `update`
    fn process_entity(&mut self, _entity: &mut Entity, _delta_time: f32) {}

    /// Run one frame over the membership list
    fn update(&mut self, delta_time: f32, entities: &mut EntityRegistry) {
        let members = self.base().entities().to_vec();
        for handle in members {
            match entities.get_mut(handle) {
                Some(entity) if entity.is_active() => self.process_entity(entity, delta_time),
                Some(_) => {}
                None => log::trace!("{}: skipping stale member {handle}", self.name()),
            }
        }
    }

    /// Render hook, called after every system has updated
    fn render(&mut self, _entities: &EntityRegistry) {}

    /// Release system-held resources; called once
    fn shutdown(&mut self) {}

    /// System name
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Add `entity` to the membership list
    fn add_entity(&mut self, entity: EntityId) -> bool {
        self.base_mut().add_entity(entity)
    }

    /// Remove `entity` from the membership list
    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.base_mut().remove_entity(entity)
    }

    /// Members in insertion order
    fn entities(&self) -> &[EntityId] {
        self.base().entities()
    }

    /// Whether `entity` carries every required component
    fn has_required_components(&self, entity: &Entity) -> bool {
        self.base().has_required_components(entity)
    }
}

/// How a registry treats a second system of the same type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    /// One instance per type; re-registering replaces the old instance in place
    ByType,
    /// Every registration is appended; lookups return the first match
    Ordered,
}

struct SystemEntry {
    type_id: TypeId,
    type_name: &'static str,
    system: Box<dyn System>,
}

/// Owns systems and runs them in registration order
pub struct SystemRegistry {
    mode: RegistrationMode,
    entries: Vec<SystemEntry>,
}

impl SystemRegistry {
    /// One instance per system type (scene flavour)
    pub const fn by_type() -> Self {
        Self::with_mode(RegistrationMode::ByType)
    }

    /// Append-only list (world flavour)
    pub const fn ordered() -> Self {
        Self::with_mode(RegistrationMode::Ordered)
    }

    /// Registry with an explicit mode
    pub const fn with_mode(mode: RegistrationMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    /// Registration mode
    pub const fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Initialize and store `system`.
    ///
    /// If `initialize` fails the instance is dropped and
    /// [`EcsError::SystemInitFailed`] is returned. In [`RegistrationMode::ByType`]
    /// an existing instance of `T` is shut down and replaced (last
    /// registration wins) and the new one takes its place in the run order.
    pub fn add_system<T: System>(&mut self, mut system: T) -> EcsResult<&mut T> {
        if let Err(reason) = system.initialize() {
            log::error!("Failed to initialize system {}: {reason}", system.name());
            return Err(EcsError::SystemInitFailed {
                system: system.name().to_string(),
                reason,
            });
        }

        let entry = SystemEntry {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            system: Box::new(system),
        };

        let existing = match self.mode {
            RegistrationMode::ByType => self.position_of(entry.type_id),
            RegistrationMode::Ordered => None,
        };

        let index = match existing {
            Some(index) => {
                log::warn!("System {} already registered; replacing it", entry.type_name);
                let mut old = std::mem::replace(&mut self.entries[index], entry);
                old.system.shutdown();
                index
            }
            None => {
                log::debug!("Registered system {}", entry.system.name());
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };

        (*self.entries[index].system)
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(EcsError::SystemNotFound(type_name::<T>()))
    }

    /// First registered system of type `T`
    pub fn get<T: System>(&self) -> Option<&T> {
        let index = self.position_of(TypeId::of::<T>())?;
        (*self.entries[index].system).as_any().downcast_ref::<T>()
    }

    /// First registered system of type `T`, mutably
    pub fn get_mut<T: System>(&mut self) -> Option<&mut T> {
        let index = self.position_of(TypeId::of::<T>())?;
        (*self.entries[index].system).as_any_mut().downcast_mut::<T>()
    }

    /// Whether a `T` is registered
    pub fn contains<T: System>(&self) -> bool {
        self.position_of(TypeId::of::<T>()).is_some()
    }

    /// Shut down and drop the first `T`; `false` if none is registered
    pub fn remove<T: System>(&mut self) -> bool {
        match self.position_of(TypeId::of::<T>()) {
            Some(index) => {
                let mut entry = self.entries.remove(index);
                entry.system.shutdown();
                true
            }
            None => false,
        }
    }

    /// Update every system in registration order
    pub fn update(&mut self, delta_time: f32, entities: &mut EntityRegistry) {
        for entry in &mut self.entries {
            entry.system.update(delta_time, entities);
        }
    }

    /// Render every system in registration order
    pub fn render(&mut self, entities: &EntityRegistry) {
        for entry in &mut self.entries {
            entry.system.render(entities);
        }
    }

    /// Shut systems down in reverse registration order and drop them
    pub fn shutdown(&mut self) {
        while let Some(mut entry) = self.entries.pop() {
            log::debug!("Shutting down system {}", entry.system.name());
            entry.system.shutdown();
        }
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.system.name()).collect()
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no systems are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position_of(&self, type_id: TypeId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.type_id == type_id)
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::by_type()
    }
}

impl Drop for SystemRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemRegistry")
            .field("mode", &self.mode)
            .field("systems", &self.names())
            .finish()
    }
}
