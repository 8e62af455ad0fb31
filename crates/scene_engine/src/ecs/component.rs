//! Component trait and per-entity component storage

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{EcsError, EcsResult, EntityId};

/// Marker trait for components.
///
/// Components are plain data attached to at most one entity per type.
pub trait Component: 'static {}

/// Runtime identity of a component type.
///
/// Wraps [`TypeId`] and keeps the type name around for diagnostics.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    /// Identity of `T`
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Fully qualified type name
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ComponentType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComponentType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Set of component types, used for system requirements
pub type ComponentSet = BTreeSet<ComponentType>;

/// Heterogeneous component storage embedded in an entity.
///
/// Every stored component shares the table's owner, so the back-reference
/// lives here rather than in each component.
pub struct ComponentTable {
    owner: EntityId,
    components: HashMap<ComponentType, Box<dyn Any>>,
}

impl ComponentTable {
    /// Empty table owned by `owner`
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            components: HashMap::new(),
        }
    }

    /// Entity that owns every component in this table
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Attach `component`, failing if a `T` is already present
    pub fn add<T: Component>(&mut self, component: T) -> EcsResult<&mut T> {
        let key = ComponentType::of::<T>();
        if self.components.contains_key(&key) {
            return Err(EcsError::DuplicateComponent {
                entity: self.owner,
                component: key.name(),
            });
        }

        let slot = self.components.entry(key).or_insert_with(|| Box::new(component));
        slot.downcast_mut::<T>().ok_or(EcsError::ComponentNotFound {
            entity: self.owner,
            component: key.name(),
        })
    }

    /// Shared access to the `T` component
    pub fn get<T: Component>(&self) -> EcsResult<&T> {
        self.components
            .get(&ComponentType::of::<T>())
            .and_then(|c| c.downcast_ref::<T>())
            .ok_or_else(|| self.not_found::<T>())
    }

    /// Mutable access to the `T` component
    pub fn get_mut<T: Component>(&mut self) -> EcsResult<&mut T> {
        let err = self.not_found::<T>();
        self.components
            .get_mut(&ComponentType::of::<T>())
            .and_then(|c| c.downcast_mut::<T>())
            .ok_or(err)
    }

    /// Whether a `T` is attached
    pub fn contains<T: Component>(&self) -> bool {
        self.components.contains_key(&ComponentType::of::<T>())
    }

    /// Whether a component of the given runtime type is attached
    pub fn contains_type(&self, component_type: &ComponentType) -> bool {
        self.components.contains_key(component_type)
    }

    /// Drop the `T` component; `false` if there was none
    pub fn remove<T: Component>(&mut self) -> bool {
        self.components.remove(&ComponentType::of::<T>()).is_some()
    }

    /// Types currently attached, in no particular order
    pub fn types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.keys().copied()
    }

    /// Number of attached components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no components are attached
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Drop every component
    pub fn clear(&mut self) {
        self.components.clear();
    }

    fn not_found<T: Component>(&self) -> EcsError {
        EcsError::ComponentNotFound {
            entity: self.owner,
            component: type_name::<T>(),
        }
    }
}

impl fmt::Debug for ComponentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentTable")
            .field("owner", &self.owner)
            .field("types", &self.components.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    #[derive(Debug)]
    struct Tag;
    impl Component for Tag {}

    fn table() -> ComponentTable {
        ComponentTable::new(EntityId::new(7, 1))
    }

    #[test]
    fn test_add_then_get() {
        let mut table = table();
        table.add(Health(10)).unwrap().0 += 5;

        assert_eq!(table.get::<Health>().unwrap(), &Health(15));
        assert!(table.contains::<Health>());
        assert!(!table.contains::<Tag>());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_add_fails_and_keeps_original() {
        let mut table = table();
        table.add(Health(1)).unwrap();

        let err = table.add(Health(2)).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateComponent { .. }));
        assert_eq!(table.get::<Health>().unwrap(), &Health(1));
    }

    #[test]
    fn test_get_missing_reports_owner() {
        let table = table();
        match table.get::<Health>() {
            Err(EcsError::ComponentNotFound { entity, component }) => {
                assert_eq!(entity, EntityId::new(7, 1));
                assert!(component.ends_with("Health"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_remove() {
        let mut table = table();
        table.add(Tag).unwrap();

        assert!(table.remove::<Tag>());
        assert!(!table.remove::<Tag>());
        assert!(table.get::<Tag>().is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_component_type_identity() {
        assert_eq!(ComponentType::of::<Health>(), ComponentType::of::<Health>());
        assert_ne!(ComponentType::of::<Health>(), ComponentType::of::<Tag>());
        assert!(ComponentType::of::<Tag>().name().ends_with("Tag"));
    }
}
