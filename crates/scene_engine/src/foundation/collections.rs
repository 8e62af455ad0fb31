//! Specialized collection types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub use slotmap::{new_key_type, SlotMap};

/// Typed handle for resources owned by an external manager.
///
/// The core never dereferences these; it only stores them on entities so
/// renderer-side systems can look the resource up again.
pub struct ResourceHandle<T> {
    id: u64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> ResourceHandle<T> {
    /// Create a new typed handle from a raw id
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying id
    pub const fn id(&self) -> u64 {
        self.id
    }
}

// Manual impls so `T` itself doesn't need to be Clone/Eq/Hash.
impl<T> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResourceHandle<T> {}

impl<T> PartialEq for ResourceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ResourceHandle<T> {}

impl<T> Hash for ResourceHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHandle<{}>({})", std::any::type_name::<T>(), self.id)
    }
}

/// Marker for mesh resources
#[derive(Debug)]
pub enum Mesh {}

/// Marker for material resources
#[derive(Debug)]
pub enum Material {}

/// Marker for texture resources
#[derive(Debug)]
pub enum Texture {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_handles_compare_by_id() {
        let a = ResourceHandle::<Mesh>::new(3);
        let b = ResourceHandle::<Mesh>::new(3);
        let c = ResourceHandle::<Mesh>::new(4);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
