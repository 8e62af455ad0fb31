//! ECS error types

use super::EntityId;
use thiserror::Error;

/// Errors raised by entity, component and system operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component of this type is already attached to the entity
    #[error("entity {entity} already has a {component} component")]
    DuplicateComponent {
        /// Entity the add was attempted on
        entity: EntityId,
        /// Component type name
        component: &'static str,
    },

    /// The entity has no component of the requested type
    #[error("entity {entity} has no {component} component")]
    ComponentNotFound {
        /// Entity that was queried
        entity: EntityId,
        /// Component type name
        component: &'static str,
    },

    /// The handle does not name a live entity
    #[error("entity {0} does not exist")]
    EntityNotFound(EntityId),

    /// A system's `initialize` reported failure; the instance was discarded
    #[error("system {system} failed to initialize: {reason}")]
    SystemInitFailed {
        /// System name
        system: String,
        /// Reason reported by the system
        reason: String,
    },

    /// No system of the requested type is registered
    #[error("system {0} is not registered")]
    SystemNotFound(&'static str),

    /// Re-parenting would make an entity its own ancestor
    #[error("parenting {child} under {parent} would create a cycle")]
    ParentCycle {
        /// Entity being re-parented
        child: EntityId,
        /// Requested parent
        parent: EntityId,
    },
}

/// Result alias for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;
