//! Error types for world-mutating operations.

use thiserror::Error;

use super::entity::Entity;

/// Errors that can occur when mutating a [`World`](super::world::World).
///
/// Every public mutating operation validates its preconditions and fails
/// with one of these before touching any store, so an error never leaves a
/// signature inconsistent with store membership.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component type was used before its store was created.
    #[error("component type `{0}` is not registered")]
    ComponentNotRegistered(&'static str),

    /// The operation targeted a dead or unknown entity.
    #[error("entity {0} is not alive")]
    EntityNotFound(Entity),

    /// A component type was registered twice.
    #[error("component type `{0}` is already registered")]
    DuplicateRegistration(&'static str),
}
