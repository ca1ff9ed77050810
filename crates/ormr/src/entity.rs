//! # Entity — Lightweight Identifiers
//!
//! An [`Entity`] is just a number — it doesn't "contain" anything. The
//! [`World`](super::world::World) maps entities to their components; the
//! entity itself only carries an implicit *signature*, the set of component
//! types currently attached to it, tracked by the [`EntityRegistry`].
//!
//! ## Design: Monotonic IDs, Never Reused
//!
//! Many ECS implementations recycle entity slots and pair each index with a
//! generation counter so stale handles can be detected. We take the simpler
//! route: IDs are handed out by a strictly increasing counter and are never
//! reused for the lifetime of a `World`. A despawned ID simply stops
//! resolving — any lookup goes through the registry, so a stale handle fails
//! safely without generational bookkeeping. A `u64` does not run out at any
//! realistic spawn rate.
//!
//! The allocator is an explicit value owned by the `World`, not a hidden
//! global, so two worlds never interfere and tests can seed the counter.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A lightweight handle to an entity in the [`World`](super::world::World).
///
/// Entities are created via [`World::spawn`](super::world::World::spawn) and
/// destroyed via [`World::despawn`](super::world::World::despawn). A handle
/// is only meaningful for the `World` that created it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub(crate) u64);

impl Entity {
    /// Returns the raw ID. Useful for diagnostics, not for general use.
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Hands out strictly increasing entity IDs.
///
/// One allocator per [`World`](super::world::World); IDs are never reused.
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Start counting from `seed` instead of 0.
    pub fn starting_at(seed: u64) -> Self {
        Self { next: seed }
    }

    /// Allocate the next [`Entity`]. Strictly increasing.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next;
        self.next += 1;
        Entity(id)
    }
}

/// The set of component types currently attached to an entity.
pub type Signature = HashSet<TypeId>;

/// Tracks which entities are alive and which component types each owns.
///
/// Invariant: an entity's recorded signature equals exactly the set of
/// component stores that contain its ID. The `World` maintains this by
/// updating the registry and the stores in the same operation.
#[derive(Default)]
pub(crate) struct EntityRegistry {
    signatures: HashMap<Entity, Signature>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            signatures: HashMap::new(),
        }
    }

    /// Record a freshly allocated entity with its initial signature.
    pub fn insert(&mut self, entity: Entity, signature: Signature) {
        self.signatures.insert(entity, signature);
    }

    /// Drop an entity, returning its signature so the caller can clear the
    /// matching stores. `None` if the entity was not alive.
    pub fn remove(&mut self, entity: Entity) -> Option<Signature> {
        self.signatures.remove(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.signatures.contains_key(&entity)
    }

    pub fn signature(&self, entity: Entity) -> Option<&Signature> {
        self.signatures.get(&entity)
    }

    pub fn signature_mut(&mut self, entity: Entity) -> Option<&mut Signature> {
        self.signatures.get_mut(&entity)
    }

    /// Number of live entities. Always equals the number of live IDs.
    pub fn count(&self) -> usize {
        self.signatures.len()
    }

    /// Iterate over all live entity IDs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.signatures.keys().copied()
    }
}
