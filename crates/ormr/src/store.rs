//! # Component Stores — One Typed Table Per Component Type
//!
//! Each registered component type gets its own [`ComponentStore<T>`]: a map
//! from [`Entity`] to a value of that type. Values are opaque to the engine —
//! joins and lifecycle operations key only on entity presence.
//!
//! ## Design: Insertion Order Survives Removal
//!
//! Join traversal is defined in terms of the primary store's insertion order,
//! so the store must keep that order stable across interior removals. A plain
//! `HashMap` doesn't order at all; a dense vector with swap-removal reorders.
//! Instead we keep an append-only slot vector with tombstones plus an
//! entity → slot index, and compact once tombstones outnumber live entries.
//! Iteration skips tombstones, so it stays amortized linear in live entries.
//!
//! ## Teardown
//!
//! A store may carry a teardown hook, supplied at registration time, which
//! runs just before a value of this type is deleted — whether the component
//! is removed from a live entity or the whole entity is despawned. Replacing
//! a value via insert is not a deletion and does not fire the hook.

use std::any::Any;
use std::collections::HashMap;

use super::entity::Entity;

/// Marker for types that can be attached to entities as components.
///
/// Blanket-implemented: any `'static + Send + Sync` type qualifies.
pub trait Component: Any + Send + Sync {}

impl<T> Component for T where T: Any + Send + Sync {}

/// Hook invoked just before a component value is deleted.
pub type Teardown<T> = Box<dyn Fn(Entity, &T) + Send + Sync>;

/// Storage for all components of a single type.
///
/// Keys are unique per entity; iteration order is insertion order.
pub struct ComponentStore<T>
where
    T: Component,
{
    /// Append-only slots; `None` marks a removed entry (tombstone).
    slots: Vec<Option<(Entity, T)>>,
    /// Entity → slot position.
    index: HashMap<Entity, usize>,
    /// Number of tombstones currently in `slots`.
    tombstones: usize,
    teardown: Option<Teardown<T>>,
}

/// Don't bother compacting tiny stores.
const COMPACT_MIN_SLOTS: usize = 16;

impl<T> ComponentStore<T>
where
    T: Component,
{
    pub(crate) fn new(teardown: Option<Teardown<T>>) -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            tombstones: 0,
            teardown,
        }
    }

    /// Attach a value to the entity, replacing any existing one in place
    /// (the entity keeps its original insertion position).
    ///
    /// Returns the previously attached value, if any.
    pub(crate) fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(&slot) = self.index.get(&entity) {
            let (_, old) = self.slots[slot].replace((entity, value))?;
            return Some(old);
        }
        self.slots.push(Some((entity, value)));
        self.index.insert(entity, self.slots.len() - 1);
        None
    }

    /// Detach and return the entity's value, running the teardown hook just
    /// before deletion. `None` if the entity has no value here.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.index.remove(&entity)?;
        if let (Some(hook), Some((_, value))) = (&self.teardown, &self.slots[slot]) {
            hook(entity, value);
        }
        let (_, value) = self.slots[slot].take()?;
        self.tombstones += 1;
        self.maybe_compact();
        Some(value)
    }

    /// Returns `true` if the entity has a value in this store.
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let slot = *self.index.get(&entity)?;
        self.slots[slot].as_ref().map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.index.get(&entity)?;
        self.slots[slot].as_mut().map(|(_, value)| value)
    }

    /// Number of entities with a value in this store.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate `(entity, &value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(entity, value)| (*entity, value)))
    }

    /// Iterate `(entity, &mut value)` pairs in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.as_mut().map(|(entity, value)| (*entity, value)))
    }

    /// Snapshot of the member entities, in insertion order.
    ///
    /// Collected eagerly so callers can mutate the store (or the world)
    /// while walking the result.
    pub fn entities(&self) -> Vec<Entity> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(entity, _)| *entity))
            .collect()
    }

    /// Drop tombstones once they outnumber live entries, preserving order.
    fn maybe_compact(&mut self) {
        if self.slots.len() < COMPACT_MIN_SLOTS || self.tombstones * 2 <= self.slots.len() {
            return;
        }
        self.slots.retain(Option::is_some);
        self.tombstones = 0;
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some((entity, _)) = entry {
                self.index.insert(*entity, slot);
            }
        }
    }
}

/// Object-safe view of a [`ComponentStore`], so the `World` can own a
/// heterogeneous map of stores keyed by `TypeId` and clear an entity out of
/// every store in its signature without knowing the concrete types.
pub(crate) trait AnyStore {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Delete the entity's value, running the teardown hook. No-op if absent.
    fn discard(&mut self, entity: Entity);
    #[cfg(test)]
    fn contains(&self, entity: Entity) -> bool;
}

impl<T> AnyStore for ComponentStore<T>
where
    T: Component,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn discard(&mut self, entity: Entity) {
        self.remove(entity);
    }

    #[cfg(test)]
    fn contains(&self, entity: Entity) -> bool {
        ComponentStore::contains(self, entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn store() -> ComponentStore<u32> {
        ComponentStore::new(None)
    }

    #[test]
    fn insert_get_remove() {
        let mut s = store();
        assert!(s.insert(Entity(1), 10).is_none());
        assert_eq!(s.get(Entity(1)), Some(&10));
        assert_eq!(s.remove(Entity(1)), Some(10));
        assert!(s.get(Entity(1)).is_none());
        assert!(s.remove(Entity(1)).is_none());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut s = store();
        s.insert(Entity(1), 10);
        s.insert(Entity(2), 20);
        assert_eq!(s.insert(Entity(1), 11), Some(10));

        // Entity 1 keeps its original position.
        let order: Vec<_> = s.iter().collect();
        assert_eq!(order, vec![(Entity(1), &11), (Entity(2), &20)]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn iteration_order_survives_removal() {
        let mut s = store();
        for id in 0..5 {
            s.insert(Entity(id), id as u32);
        }
        s.remove(Entity(2));

        let order: Vec<_> = s.iter().map(|(e, _)| e.id()).collect();
        assert_eq!(order, vec![0, 1, 3, 4]);
    }

    #[test]
    fn compaction_preserves_order() {
        let mut s = store();
        for id in 0..32 {
            s.insert(Entity(id), id as u32);
        }
        // Remove enough to trigger compaction.
        for id in 0..24 {
            s.remove(Entity(id));
        }
        assert_eq!(s.len(), 8);
        let order: Vec<_> = s.iter().map(|(e, _)| e.id()).collect();
        assert_eq!(order, vec![24, 25, 26, 27, 28, 29, 30, 31]);

        // Lookups still resolve after reindexing.
        assert_eq!(s.get(Entity(30)), Some(&30));
        s.insert(Entity(100), 100);
        let order: Vec<_> = s.iter().map(|(e, _)| e.id()).collect();
        assert_eq!(order.last(), Some(&100));
    }

    #[test]
    fn teardown_fires_once_before_deletion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut s: ComponentStore<u32> = ComponentStore::new(Some(Box::new(
            move |entity, value| {
                assert_eq!(entity, Entity(1));
                assert_eq!(*value, 42);
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )));

        s.insert(Entity(1), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Replacement is not a deletion.
        s.insert(Entity(1), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(s.remove(Entity(1)), Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Removing again does nothing.
        s.remove(Entity(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn entities_snapshot_in_order() {
        let mut s = store();
        s.insert(Entity(3), 3);
        s.insert(Entity(1), 1);
        s.insert(Entity(2), 2);
        assert_eq!(s.entities(), vec![Entity(3), Entity(1), Entity(2)]);
    }
}
