//! # Join Engine — Presence Queries Across Stores
//!
//! The engine's only query mechanism: enumerate entity IDs that satisfy a
//! presence predicate across component stores. [`inner_join`] is an AND
//! filter (every store must contain the ID); [`outer_join`] is the
//! deduplicated union. Neither inspects component values — a system that
//! needs the data follows up with [`ComponentStore::get`] or the iterators.
//!
//! Joins borrow the stores shared, so nothing can be mutated while a join is
//! walking them. A system that wants to mutate matching entities collects the
//! IDs first (the join action pushing into a `Vec`, or
//! [`ComponentStore::entities`]) and then acts on the snapshot.

use std::collections::HashSet;

use super::entity::Entity;
use super::store::{Component, ComponentStore};

/// A store viewed purely as an ordered set of entity IDs.
///
/// Implemented by every [`ComponentStore`]; object-safe so joins can take any
/// mix of component types.
pub trait Joined {
    fn contains(&self, entity: Entity) -> bool;
    /// Visit member IDs in insertion order.
    fn for_each_entity(&self, action: &mut dyn FnMut(Entity));
}

impl<T> Joined for ComponentStore<T>
where
    T: Component,
{
    fn contains(&self, entity: Entity) -> bool {
        ComponentStore::contains(self, entity)
    }

    fn for_each_entity(&self, action: &mut dyn FnMut(Entity)) {
        for (entity, _) in self.iter() {
            action(entity);
        }
    }
}

/// Invoke `action` for every entity present in `primary` **and** in every
/// store in `others`, in `primary`'s insertion order.
pub fn inner_join(mut action: impl FnMut(Entity), primary: &dyn Joined, others: &[&dyn Joined]) {
    primary.for_each_entity(&mut |entity| {
        if others.iter().all(|store| store.contains(entity)) {
            action(entity);
        }
    });
}

/// Invoke `action` exactly once for every entity present in any of `stores`:
/// IDs from earlier stores first, then IDs of later stores not yet seen, each
/// in its store's insertion order.
pub fn outer_join(mut action: impl FnMut(Entity), stores: &[&dyn Joined]) {
    let mut seen = HashSet::new();
    for store in stores {
        store.for_each_entity(&mut |entity| {
            if seen.insert(entity) {
                action(entity);
            }
        });
    }
}
