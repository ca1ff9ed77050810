//! # World — The Central Container
//!
//! The [`World`] owns everything: the entity registry (which IDs are alive,
//! and each entity's signature), one [`ComponentStore`] per registered
//! component type, the resource bag, and the ordered system [`Schedule`].
//! It is a single shared mutable structure — any system may read or write
//! any part of it, and registration order is the only sequencing discipline.
//!
//! ## Validation
//!
//! Every mutating operation checks its preconditions up front and fails with
//! an [`EcsError`] before touching any store. In particular, [`World::spawn`]
//! validates the whole bundle before allocating an ID or writing a single
//! value, so a failed spawn leaves no trace and the core invariant — each
//! live entity's signature equals exactly the set of stores containing its
//! ID — holds at every observable point.
//!
//! ## Resources
//!
//! Resources are "global" data not tied to any entity — a spawner config, an
//! RNG, host handles. They're stored type-erased (`Box<dyn Any>`) keyed by
//! `TypeId`; the engine itself never reads or writes any particular one.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::entity::{Entity, EntityRegistry, IdAllocator, Signature};
use super::error::EcsError;
use super::store::{AnyStore, Component, ComponentStore, Teardown};
use super::system::{Schedule, System, Tick};

/// The central container for all engine state.
pub struct World {
    allocator: IdAllocator,
    entities: EntityRegistry,
    /// One store per registered component type.
    stores: HashMap<TypeId, Box<dyn AnyStore>>,
    /// Open bag of collaborator-owned singletons, keyed by `TypeId`.
    resources: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    pub(crate) schedule: Schedule,
}

impl World {
    /// Create an empty world: no component types, no entities, no systems.
    pub fn new() -> Self {
        Self::with_allocator(IdAllocator::new())
    }

    /// Create an empty world whose entity IDs start at `seed`.
    pub fn with_id_seed(seed: u64) -> Self {
        Self::with_allocator(IdAllocator::starting_at(seed))
    }

    fn with_allocator(allocator: IdAllocator) -> Self {
        Self {
            allocator,
            entities: EntityRegistry::new(),
            stores: HashMap::new(),
            resources: HashMap::new(),
            schedule: Schedule::new(),
        }
    }

    // ── Component registration ───────────────────────────────────────

    /// Create an empty store for component type `T`.
    ///
    /// Setup-time operation: every type a bundle mentions must be registered
    /// before any entity can carry it.
    pub fn register_component<T: Component>(&mut self) -> Result<(), EcsError> {
        self.register_store::<T>(None)
    }

    /// Like [`register_component`](World::register_component), with a
    /// teardown hook invoked as `(entity, &value)` just before any value of
    /// this type is deleted — on component removal and on despawn alike.
    pub fn register_component_with_teardown<T, F>(&mut self, teardown: F) -> Result<(), EcsError>
    where
        T: Component,
        F: Fn(Entity, &T) + Send + Sync + 'static,
    {
        self.register_store::<T>(Some(Box::new(teardown)))
    }

    fn register_store<T: Component>(&mut self, teardown: Option<Teardown<T>>) -> Result<(), EcsError> {
        let type_id = TypeId::of::<T>();
        if self.stores.contains_key(&type_id) {
            return Err(EcsError::DuplicateRegistration(std::any::type_name::<T>()));
        }
        log::trace!("component registered: {}", std::any::type_name::<T>());
        self.stores
            .insert(type_id, Box::new(ComponentStore::<T>::new(teardown)));
        Ok(())
    }

    // ── Typed store access ───────────────────────────────────────────

    /// The store for component type `T`, for joins and iteration.
    pub fn store<T: Component>(&self) -> Result<&ComponentStore<T>, EcsError> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref())
            .ok_or(EcsError::ComponentNotRegistered(std::any::type_name::<T>()))
    }

    /// Mutable access to the store for component type `T`.
    pub fn store_mut<T: Component>(&mut self) -> Result<&mut ComponentStore<T>, EcsError> {
        self.stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|store| store.as_any_mut().downcast_mut())
            .ok_or(EcsError::ComponentNotRegistered(std::any::type_name::<T>()))
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Spawn an entity with a bundle of components (a tuple).
    ///
    /// Fails with [`EcsError::ComponentNotRegistered`] — without allocating
    /// an ID or writing anything — if any bundle type has no store.
    ///
    /// # Example
    ///
    /// ```ignore
    /// world.register_component::<Position>()?;
    /// world.register_component::<Velocity>()?;
    /// let e = world.spawn((Position::ZERO, Velocity { dx: 1.0, dy: 0.0 }))?;
    /// ```
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Result<Entity, EcsError> {
        self.ensure_registered(&B::type_ids(), &B::type_names())?;
        let entity = self.allocator.allocate();
        self.entities
            .insert(entity, B::type_ids().into_iter().collect());
        bundle.write(entity, self);
        Ok(entity)
    }

    /// Spawn an entity with no components.
    pub fn spawn_empty(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity, Signature::new());
        entity
    }

    /// Despawn an entity: delete its ID from every store in its signature
    /// (running teardown hooks) and drop the registry entry.
    ///
    /// Fails with [`EcsError::EntityNotFound`] if the entity is not alive —
    /// never a silent no-op.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), EcsError> {
        let signature = self
            .entities
            .remove(entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        for type_id in signature {
            if let Some(store) = self.stores.get_mut(&type_id) {
                store.discard(entity);
            }
        }
        Ok(())
    }

    // ── Component add / remove on live entities ──────────────────────

    /// Attach a bundle of components to a live entity, extending its
    /// signature. Values for types the entity already carries are replaced
    /// in place (no teardown — replacement is not a deletion).
    pub fn insert<B: Bundle>(&mut self, entity: Entity, bundle: B) -> Result<(), EcsError> {
        if !self.entities.contains(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        self.ensure_registered(&B::type_ids(), &B::type_names())?;
        let signature = self
            .entities
            .signature_mut(entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        signature.extend(B::type_ids());
        bundle.write(entity, self);
        Ok(())
    }

    /// Detach component `T` from a live entity, shrinking its signature and
    /// running the teardown hook before deletion.
    ///
    /// Returns `Ok(None)` if the entity did not carry `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<Option<T>, EcsError> {
        if !self.entities.contains(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        let type_id = TypeId::of::<T>();
        if !self.stores.contains_key(&type_id) {
            return Err(EcsError::ComponentNotRegistered(std::any::type_name::<T>()));
        }
        if let Some(signature) = self.entities.signature_mut(entity) {
            signature.remove(&type_id);
        }
        // Unwrap is fine: presence of the key was checked above.
        Ok(self.store_mut::<T>().unwrap().remove(entity))
    }

    // ── Per-entity access ────────────────────────────────────────────

    /// Shared reference to the entity's `T`, or `None` if the entity is dead
    /// or doesn't carry one.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.contains(entity) {
            return None;
        }
        self.store::<T>().ok()?.get(entity)
    }

    /// Mutable reference to the entity's `T`, or `None` if the entity is
    /// dead or doesn't carry one.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.contains(entity) {
            return None;
        }
        self.store_mut::<T>().ok()?.get_mut(entity)
    }

    /// Whether a live entity carries component `T`.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    // ── Registry views ───────────────────────────────────────────────

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// The entity's signature, or `None` if it is not alive.
    pub fn signature(&self, entity: Entity) -> Option<&Signature> {
        self.entities.signature(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    /// Iterate over all live entity IDs, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Insert a resource, replacing any existing resource of the same type.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Shared reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource<T: 'static + Send + Sync>(&self) -> &T {
        self.get_resource().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    /// Mutable reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> &mut T {
        self.get_resource_mut().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    /// Shared reference to a resource, `None` if absent.
    pub fn get_resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources
            .get(&TypeId::of::<T>())
            .and_then(|r| r.downcast_ref::<T>())
    }

    /// Mutable reference to a resource, `None` if absent.
    pub fn get_resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources
            .get_mut(&TypeId::of::<T>())
            .and_then(|r| r.downcast_mut::<T>())
    }

    pub fn has_resource<T: 'static + Send + Sync>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<T>())
    }

    /// Remove a resource, taking ownership. `None` if absent.
    ///
    /// Use this for the extract/reinsert pattern when a system needs to
    /// borrow a resource while also borrowing the world.
    pub fn resource_remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources
            .remove(&TypeId::of::<T>())
            .and_then(|r| r.downcast::<T>().ok())
            .map(|b| *b)
    }

    // ── Systems ──────────────────────────────────────────────────────

    /// Append a system to the schedule. Execution order is registration
    /// order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.schedule.add_system(system);
    }

    /// Append a system under an explicit name.
    pub fn add_named_system<S: System + 'static>(&mut self, name: impl Into<String>, system: S) {
        self.schedule.add_named_system(name, system);
    }

    pub fn system_count(&self) -> usize {
        self.schedule.len()
    }

    /// Run every registered system in order, once, with the given tick.
    ///
    /// The schedule is extracted for the duration of the pass so systems may
    /// themselves register further systems; those are appended after the
    /// current pass and first run on the next tick.
    pub fn run_tick(&mut self, tick: Tick) {
        let mut schedule = std::mem::take(&mut self.schedule);
        schedule.run(self, tick);
        let added = std::mem::replace(&mut self.schedule, schedule);
        self.schedule.extend(added);
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Fail if any of `type_ids` has no store. Checked before any write.
    fn ensure_registered(
        &self,
        type_ids: &[TypeId],
        type_names: &[&'static str],
    ) -> Result<(), EcsError> {
        for (type_id, name) in type_ids.iter().zip(type_names) {
            if !self.stores.contains_key(type_id) {
                return Err(EcsError::ComponentNotRegistered(name));
            }
        }
        Ok(())
    }

    /// Verify the signature/store invariant for every live entity.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let live: Vec<Entity> = self.entities.iter().collect();
        for entity in live {
            let signature = self.entities.signature(entity).unwrap();
            for (type_id, store) in &self.stores {
                assert_eq!(
                    store.contains(entity),
                    signature.contains(type_id),
                    "signature/store mismatch for {entity}"
                );
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ── Bundles (tuple support) ──────────────────────────────────────────────

/// A set of components that can be attached to an entity in one operation.
///
/// Implemented for tuples of up to 8 components. The tuple's types form the
/// entity's initial signature.
pub trait Bundle {
    fn type_ids() -> Vec<TypeId>;
    /// Human-readable names, index-aligned with [`type_ids`](Bundle::type_ids).
    fn type_names() -> Vec<&'static str>;
    /// Write every value into its store. Callers must have validated
    /// registration first.
    fn write(self, entity: Entity, world: &mut World);
}

macro_rules! impl_bundle {
    ($($T:ident),+) => {
        impl<$($T: Component),+> Bundle for ($($T,)+) {
            fn type_ids() -> Vec<TypeId> {
                vec![$(TypeId::of::<$T>()),+]
            }

            fn type_names() -> Vec<&'static str> {
                vec![$(std::any::type_name::<$T>()),+]
            }

            #[allow(non_snake_case)]
            fn write(self, entity: Entity, world: &mut World) {
                let ($($T,)+) = self;
                $(
                    // Unwrap is fine: registration was validated by the caller.
                    world.store_mut::<$T>().unwrap().insert(entity, $T);
                )+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);
