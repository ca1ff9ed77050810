//! # Ormr — Minimal Entity-Component-System Runtime
//!
//! A deliberately small ECS engine: entities are monotonically increasing
//! IDs, components are typed values held in one insertion-ordered store per
//! type, systems are behavior run in registration order once per tick, and
//! the tick loop is paced entirely by the host. Built to sit underneath a
//! real-time simulation that spawns, moves, ages, and destroys thousands of
//! objects per frame.
//!
//! ## Module Overview
//!
//! - [`entity`] — entity IDs, the allocator, the live-entity registry
//! - [`store`] — per-type component stores with teardown hooks
//! - [`world`] — the central container: stores + registry + resources + schedule
//! - [`join`] — presence queries: [`inner_join`], [`outer_join`]
//! - [`system`] — the [`System`] trait, [`Tick`], and the ordered [`Schedule`]
//! - [`runner`] — the externally-paced tick loop and its cancellation handle
//! - [`error`] — [`EcsError`]
//!
//! ## Example
//!
//! ```
//! use ormr::prelude::*;
//!
//! #[derive(Clone, Copy)]
//! struct Position { x: f64 }
//! #[derive(Clone, Copy)]
//! struct Velocity { dx: f64 }
//!
//! fn main() -> Result<(), EcsError> {
//!     let mut world = World::new();
//!     world.register_component::<Position>()?;
//!     world.register_component::<Velocity>()?;
//!     world.spawn((Position { x: 0.0 }, Velocity { dx: 1.0 }))?;
//!
//!     world.add_named_system("move", |world: &mut World, tick: Tick| {
//!         let movers = world.store::<Velocity>().unwrap().entities();
//!         for entity in movers {
//!             let vel = *world.get::<Velocity>(entity).unwrap();
//!             if let Some(pos) = world.get_mut::<Position>(entity) {
//!                 pos.x += vel.dx * tick.delta;
//!             }
//!         }
//!     });
//!
//!     let mut runner = Runner::new();
//!     let mut pacer = FixedStepPacer::new(0.0, 10.0, 3);
//!     runner.run(&mut world, 0.0, &mut pacer);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;
pub mod join;
pub mod prelude;
pub mod runner;
pub mod store;
pub mod system;
pub mod world;

pub use entity::Entity;
pub use error::EcsError;
pub use join::{Joined, inner_join, outer_join};
pub use runner::{FixedStepPacer, RunHandle, Runner, TickPacer};
pub use store::{Component, ComponentStore};
pub use system::{Schedule, System, Tick};
pub use world::{Bundle, World};
