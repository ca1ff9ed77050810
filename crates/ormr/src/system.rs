//! # Systems — Behavior Over the World, Once Per Tick
//!
//! A system is just a function over `&mut World` plus the current [`Tick`] —
//! query entities, mutate components, read resources. No parameter
//! injection, no dependency graphs, no parallelism: systems run strictly in
//! the order they were registered, and that ordering is the only correctness
//! tool (a movement pass that must be seen by a later cleanup pass is simply
//! registered earlier).
//!
//! A [`Schedule`] is the ordered list. Each entry carries a short name, for
//! logs; names are derived from the function type unless given explicitly.

use super::world::World;

/// Timing for one tick. Both fields share the host clock's unit; the engine
/// never interprets them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Time elapsed since the previous tick.
    pub delta: f64,
    /// Absolute timestamp of this tick.
    pub elapsed: f64,
}

/// A system that can be executed against a [`World`].
///
/// Any `FnMut(&mut World, Tick)` implements this, so closures and function
/// pointers work directly.
pub trait System {
    fn run(&mut self, world: &mut World, tick: Tick);
}

impl<F> System for F
where
    F: FnMut(&mut World, Tick),
{
    fn run(&mut self, world: &mut World, tick: Tick) {
        (self)(world, tick)
    }
}

/// A boxed [`System`] with a short name for logs.
struct NamedSystem {
    name: String,
    system: Box<dyn System>,
}

/// An ordered list of systems. Execution order is registration order.
#[derive(Default)]
pub struct Schedule {
    systems: Vec<NamedSystem>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Append a system, naming it after its type (`<closure>` for closures).
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.add_named_system(short_system_name(std::any::type_name::<S>()), system);
    }

    /// Append a system under an explicit name.
    pub fn add_named_system<S: System + 'static>(&mut self, name: impl Into<String>, system: S) {
        let name = name.into();
        log::trace!("system registered: {name}");
        self.systems.push(NamedSystem {
            name,
            system: Box::new(system),
        });
    }

    /// Run every system in order with the same tick.
    ///
    /// The engine performs no fault isolation: a panicking system unwinds
    /// through this call, aborting the remaining systems for the tick. Any
    /// recovery policy is the host's decision.
    pub fn run(&mut self, world: &mut World, tick: Tick) {
        for entry in &mut self.systems {
            entry.system.run(world, tick);
        }
    }

    /// Move all systems from `other` to the end of this schedule.
    pub(crate) fn extend(&mut self, other: Schedule) {
        self.systems.extend(other.systems);
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// last segment (`swarm::move_system` → `move_system`, closures → `<closure>`).
fn short_system_name(full: &str) -> String {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name.contains("closure") {
        "<closure>".to_string()
    } else {
        name.to_string()
    }
}
