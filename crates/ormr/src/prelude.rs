//! Convenience re-exports — `use ormr::prelude::*` for the common items.

pub use crate::entity::Entity;
pub use crate::error::EcsError;
pub use crate::join::{Joined, inner_join, outer_join};
pub use crate::runner::{FixedStepPacer, RunHandle, Runner, TickPacer};
pub use crate::store::{Component, ComponentStore};
pub use crate::system::{Schedule, System, Tick};
pub use crate::world::{Bundle, World};
