//! World module - isometric terrain, game objects and the tick loop.

pub mod collision;
pub mod context;
pub mod decoration;
pub mod iso;
mod object;
pub mod pickup;
mod plugin;
pub mod simulation;
pub mod terrain;

pub use object::{Body, GameObject, IdAllocator, ObjectId, ObjectKind, Shadow};
pub use plugin::WorldPlugin;
pub use simulation::{Simulation, SimulationDriver};
