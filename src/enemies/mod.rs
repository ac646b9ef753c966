//! Enemies module - enemy state, AI, pathfinding, projectiles and waves.

mod ai;
mod components;
pub mod data;
pub mod pathfinding;
mod plugin;
mod projectile;
pub mod spawning;

pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use pathfinding::{find_path, Path};
pub use plugin::EnemyPlugin;
pub use projectile::Projectile;
pub use spawning::WaveSpawner;
