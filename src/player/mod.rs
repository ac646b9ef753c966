//! Player module - the player character, its movement and input wiring.

mod components;
mod controller;
pub mod movement;
mod plugin;

pub use components::*;
pub use movement::Locomotion;
pub use plugin::PlayerPlugin;
