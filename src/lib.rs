//! Isometric Brawler - a 2D isometric wave-survival action game in Bevy.
//!
//! # Architecture
//!
//! The game simulation is plain Rust, stepped at a fixed rate by the world
//! plugin. Bevy plugins load data, feed input and present the results:
//!
//! - **Core**: Game states, tunables, input, events, the fixed-step scheduler
//! - **Player**: The player controller and device input latching
//! - **Combat**: The combo graph, hitboxes, the sword
//! - **Enemies**: Enemy AI, pathfinding, projectiles, wave spawning
//! - **World**: Terrain, objects, the simulation loop
//! - **Rendering**: Sprite animation and the draw list presenter
//! - **Audio**: Sound cue playback
//! - **UI**: Main menu and HUD

pub mod audio;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod rendering;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct BrawlerPlugin;

impl Plugin for BrawlerPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player input
            .add_plugins(player::PlayerPlugin)

            // Enemy data
            .add_plugins(enemies::EnemyPlugin)

            // Simulation
            .add_plugins(world::WorldPlugin)

            // Presentation
            .add_plugins(rendering::RenderingPlugin)
            .add_plugins(audio::SoundPlugin)
            .add_plugins(ui::UiPlugin);
    }
}
