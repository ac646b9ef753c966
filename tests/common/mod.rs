//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use isometric_brawler::core::{InputSnapshot, ManualClock, ScriptedInput, Tunables};
use isometric_brawler::enemies::EnemyDefinition;
use isometric_brawler::world::terrain::TerrainGrid;
use isometric_brawler::world::Simulation;

pub const SEED: u64 = 42;

pub fn seeded_tunables() -> Tunables {
    Tunables {
        seed: Some(SEED),
        ..default()
    }
}

/// Empty 16x16 world at height zero. Nothing is spawned.
pub fn flat_simulation(tunables: Tunables) -> Simulation {
    let terrain = TerrainGrid::flat(tunables.terrain_width, tunables.terrain_height)
        .expect("default terrain size is valid");
    Simulation::with_terrain(tunables, EnemyDefinition::default(), terrain)
}

pub fn manual_clock() -> ManualClock {
    ManualClock::default()
}

pub fn scripted(frames: impl IntoIterator<Item = InputSnapshot>) -> ScriptedInput {
    ScriptedInput::new(frames)
}

pub fn idle_ticks(simulation: &mut Simulation, count: usize) {
    for _ in 0..count {
        simulation.tick(InputSnapshot::default());
    }
}

/// Headless app with time and states, no window or renderer.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app
}
