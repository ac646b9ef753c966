//! Core plugin that sets up game states, events, and configuration.

use bevy::prelude::*;

use super::config::load_tunables;
use super::events::SimulationEvent;
use super::input::InputLatch;
use super::states::GameState;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame)
/// - The simulation event channel
/// - Tunables and the raw input latch
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_event::<SimulationEvent>()
            .init_resource::<InputLatch>()
            .add_systems(Startup, load_tunables)
            .add_systems(OnEnter(GameState::Loading), transition_to_main_menu)
            .add_systems(Update, log_state_transitions);
    }
}

/// Data files are read synchronously at startup, so loading is immediate.
fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

fn log_state_transitions(mut transitions: EventReader<StateTransitionEvent<GameState>>) {
    for transition in transitions.read() {
        info!(
            "Game state changed: {:?} -> {:?}",
            transition.exited, transition.entered
        );
    }
}
