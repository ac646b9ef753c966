//! Game state definitions that control the overall flow of the game.
//!
//! Pausing is not a Bevy state. The simulation owns its own pause flag so
//! the HUD keeps updating while the world is frozen.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while data files are read
/// - Move to `MainMenu` when loading completes
/// - Enter `InGame` when a new game is started
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Reading tunables, enemy definitions and key bindings
    #[default]
    Loading,
    /// Title screen
    MainMenu,
    /// Active gameplay, including the paused overlay
    InGame,
}
