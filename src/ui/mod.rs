//! UI module - the main menu, the in-game HUD and the pause menu.

pub mod hud;
pub mod menu;
mod plugin;
pub mod stat_bars;

pub use hud::{Hud, HudAction, HudView};
pub use menu::{MenuChoice, PauseMenu};
pub use plugin::UiPlugin;
pub use stat_bars::StatBars;
