//! Isometric Brawler - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Face, left/middle/right buttons attack
//! - Space: Jump or dodge
//! - X: Draw or sheathe the sword
//! - Escape: Pause/Unpause

use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Isometric Brawler".to_string(),
                resolution: (1280.0, 720.0).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(isometric_brawler::BrawlerPlugin)
        .run();
}
