//! Visual configuration loaded from external RON file.
//!
//! Allows tweaking the presentation without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;

pub const VISUAL_CONFIG_PATH: &str = "assets/data/rendering/visual_config.ron";

/// Visual configuration loaded from assets/data/rendering/visual_config.ron.
#[derive(Resource, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisualConfig {
    pub clear_color: (f32, f32, f32),
    /// World pixels per screen pixel. Below 1.0 zooms in.
    pub camera_scale: f32,
    /// Draw depth step between consecutive sprites.
    pub depth_step: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            clear_color: (0.0, 0.0, 0.0),
            camera_scale: 0.5,
            depth_step: 0.001,
        }
    }
}

impl VisualConfig {
    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Load visual config from RON file.
    pub fn load() -> Self {
        match fs::read_to_string(VISUAL_CONFIG_PATH) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(config) => {
                    info!("Loaded visual config from {}", VISUAL_CONFIG_PATH);
                    config
                }
                Err(e) => {
                    error!("Failed to parse {}: {}. Using defaults.", VISUAL_CONFIG_PATH, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}. Using defaults.", VISUAL_CONFIG_PATH, e);
                Self::default()
            }
        }
    }

    pub fn clear_color(&self) -> Color {
        let (r, g, b) = self.clear_color;
        Color::srgb(r, g, b)
    }
}

/// System to load visual config at startup.
pub fn load_visual_config(mut commands: Commands) {
    let config = VisualConfig::load();
    commands.insert_resource(ClearColor(config.clear_color()));
    commands.insert_resource(config);
}
