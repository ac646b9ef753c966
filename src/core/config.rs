//! Gameplay tunables loaded from an external RON file.
//!
//! Allows tweaking pacing and world generation without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::GameError;

/// Default location of the tunables file.
pub const TUNABLES_PATH: &str = "assets/data/tunables.ron";

/// Attack speed pickup placement and strength.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PickupPlacement {
    pub bonus: f32,
    /// Effect duration in seconds.
    pub seconds: u32,
    pub tile: (i32, i32),
}

/// Tunables loaded from assets/data/tunables.ron.
#[derive(Resource, Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tunables {
    // Scheduler
    pub tick_rate: u32,
    pub max_catch_up: u32,
    // Terrain
    pub terrain_width: i32,
    pub terrain_height: i32,
    /// Fixed seed for terrain and wave rolls. `None` draws from entropy.
    pub seed: Option<u64>,
    // Waves
    pub wave_delay: u32,
    pub spawn_throttle: u32,
    pub spawn_points: Vec<(i32, i32)>,
    // Player
    pub player_start: (i32, i32),
    pub attack_speed: f32,
    pub pickup: PickupPlacement,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            max_catch_up: 5,
            terrain_width: 16,
            terrain_height: 16,
            seed: None,
            wave_delay: 600,
            spawn_throttle: 20,
            spawn_points: vec![
                (0, 1),
                (1, 1),
                (0, 2),
                (2, 2),
                (13, 12),
                (13, 14),
                (12, 14),
                (12, 12),
            ],
            player_start: (7, 7),
            attack_speed: 1.5,
            pickup: PickupPlacement {
                bonus: 0.5,
                seconds: 10,
                tile: (2, 2),
            },
        }
    }
}

impl Tunables {
    /// Parse tunables from RON text.
    pub fn from_ron(contents: &str, origin: &str) -> Result<Self, GameError> {
        ron::from_str(contents).map_err(|e| GameError::Parse {
            path: origin.to_string(),
            details: e.to_string(),
        })
    }

    /// Read and parse the tunables file at `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(GameError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| GameError::Io {
            path: display.clone(),
            details: e.to_string(),
        })?;
        Self::from_ron(&contents, &display)
    }

    /// Load tunables from the default path, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from(TUNABLES_PATH) {
            Ok(tunables) => {
                info!("Loaded tunables from {}", TUNABLES_PATH);
                tunables
            }
            Err(e @ GameError::FileNotFound(_)) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Length of one simulation tick in seconds.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// System to load tunables at startup.
pub fn load_tunables(mut commands: Commands) {
    commands.insert_resource(Tunables::load());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let tunables = Tunables::from_ron("(seed: Some(7), wave_delay: 120)", "inline").unwrap();
        assert_eq!(tunables.seed, Some(7));
        assert_eq!(tunables.wave_delay, 120);
        assert_eq!(tunables.terrain_width, 16);
        assert_eq!(tunables.spawn_points.len(), 8);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let result = Tunables::from_ron("(tick_rate: \"fast\")", "inline");
        assert!(matches!(result, Err(GameError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = Tunables::load_from("does/not/exist.ron");
        assert!(matches!(result, Err(GameError::FileNotFound(_))));
    }

    #[test]
    fn default_tick_is_one_sixtieth() {
        assert!((Tunables::default().tick_seconds() - 1.0 / 60.0).abs() < f32::EPSILON);
    }
}
